// Slime arena - keeps a small population of slimes alive and dying

use crate::config::ArenaConfig;
use crate::engine::Scheduler;
use crate::game::spawning::{SlimeFactory, SpawnEvent, SpawnManager};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArenaTask {
    /// Try to add one creature
    Spawn,
    /// Top the population back up after a death
    Refill,
}

/// Population driver on top of a [`SpawnManager`]
///
/// Spawns the initial creatures one after another, gives each one the
/// configured behavior, refills the population after deaths and retries
/// spawns that could not find room.
pub struct SlimeArena {
    config: ArenaConfig,
    manager: SpawnManager,
    scheduler: Scheduler<ArenaTask>,
    spawned: usize,
    deaths: usize,
}

impl SlimeArena {
    /// Create an arena with an entropy-seeded manager
    pub fn new(config: ArenaConfig) -> Self {
        Self::with_manager(config, SpawnManager::new())
    }

    /// Create an arena around an existing manager
    ///
    /// Slimes are registered under the configured creature type unless the
    /// manager already has a factory for it.
    pub fn with_manager(config: ArenaConfig, mut manager: SpawnManager) -> Self {
        if !manager.has_factory(&config.creature_type) {
            manager.register_factory(&config.creature_type, SlimeFactory);
        }
        manager.schedule_cleanup(config.cleanup_interval());

        let mut scheduler = Scheduler::new();
        for i in 0..config.target_population {
            scheduler.schedule_once(config.spawn_stagger() * i as u32, ArenaTask::Spawn);
        }

        log::info!(
            "Arena started: {} x {}",
            config.target_population,
            config.creature_type
        );

        Self {
            config,
            manager,
            scheduler,
            spawned: 0,
            deaths: 0,
        }
    }

    /// Advance the arena by one frame
    pub fn step(&mut self, dt: Duration) -> Vec<SpawnEvent> {
        for (_, task) in self.scheduler.advance(dt) {
            match task {
                ArenaTask::Spawn | ArenaTask::Refill => self.try_spawn(),
            }
        }

        let events = self.manager.step(dt);
        for event in &events {
            match event {
                SpawnEvent::Died { .. } => {
                    self.deaths += 1;
                    self.scheduler
                        .schedule_once(self.config.refill_delay(), ArenaTask::Refill);
                }
                SpawnEvent::Spawned { id, .. } => {
                    // Respawns scheduled by the manager itself
                    self.spawned += 1;
                    self.manager.setup_behavior(*id, self.config.behavior.clone());
                }
                _ => {}
            }
        }
        events
    }

    fn try_spawn(&mut self) {
        if self.population() >= self.config.target_population {
            return;
        }

        match self.manager.spawn(&self.config.creature_type, &self.config.spawn) {
            Ok(id) => {
                self.spawned += 1;
                self.manager.setup_behavior(id, self.config.behavior.clone());
            }
            Err(err) => {
                log::debug!("Retrying in {:?}: {}", self.config.retry_delay(), err);
                self.scheduler
                    .schedule_once(self.config.retry_delay(), ArenaTask::Spawn);
            }
        }
    }

    /// Number of tracked creatures of the arena's type
    pub fn population(&self) -> usize {
        self.manager.entity_count(Some(&self.config.creature_type))
    }

    /// Total creatures spawned so far
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Total completed deaths so far
    pub fn deaths(&self) -> usize {
        self.deaths
    }

    pub fn manager(&self) -> &SpawnManager {
        &self.manager
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Tear down every creature and stop all pending work
    pub fn shutdown(&mut self) {
        self.scheduler.clear();
        self.manager.destroy();
        log::info!(
            "Arena shut down after {} spawns and {} deaths",
            self.spawned,
            self.deaths
        );
    }
}
