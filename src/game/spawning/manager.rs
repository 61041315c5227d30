// Spawn manager - owns every tracked creature and the timers that act on them

use super::behavior::Behavior;
use super::factory::{CreatureFactory, SpawnRequest};
use super::options::{SpawnBounds, SpawnOptions};
use super::SpawnError;
use crate::config::{DEFAULT_COLLISION_RADIUS, SPAWN_ATTEMPTS};
use crate::core::math::{circles_clear, random_in_range, random_inset};
use crate::engine::{Scheduler, TimerId};
use crate::game::creatures::{Creature, CreatureId};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::time::Duration;

/// Where creatures' visual proxies get parented
///
/// The manager only signals attach and detach; it never inspects what is drawn.
pub trait RenderContainer {
    fn add_child(&mut self, creature: &Creature);
    fn remove_child(&mut self, creature: &Creature);
}

/// Container that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullContainer;

impl RenderContainer for NullContainer {
    fn add_child(&mut self, _creature: &Creature) {}
    fn remove_child(&mut self, _creature: &Creature) {}
}

/// Something that happened during [`SpawnManager::step`]
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnEvent {
    /// A scheduled spawn or respawn succeeded
    Spawned { id: CreatureId, type_name: String },
    /// A scheduled spawn or respawn failed; state is unchanged
    SpawnFailed { type_name: String, error: SpawnError },
    /// Auto-damage hit a creature
    Damaged { id: CreatureId, damage: i32, hp: i32 },
    /// A death animation finished and the creature was removed
    Died { id: CreatureId, type_name: String },
    /// The cleanup sweep dropped an unparented creature
    Cleaned { id: CreatureId },
}

#[derive(Debug, Clone)]
enum Task {
    Damage {
        creature: CreatureId,
        range: [i32; 2],
    },
    Spawn {
        type_name: String,
        options: SpawnOptions,
    },
    Cleanup,
}

/// Owns live creatures, places new ones and drives their timed behavior
pub struct SpawnManager {
    /// Tracked creatures in spawn order
    entities: Vec<Creature>,
    factories: HashMap<String, Box<dyn CreatureFactory>>,
    behaviors: HashMap<CreatureId, Behavior>,
    scheduler: Scheduler<Task>,
    container: Box<dyn RenderContainer>,
    rng: StdRng,
    spawn_attempts: u32,
    next_id: CreatureId,
    cleanup_timer: Option<TimerId>,
}

impl Default for SpawnManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnManager {
    /// Create a manager with an entropy-seeded RNG
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a manager with a deterministic RNG
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            entities: Vec::new(),
            factories: HashMap::new(),
            behaviors: HashMap::new(),
            scheduler: Scheduler::new(),
            container: Box::new(NullContainer),
            rng,
            spawn_attempts: SPAWN_ATTEMPTS,
            next_id: 0,
            cleanup_timer: None,
        }
    }

    /// Parent visual proxies to `container`
    pub fn with_container(mut self, container: Box<dyn RenderContainer>) -> Self {
        self.container = container;
        self
    }

    /// Change the placement attempt budget (at least one attempt is always made)
    pub fn set_spawn_attempts(&mut self, attempts: u32) {
        self.spawn_attempts = attempts.max(1);
    }

    /// Register a factory for a creature type, replacing any previous one
    pub fn register_factory(&mut self, type_name: &str, factory: impl CreatureFactory + 'static) {
        self.factories
            .insert(type_name.to_string(), Box::new(factory));
    }

    /// Register a closure as the factory for a creature type
    pub fn register_factory_fn<F>(&mut self, type_name: &str, factory: F)
    where
        F: FnMut(&SpawnRequest, &mut StdRng) -> Option<Creature> + 'static,
    {
        self.register_factory(type_name, factory);
    }

    pub fn has_factory(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Reserve an identifier for a creature built outside of [`SpawnManager::spawn`]
    pub fn allocate_id(&mut self) -> CreatureId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Check if a circle at `position` overlaps no parented creature
    pub fn is_position_clear(&self, position: Vec2, radius: f32) -> bool {
        self.entities
            .iter()
            .filter(|entity| entity.is_attached())
            .all(|entity| {
                let entity_radius = entity.collision_radius.unwrap_or(DEFAULT_COLLISION_RADIUS);
                circles_clear(position, radius, entity.position, entity_radius)
            })
    }

    /// Draw random positions inside `bounds` until one is clear
    ///
    /// Best effort: gives up after the attempt budget even if free space exists.
    pub fn find_safe_spawn_position(&mut self, bounds: &SpawnBounds, radius: f32) -> Option<Vec2> {
        let radius = radius.max(0.0);
        for _ in 0..self.spawn_attempts {
            let x = random_inset(&mut self.rng, bounds.min_x, bounds.max_x, radius);
            let y = random_inset(&mut self.rng, bounds.min_y, bounds.max_y, radius);
            let candidate = Vec2::new(x, y);

            if self.is_position_clear(candidate, radius) {
                return Some(candidate);
            }
        }
        None
    }

    /// Build a creature at a safe position without tracking it
    pub fn create(&mut self, type_name: &str, options: &SpawnOptions) -> Result<Creature, SpawnError> {
        if !self.factories.contains_key(type_name) {
            return Err(Self::report(SpawnError::UnknownType(type_name.to_string())));
        }

        let Some(position) = self.find_safe_spawn_position(&options.bounds, options.radius) else {
            return Err(Self::report(SpawnError::NoSafePosition(type_name.to_string())));
        };

        let request = SpawnRequest {
            id: self.next_id,
            type_name: type_name.to_string(),
            position,
            options: options.clone(),
        };

        let created = match self.factories.get_mut(type_name) {
            Some(factory) => factory.create(&request, &mut self.rng),
            None => None,
        };
        let Some(mut creature) = created else {
            return Err(Self::report(SpawnError::FactoryFailed(type_name.to_string())));
        };

        self.next_id = self.next_id.max(creature.id.saturating_add(1));
        creature.collision_radius = Some(options.radius.max(0.0));
        Ok(creature)
    }

    /// Spawn a creature at a safe position and start tracking it
    pub fn spawn(&mut self, type_name: &str, options: &SpawnOptions) -> Result<CreatureId, SpawnError> {
        let creature = self.create(type_name, options)?;
        let id = creature.id;
        let position = creature.position;
        if !self.add_entity(creature) {
            return Err(SpawnError::AlreadyTracked(type_name.to_string(), id));
        }
        log::info!(
            "Spawned {} #{} at ({:.0}, {:.0})",
            type_name,
            id,
            position.x,
            position.y
        );
        Ok(id)
    }

    fn report(error: SpawnError) -> SpawnError {
        log::warn!("{}", error);
        error
    }

    /// Start tracking a creature, parenting its visual proxy if needed
    ///
    /// Returns `false` and tears the creature down if a creature with the
    /// same id is already tracked.
    pub fn add_entity(&mut self, mut creature: Creature) -> bool {
        if self.entities.iter().any(|entity| entity.id == creature.id) {
            log::warn!("{} #{} is already tracked", creature.type_name, creature.id);
            creature.destroy();
            return false;
        }

        if !creature.is_attached() {
            creature.attach();
            self.container.add_child(&creature);
        }

        self.next_id = self.next_id.max(creature.id.saturating_add(1));
        self.entities.push(creature);
        true
    }

    /// Stop tracking a creature and tear it down
    ///
    /// Unknown ids are a no-op, so removing twice is harmless.
    pub fn remove_entity(&mut self, id: CreatureId) -> Option<Creature> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        let mut creature = self.entities.remove(index);

        if let Some(behavior) = self.behaviors.remove(&id) {
            if let Some(timer) = behavior.damage_timer {
                self.scheduler.cancel(timer);
            }
        }

        if creature.is_attached() {
            self.container.remove_child(&creature);
        }
        creature.destroy();
        Some(creature)
    }

    /// Attach timed behavior to a tracked creature
    ///
    /// Replaces any behavior it already had. Returns `false` for unknown ids.
    pub fn setup_behavior(&mut self, id: CreatureId, behavior: impl Into<Behavior>) -> bool {
        if self.get(id).is_none() {
            return false;
        }

        let mut behavior = behavior.into();
        if let Some(previous) = self.behaviors.remove(&id) {
            if let Some(timer) = previous.damage_timer {
                self.scheduler.cancel(timer);
            }
        }

        if behavior.config.auto_damage {
            let timer = self.scheduler.schedule_repeating(
                behavior.config.damage_interval(),
                Task::Damage {
                    creature: id,
                    range: behavior.config.damage_range,
                },
            );
            behavior.damage_timer = Some(timer);
        }

        self.behaviors.insert(id, behavior);
        true
    }

    /// Get the behavior attached to a creature
    pub fn behavior(&self, id: CreatureId) -> Option<&Behavior> {
        self.behaviors.get(&id)
    }

    /// Try a spawn after `delay`; the outcome is reported by [`SpawnManager::step`]
    pub fn schedule_spawn(&mut self, type_name: &str, options: SpawnOptions, delay: Duration) -> TimerId {
        self.scheduler.schedule_once(
            delay,
            Task::Spawn {
                type_name: type_name.to_string(),
                options,
            },
        )
    }

    /// Run [`SpawnManager::cleanup`] every `interval`, replacing any previous sweep
    pub fn schedule_cleanup(&mut self, interval: Duration) -> TimerId {
        if let Some(timer) = self.cleanup_timer.take() {
            self.scheduler.cancel(timer);
        }
        let timer = self.scheduler.schedule_repeating(interval, Task::Cleanup);
        self.cleanup_timer = Some(timer);
        timer
    }

    /// Cancel a pending spawn or cleanup timer
    pub fn cancel_timer(&mut self, timer: TimerId) -> bool {
        if self.cleanup_timer == Some(timer) {
            self.cleanup_timer = None;
        }
        self.scheduler.cancel(timer)
    }

    /// Advance the simulation by one frame
    ///
    /// Runs every timer that came due, animates every creature, then removes
    /// creatures whose death animation finished.
    pub fn step(&mut self, dt: Duration) -> Vec<SpawnEvent> {
        let mut events = Vec::new();

        for (timer, task) in self.scheduler.advance(dt) {
            self.run_task(timer, task, &mut events);
        }

        let finished: Vec<CreatureId> = self
            .entities
            .iter_mut()
            .filter_map(|entity| entity.animate().then_some(entity.id))
            .collect();

        for id in finished {
            self.finish_death(id, &mut events);
        }

        events
    }

    fn run_task(&mut self, timer: TimerId, task: Task, events: &mut Vec<SpawnEvent>) {
        match task {
            Task::Damage { creature, range } => self.apply_auto_damage(timer, creature, range, events),
            Task::Spawn { type_name, options } => match self.spawn(&type_name, &options) {
                Ok(id) => events.push(SpawnEvent::Spawned { id, type_name }),
                Err(error) => events.push(SpawnEvent::SpawnFailed { type_name, error }),
            },
            Task::Cleanup => {
                for id in self.cleanup() {
                    events.push(SpawnEvent::Cleaned { id });
                }
            }
        }
    }

    fn apply_auto_damage(
        &mut self,
        timer: TimerId,
        id: CreatureId,
        range: [i32; 2],
        events: &mut Vec<SpawnEvent>,
    ) {
        let Some(creature) = self.entities.iter_mut().find(|entity| entity.id == id) else {
            self.cancel_damage_timer(id, timer);
            return;
        };

        // Gone from the container or already dying: nothing left to hurt
        if !creature.is_attached() || !creature.state().can_be_hurt() {
            self.cancel_damage_timer(id, timer);
            return;
        }

        let damage = random_in_range(&mut self.rng, range[0], range[1]);
        let hp = creature.take_damage(damage);
        let died = !creature.is_alive();
        log::debug!("{} #{} took {} damage ({} HP left)", creature.type_name, id, damage, hp);
        events.push(SpawnEvent::Damaged { id, damage, hp });

        if died {
            self.cancel_damage_timer(id, timer);
        }
    }

    fn cancel_damage_timer(&mut self, id: CreatureId, timer: TimerId) {
        self.scheduler.cancel(timer);
        if let Some(behavior) = self.behaviors.get_mut(&id) {
            if behavior.damage_timer == Some(timer) {
                behavior.damage_timer = None;
            }
        }
    }

    fn finish_death(&mut self, id: CreatureId, events: &mut Vec<SpawnEvent>) {
        let behavior = self.behaviors.remove(&id);
        if let Some(timer) = behavior.as_ref().and_then(|b| b.damage_timer) {
            self.scheduler.cancel(timer);
        }

        let Some(creature) = self.remove_entity(id) else {
            return;
        };
        log::info!("{} #{} died", creature.type_name, id);

        if let Some(mut behavior) = behavior {
            if let Some(on_death) = behavior.on_death.as_mut() {
                on_death(&creature);
            }

            if behavior.config.auto_respawn {
                log::debug!(
                    "Respawning {} in {:?}",
                    creature.type_name,
                    behavior.config.respawn_delay()
                );
                self.schedule_spawn(
                    &creature.type_name,
                    behavior.config.respawn_options.clone(),
                    behavior.config.respawn_delay(),
                );
            }
        }

        events.push(SpawnEvent::Died {
            id,
            type_name: creature.type_name,
        });
    }

    /// Drop every creature whose visual proxy is no longer parented
    ///
    /// Returns the ids that were removed.
    pub fn cleanup(&mut self) -> Vec<CreatureId> {
        let stale: Vec<CreatureId> = self
            .entities
            .iter()
            .filter(|entity| !entity.is_attached())
            .map(|entity| entity.id)
            .collect();

        for &id in &stale {
            self.remove_entity(id);
        }

        if !stale.is_empty() {
            log::info!("Cleanup removed {} creature(s)", stale.len());
        }
        stale
    }

    /// Count tracked creatures, optionally only those whose type contains `filter`
    pub fn entity_count(&self, filter: Option<&str>) -> usize {
        match filter {
            Some(filter) => self
                .entities
                .iter()
                .filter(|entity| entity.matches_type(filter))
                .count(),
            None => self.entities.len(),
        }
    }

    /// Get every tracked creature whose type contains `filter`
    pub fn entities_by_type(&self, filter: &str) -> Vec<&Creature> {
        self.entities
            .iter()
            .filter(|entity| entity.matches_type(filter))
            .collect()
    }

    /// Get all tracked creatures in spawn order
    pub fn entities(&self) -> &[Creature] {
        &self.entities
    }

    /// Get a creature by ID
    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    /// Get a mutable creature by ID
    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Get the number of creatures that are still alive
    pub fn alive_count(&self) -> usize {
        self.entities.iter().filter(|entity| entity.is_alive()).count()
    }

    /// Get the number of pending timers
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Tear down every creature, forget every factory and cancel every timer
    pub fn destroy(&mut self) {
        for mut creature in self.entities.drain(..) {
            if creature.is_attached() {
                self.container.remove_child(&creature);
            }
            creature.destroy();
        }
        self.behaviors.clear();
        self.factories.clear();
        self.scheduler.clear();
        self.cleanup_timer = None;
        log::debug!("Spawn manager destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::creatures::{CreatureBody, CreatureStats, LifeState, RenderHints};
    use crate::game::spawning::{BehaviorConfig, SlimeFactory};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);

    #[derive(Debug)]
    struct CountingBody {
        destroyed: Rc<Cell<u32>>,
    }

    impl CreatureBody for CountingBody {
        fn update(&mut self, _hints: &RenderHints, dying: bool) -> bool {
            dying
        }

        fn destroy(&mut self) {
            self.destroyed.set(self.destroyed.get() + 1);
        }
    }

    #[derive(Default)]
    struct RecordingContainer {
        log: Rc<RefCell<Vec<(&'static str, CreatureId)>>>,
    }

    impl RenderContainer for RecordingContainer {
        fn add_child(&mut self, creature: &Creature) {
            self.log.borrow_mut().push(("add", creature.id));
        }

        fn remove_child(&mut self, creature: &Creature) {
            self.log.borrow_mut().push(("remove", creature.id));
        }
    }

    /// Manager with a "blob" type that always has `hp` max HP and counts teardowns
    fn manager_with_blobs(hp: i32) -> (SpawnManager, Rc<Cell<u32>>) {
        let destroyed = Rc::new(Cell::new(0));
        let counter = destroyed.clone();
        let mut manager = SpawnManager::with_seed(1);
        manager.register_factory_fn("blob", move |req: &SpawnRequest, _rng: &mut StdRng| {
            Some(Creature::with_body(
                req.id,
                &req.type_name,
                CreatureStats::with_max_hp(hp),
                req.position,
                Box::new(CountingBody {
                    destroyed: counter.clone(),
                }),
            ))
        });
        (manager, destroyed)
    }

    fn small_options() -> SpawnOptions {
        SpawnOptions::default().with_radius(10.0)
    }

    fn fixed_damage(amount: i32, interval_ms: u64) -> BehaviorConfig {
        BehaviorConfig {
            auto_damage: true,
            damage_interval_ms: interval_ms,
            damage_range: [amount, amount],
            ..BehaviorConfig::default()
        }
    }

    #[test]
    fn test_unknown_type_fails() {
        let mut manager = SpawnManager::with_seed(1);
        let err = manager.spawn("dragon", &SpawnOptions::default()).unwrap_err();
        assert_eq!(err, SpawnError::UnknownType("dragon".to_string()));
        assert_eq!(manager.entity_count(None), 0);
    }

    #[test]
    fn test_factory_failure_is_reported() {
        let mut manager = SpawnManager::with_seed(1);
        manager.register_factory_fn("ghost", |_req: &SpawnRequest, _rng: &mut StdRng| None);
        let err = manager.spawn("ghost", &SpawnOptions::default()).unwrap_err();
        assert_eq!(err, SpawnError::FactoryFailed("ghost".to_string()));
        assert_eq!(manager.entity_count(None), 0);
    }

    #[test]
    fn test_spawn_tracks_and_sets_radius() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();

        assert_eq!(manager.entity_count(None), 1);
        let blob = manager.get(id).unwrap();
        assert_eq!(blob.collision_radius, Some(10.0));
        assert!(blob.is_attached());
        assert!(blob.position.x >= 10.0 && blob.position.x <= 790.0);
        assert!(blob.position.y >= 10.0 && blob.position.y <= 590.0);
    }

    #[test]
    fn test_spawn_respects_bounds() {
        let mut manager = SpawnManager::with_seed(9);
        manager.register_factory("slime", SlimeFactory);
        let options = SpawnOptions::default()
            .with_radius(5.0)
            .with_y_range(300.0, 450.0);
        for _ in 0..10 {
            if let Ok(id) = manager.spawn("slime", &options) {
                let position = manager.get(id).unwrap().position;
                assert!(position.y >= 305.0 && position.y <= 445.0);
            }
        }
    }

    #[test]
    fn test_create_does_not_track() {
        let (mut manager, _) = manager_with_blobs(10);
        let blob = manager.create("blob", &small_options()).unwrap();
        assert_eq!(manager.entity_count(None), 0);
        assert!(!blob.is_attached());

        let id = blob.id;
        assert!(manager.add_entity(blob));
        assert_eq!(manager.get(id).map(|b| b.id), Some(id));

        let next = manager.spawn("blob", &small_options()).unwrap();
        assert_ne!(next, id);
    }

    #[test]
    fn test_spawned_creatures_do_not_overlap() {
        let (mut manager, _) = manager_with_blobs(10);
        let options = SpawnOptions::default().with_radius(40.0);
        for _ in 0..8 {
            let _ = manager.spawn("blob", &options);
        }

        let entities = manager.entities();
        for (i, a) in entities.iter().enumerate() {
            for b in &entities[i + 1..] {
                assert!(a.position.distance(b.position) >= 80.0);
            }
        }
    }

    #[test]
    fn test_packed_area_gives_up() {
        let (mut manager, _) = manager_with_blobs(10);
        let mut blocker = Creature::new(
            manager.allocate_id(),
            "blob",
            CreatureStats::with_max_hp(10),
            Vec2::new(50.0, 50.0),
        );
        blocker.collision_radius = Some(100.0);
        manager.add_entity(blocker);

        let bounds = SpawnBounds::new(0.0, 100.0, 0.0, 100.0);
        assert_eq!(manager.find_safe_spawn_position(&bounds, 50.0), None);

        let options = SpawnOptions::default().with_bounds(bounds).with_radius(50.0);
        let err = manager.spawn("blob", &options).unwrap_err();
        assert_eq!(err, SpawnError::NoSafePosition("blob".to_string()));
        assert_eq!(manager.entity_count(None), 1);
    }

    #[test]
    fn test_unparented_entities_do_not_block() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        let position = manager.get(id).unwrap().position;
        assert!(!manager.is_position_clear(position, 10.0));

        manager.get_mut(id).unwrap().detach();
        assert!(manager.is_position_clear(position, 10.0));
    }

    #[test]
    fn test_default_radius_for_unset_entities() {
        let mut manager = SpawnManager::with_seed(1);
        let id = manager.allocate_id();
        manager.add_entity(Creature::new(id, "rock", CreatureStats::with_max_hp(1), Vec2::ZERO));

        assert!(!manager.is_position_clear(Vec2::new(59.0, 0.0), 10.0));
        assert!(manager.is_position_clear(Vec2::new(60.0, 0.0), 10.0));
    }

    #[test]
    fn test_remove_entity_is_idempotent() {
        let (mut manager, destroyed) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        assert_eq!(manager.entity_count(None), 1);

        let removed = manager.remove_entity(id).unwrap();
        assert_eq!(removed.state(), LifeState::Removed);
        assert_eq!(manager.entity_count(None), 0);
        assert_eq!(destroyed.get(), 1);

        assert!(manager.remove_entity(id).is_none());
        assert_eq!(manager.entity_count(None), 0);
        assert_eq!(destroyed.get(), 1);
    }

    #[test]
    fn test_add_entity_rejects_duplicates() {
        let mut manager = SpawnManager::with_seed(1);
        let id = manager.allocate_id();
        let stats = CreatureStats::with_max_hp(5);
        assert!(manager.add_entity(Creature::new(id, "rock", stats.clone(), Vec2::ZERO)));
        assert!(!manager.add_entity(Creature::new(id, "rock", stats, Vec2::ZERO)));
        assert_eq!(manager.entity_count(None), 1);
    }

    #[test]
    fn test_container_attach_and_detach() {
        let container = RecordingContainer::default();
        let log = container.log.clone();
        let mut manager = SpawnManager::with_seed(1).with_container(Box::new(container));
        manager.register_factory("slime", SlimeFactory);

        let id = manager.spawn("slime", &small_options()).unwrap();
        manager.remove_entity(id);
        manager.remove_entity(id);

        assert_eq!(*log.borrow(), vec![("add", id), ("remove", id)]);
    }

    #[test]
    fn test_auto_damage_ticks() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        assert!(manager.setup_behavior(id, fixed_damage(2, 100)));

        let events = manager.step(Duration::from_millis(99));
        assert!(events.is_empty());

        let events = manager.step(Duration::from_millis(1));
        assert_eq!(events, vec![SpawnEvent::Damaged { id, damage: 2, hp: 8 }]);
        assert_eq!(manager.get(id).unwrap().stats.hp(), 8);
    }

    #[test]
    fn test_auto_damage_kills_and_removes() {
        let (mut manager, destroyed) = manager_with_blobs(3);
        let id = manager.spawn("blob", &small_options()).unwrap();
        manager.setup_behavior(id, fixed_damage(1, 100));

        let mut died = Vec::new();
        for _ in 0..5 {
            for event in manager.step(Duration::from_millis(100)) {
                if let SpawnEvent::Died { id, .. } = event {
                    died.push(id);
                }
            }
        }

        assert_eq!(died, vec![id]);
        assert_eq!(manager.entity_count(None), 0);
        assert_eq!(destroyed.get(), 1);
        assert_eq!(manager.pending_timers(), 0);
        assert!(manager.behavior(id).is_none());
    }

    #[test]
    fn test_death_callback_runs_once() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();

        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        manager.setup_behavior(
            id,
            Behavior::new(BehaviorConfig::default()).on_death(move |creature: &Creature| {
                assert_eq!(creature.state(), LifeState::Removed);
                seen.set(seen.get() + 1);
            }),
        );

        let blob = manager.get_mut(id).unwrap();
        blob.take_damage(50);
        blob.take_damage(50);
        assert!(blob.is_dying());

        manager.step(FRAME);
        manager.step(FRAME);
        manager.step(FRAME);
        assert_eq!(calls.get(), 1);
        assert_eq!(manager.entity_count(None), 0);
    }

    #[test]
    fn test_dying_creature_stays_tracked_during_animation() {
        let mut manager = SpawnManager::with_seed(5);
        manager.register_factory("slime", SlimeFactory);
        let id = manager.spawn("slime", &small_options()).unwrap();

        manager.get_mut(id).unwrap().take_damage(1000);
        for _ in 0..10 {
            assert!(manager.step(FRAME).is_empty());
            assert!(manager.get(id).unwrap().is_dying());
        }

        let events = manager.step(FRAME);
        assert_eq!(
            events,
            vec![SpawnEvent::Died {
                id,
                type_name: "slime".to_string()
            }]
        );
        assert!(manager.get(id).is_none());
    }

    #[test]
    fn test_auto_respawn_after_delay() {
        let (mut manager, _) = manager_with_blobs(1);
        let id = manager.spawn("blob", &small_options()).unwrap();
        manager.setup_behavior(
            id,
            BehaviorConfig {
                auto_respawn: true,
                respawn_delay_ms: 500,
                respawn_options: small_options(),
                ..fixed_damage(1, 100)
            },
        );

        manager.step(Duration::from_millis(100));
        assert_eq!(manager.entity_count(None), 0);

        assert!(manager.step(Duration::from_millis(499)).is_empty());
        let events = manager.step(Duration::from_millis(1));
        assert!(matches!(
            events.as_slice(),
            [SpawnEvent::Spawned { id: new_id, type_name }] if *new_id != id && type_name == "blob"
        ));
        assert_eq!(manager.entity_count(Some("blob")), 1);
    }

    #[test]
    fn test_damage_timer_stops_when_unparented() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        manager.setup_behavior(id, fixed_damage(1, 100));

        manager.get_mut(id).unwrap().detach();
        assert!(manager.step(Duration::from_millis(100)).is_empty());
        assert_eq!(manager.get(id).unwrap().stats.hp(), 10);
        assert_eq!(manager.pending_timers(), 0);
        assert_eq!(manager.behavior(id).unwrap().damage_timer(), None);
    }

    #[test]
    fn test_removal_cancels_damage_timer() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        manager.setup_behavior(id, fixed_damage(1, 100));
        assert_eq!(manager.pending_timers(), 1);

        manager.remove_entity(id);
        assert_eq!(manager.pending_timers(), 0);
        assert!(manager.step(Duration::from_millis(1000)).is_empty());
    }

    #[test]
    fn test_setup_behavior_unknown_id() {
        let mut manager = SpawnManager::with_seed(1);
        assert!(!manager.setup_behavior(42, fixed_damage(1, 100)));
        assert_eq!(manager.pending_timers(), 0);
    }

    #[test]
    fn test_setup_behavior_replaces_timer() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        manager.setup_behavior(id, fixed_damage(1, 100));
        manager.setup_behavior(id, fixed_damage(1, 100));
        assert_eq!(manager.pending_timers(), 1);
    }

    #[test]
    fn test_cleanup_removes_unparented() {
        let (mut manager, destroyed) = manager_with_blobs(10);
        let keep = manager.spawn("blob", &small_options()).unwrap();
        let stale = manager.spawn("blob", &small_options()).unwrap();
        manager.get_mut(stale).unwrap().detach();

        assert_eq!(manager.cleanup(), vec![stale]);
        assert_eq!(manager.entity_count(None), 1);
        assert!(manager.get(keep).is_some());
        assert_eq!(destroyed.get(), 1);
        assert!(manager.cleanup().is_empty());
    }

    #[test]
    fn test_scheduled_cleanup() {
        let (mut manager, _) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        manager.schedule_cleanup(Duration::from_millis(5000));
        manager.get_mut(id).unwrap().detach();

        assert!(manager.step(Duration::from_millis(4999)).is_empty());
        assert_eq!(manager.step(Duration::from_millis(1)), vec![SpawnEvent::Cleaned { id }]);
        assert_eq!(manager.entity_count(None), 0);
    }

    #[test]
    fn test_scheduled_spawn_failure_is_an_event() {
        let mut manager = SpawnManager::with_seed(1);
        manager.schedule_spawn("slime", SpawnOptions::default(), Duration::from_millis(10));
        let events = manager.step(Duration::from_millis(10));
        assert_eq!(
            events,
            vec![SpawnEvent::SpawnFailed {
                type_name: "slime".to_string(),
                error: SpawnError::UnknownType("slime".to_string()),
            }]
        );
    }

    #[test]
    fn test_cancel_scheduled_spawn() {
        let mut manager = SpawnManager::with_seed(1);
        manager.register_factory("slime", SlimeFactory);
        let timer = manager.schedule_spawn("slime", small_options(), Duration::from_millis(10));
        assert!(manager.cancel_timer(timer));
        assert!(manager.step(Duration::from_millis(20)).is_empty());
        assert_eq!(manager.entity_count(None), 0);
    }

    #[test]
    fn test_count_and_filter_by_type() {
        let (mut manager, _) = manager_with_blobs(10);
        manager.register_factory("green_slime", SlimeFactory);
        manager.spawn("blob", &small_options()).unwrap();
        manager.spawn("green_slime", &small_options()).unwrap();
        manager.spawn("green_slime", &small_options()).unwrap();

        assert_eq!(manager.entity_count(None), 3);
        assert_eq!(manager.entity_count(Some("slime")), 2);
        assert_eq!(manager.entity_count(Some("SLIME")), 2);
        assert_eq!(manager.entity_count(Some("blob")), 1);
        assert_eq!(manager.entity_count(Some("dragon")), 0);

        let slimes = manager.entities_by_type("slime");
        assert_eq!(slimes.len(), 2);
        assert!(slimes.iter().all(|c| c.type_name == "green_slime"));
    }

    #[test]
    fn test_entities_keep_spawn_order() {
        let (mut manager, _) = manager_with_blobs(10);
        let ids: Vec<_> = (0..4)
            .map(|_| manager.spawn("blob", &small_options()).unwrap())
            .collect();
        manager.remove_entity(ids[1]);

        let order: Vec<_> = manager.entities().iter().map(|c| c.id).collect();
        assert_eq!(order, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn test_destroy_tears_everything_down() {
        let (mut manager, destroyed) = manager_with_blobs(10);
        let id = manager.spawn("blob", &small_options()).unwrap();
        manager.spawn("blob", &small_options()).unwrap();
        manager.setup_behavior(id, fixed_damage(1, 100));
        manager.schedule_cleanup(Duration::from_millis(5000));

        manager.destroy();
        assert_eq!(manager.entity_count(None), 0);
        assert_eq!(destroyed.get(), 2);
        assert_eq!(manager.pending_timers(), 0);
        assert!(!manager.has_factory("blob"));
        assert!(manager.spawn("blob", &small_options()).is_err());
    }

    #[test]
    fn test_factory_reusing_an_id_is_rejected() {
        let destroyed = Rc::new(Cell::new(0));
        let counter = destroyed.clone();
        let mut manager = SpawnManager::with_seed(1);
        manager.register_factory_fn("rock", move |req: &SpawnRequest, _rng: &mut StdRng| {
            Some(Creature::with_body(
                0,
                &req.type_name,
                CreatureStats::with_max_hp(5),
                req.position,
                Box::new(CountingBody {
                    destroyed: counter.clone(),
                }),
            ))
        });

        assert_eq!(manager.spawn("rock", &small_options()), Ok(0));
        let err = manager.spawn("rock", &small_options()).unwrap_err();
        assert_eq!(err, SpawnError::AlreadyTracked("rock".to_string(), 0));
        assert_eq!(manager.entity_count(None), 1);
        assert_eq!(destroyed.get(), 1);
        assert!(manager.get(0).unwrap().is_attached());
    }

    #[test]
    fn test_negative_radius_stays_in_bounds() {
        let (mut manager, _) = manager_with_blobs(10);
        let bounds = SpawnBounds::new(100.0, 200.0, 100.0, 200.0);
        let options = SpawnOptions::default().with_bounds(bounds).with_radius(-500.0);

        let id = manager.spawn("blob", &options).unwrap();
        let blob = manager.get(id).unwrap();
        assert!((100.0..=200.0).contains(&blob.position.x));
        assert!((100.0..=200.0).contains(&blob.position.y));
        assert_eq!(blob.collision_radius, Some(0.0));
    }

    #[test]
    fn test_single_spawn_attempt() {
        let (mut manager, _) = manager_with_blobs(10);
        manager.set_spawn_attempts(0);
        assert!(manager.spawn("blob", &small_options()).is_ok());
    }

    #[test]
    fn test_cancelled_damage_tick_leaves_rng_alone() {
        let (mut ticked, _) = manager_with_blobs(10);
        let (mut quiet, _) = manager_with_blobs(10);

        let first = ticked.spawn("blob", &small_options()).unwrap();
        quiet.spawn("blob", &small_options()).unwrap();
        ticked.setup_behavior(first, fixed_damage(1, 100));
        ticked.get_mut(first).unwrap().detach();
        quiet.get_mut(first).unwrap().detach();

        assert!(ticked.step(Duration::from_millis(100)).is_empty());
        assert!(quiet.step(Duration::from_millis(100)).is_empty());
        assert_eq!(ticked.pending_timers(), 0);

        let a = ticked.spawn("blob", &small_options()).unwrap();
        let b = quiet.spawn("blob", &small_options()).unwrap();
        assert_eq!(ticked.get(a).unwrap().position, quiet.get(b).unwrap().position);
    }

    #[test]
    fn test_death_callback_runs_before_respawn() {
        let (mut manager, _) = manager_with_blobs(2);
        let id = manager.spawn("blob", &small_options()).unwrap();

        let order = Rc::new(RefCell::new(Vec::new()));
        let seen = order.clone();
        let config = BehaviorConfig {
            auto_respawn: true,
            respawn_delay_ms: 200,
            respawn_options: small_options(),
            ..fixed_damage(1, 100)
        };
        manager.setup_behavior(
            id,
            Behavior::new(config).on_death(move |creature: &Creature| {
                seen.borrow_mut().push(format!("died {}", creature.id));
            }),
        );

        for _ in 0..5 {
            for event in manager.step(Duration::from_millis(100)) {
                if let SpawnEvent::Spawned { id, .. } = event {
                    order.borrow_mut().push(format!("spawned {}", id));
                }
            }
        }

        let new_id = id + 1;
        assert_eq!(
            *order.borrow(),
            vec![format!("died {}", id), format!("spawned {}", new_id)]
        );
        assert_eq!(manager.entity_count(Some("blob")), 1);
    }
}
