// Creature factories registered with the spawn manager

use super::options::SpawnOptions;
use crate::game::creatures::{Creature, CreatureId, CreatureKind, CreatureStats, SlimeBody};
use glam::Vec2;
use rand::rngs::StdRng;

/// Everything a factory needs to build one creature
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    /// Identifier reserved for the new creature
    pub id: CreatureId,
    /// Registered type name being spawned
    pub type_name: String,
    /// Resolved collision-free position
    pub position: Vec2,
    pub options: SpawnOptions,
}

/// Builds creatures for one registered type
///
/// Returning `None` reports a failed spawn; it is not an error.
/// Closures of the form `FnMut(&SpawnRequest, &mut StdRng) -> Option<Creature>`
/// implement this trait.
pub trait CreatureFactory {
    fn create(&mut self, request: &SpawnRequest, rng: &mut StdRng) -> Option<Creature>;
}

impl<F> CreatureFactory for F
where
    F: FnMut(&SpawnRequest, &mut StdRng) -> Option<Creature>,
{
    fn create(&mut self, request: &SpawnRequest, rng: &mut StdRng) -> Option<Creature> {
        self(request, rng)
    }
}

/// Factory for slimes with procedural bodies
#[derive(Debug, Default, Clone, Copy)]
pub struct SlimeFactory;

impl CreatureFactory for SlimeFactory {
    fn create(&mut self, request: &SpawnRequest, rng: &mut StdRng) -> Option<Creature> {
        let stats = CreatureStats::new(request.options.hp, CreatureKind::Slime, rng);
        let hints = stats.render_hints();

        let mut body = SlimeBody::new(&hints);
        if request.options.show_health_bar {
            body = body.with_health_bar(&hints);
        }

        Some(Creature::with_body(
            request.id,
            &request.type_name,
            stats,
            request.position,
            Box::new(body),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn request(options: SpawnOptions) -> SpawnRequest {
        SpawnRequest {
            id: 4,
            type_name: "slime".to_string(),
            position: Vec2::new(120.0, 340.0),
            options,
        }
    }

    #[test]
    fn test_slime_factory_rolls_slime_hp() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut factory = SlimeFactory;
        for _ in 0..50 {
            let slime = factory.create(&request(SpawnOptions::default()), &mut rng).unwrap();
            assert!((30..=60).contains(&slime.stats.max_hp()));
            assert_eq!(slime.id, 4);
            assert_eq!(slime.type_name, "slime");
            assert_eq!(slime.position, Vec2::new(120.0, 340.0));
        }
    }

    #[test]
    fn test_slime_factory_honours_hp_override() {
        let mut rng = StdRng::seed_from_u64(3);
        let slime = SlimeFactory
            .create(&request(SpawnOptions::default().with_hp(100)), &mut rng)
            .unwrap();
        assert_eq!(slime.stats.max_hp(), 100);
    }

    #[test]
    fn test_closure_factory() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut calls = 0;
        let mut factory = |req: &SpawnRequest, _rng: &mut StdRng| {
            calls += 1;
            (req.position.x > 100.0).then(|| {
                Creature::new(req.id, &req.type_name, CreatureStats::with_max_hp(5), req.position)
            })
        };

        assert!(factory.create(&request(SpawnOptions::default()), &mut rng).is_some());
        let mut left = request(SpawnOptions::default());
        left.position.x = 10.0;
        assert!(factory.create(&left, &mut rng).is_none());
        drop(factory);
        assert_eq!(calls, 2);
    }
}
