// Math utilities and helper functions

use glam::Vec2;
use rand::Rng;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Check whether two circles are far enough apart not to overlap
///
/// Touching circles (distance exactly equal to the sum of radii) count as clear.
pub fn circles_clear(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) >= radius_a + radius_b
}

/// Uniformly sample an integer in `[min, max]` (inclusive)
///
/// A reversed range is sampled as if its ends were swapped.
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// Uniformly sample a coordinate in `[min + inset, max - inset]`
///
/// Collapses to the midpoint of `[min, max]` when the inset leaves no room.
/// A negative inset is treated as zero.
pub fn random_inset<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32, inset: f32) -> f32 {
    let inset = inset.max(0.0);
    let span = max - min - inset * 2.0;
    if span <= 0.0 {
        return (min + max) / 2.0;
    }
    min + inset + rng.gen::<f32>() * span
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(15, 0, 10), 10);
    }

    #[test]
    fn test_circles_clear() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_clear(a, 50.0, Vec2::new(100.0, 0.0), 50.0));
        assert!(!circles_clear(a, 50.0, Vec2::new(99.0, 0.0), 50.0));
        assert!(circles_clear(a, 10.0, Vec2::new(30.0, 40.0), 40.0));
    }

    #[test]
    fn test_random_in_range_inclusive() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..500 {
            let value = random_in_range(&mut rng, 1, 3);
            assert!((1..=3).contains(&value));
            seen_min |= value == 1;
            seen_max |= value == 3;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_random_in_range_reversed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let value = random_in_range(&mut rng, 5, 2);
            assert!((2..=5).contains(&value));
        }
    }

    #[test]
    fn test_random_inset_stays_inside() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let value = random_inset(&mut rng, 0.0, 800.0, 50.0);
            assert!((50.0..=750.0).contains(&value));
        }
    }

    #[test]
    fn test_random_inset_collapses_to_midpoint() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(random_inset(&mut rng, 0.0, 100.0, 80.0), 50.0);
    }

    #[test]
    fn test_random_inset_negative_is_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let value = random_inset(&mut rng, 100.0, 200.0, -40.0);
            assert!((100.0..=200.0).contains(&value));
        }
    }
}
