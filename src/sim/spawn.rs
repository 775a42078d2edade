//! Collision-free position sampling
//!
//! Spawn points are drawn on the integer grid inside the world bounds, inset
//! from the edge, until the candidate's box clears every wall.

use glam::Vec2;
use rand::Rng;

use super::geometry::Rect;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Draw attempts past which a warning is logged
const SLOW_SPAWN_ATTEMPTS: u32 = 1_000;

/// Rejection-sample a point whose box overlaps no wall
///
/// The box is produced by `bounds_at` for each candidate. Gives up with
/// `SpawnExhausted` after `max_attempts` draws.
pub fn sample_free_point<R, F>(
    rng: &mut R,
    walls: &[Rect],
    width: f32,
    height: f32,
    inset: f32,
    max_attempts: u32,
    bounds_at: F,
) -> Result<Vec2, SimError>
where
    R: Rng + ?Sized,
    F: Fn(Vec2) -> Rect,
{
    let (min_x, max_x) = (inset.ceil() as i32, (width - inset).floor() as i32);
    let (min_y, max_y) = (inset.ceil() as i32, (height - inset).floor() as i32);
    if min_x > max_x || min_y > max_y {
        return Err(SimError::InvalidArena(format!(
            "{width}x{height} leaves no room inside a spawn inset of {inset}"
        )));
    }

    for attempt in 1..=max_attempts {
        let candidate = Vec2::new(
            rng.random_range(min_x..=max_x) as f32,
            rng.random_range(min_y..=max_y) as f32,
        );
        let bounds = bounds_at(candidate);
        if walls.iter().all(|w| !bounds.overlaps(w)) {
            if attempt > SLOW_SPAWN_ATTEMPTS {
                log::warn!(
                    "Spawn point found only after {} of {} attempts",
                    attempt,
                    max_attempts
                );
            }
            return Ok(candidate);
        }
    }

    Err(SimError::SpawnExhausted {
        attempts: max_attempts,
    })
}

/// Sample a craft spawn point: the square box of `half_size` around the
/// point must clear every wall
pub fn sample_spawn<R: Rng + ?Sized>(
    rng: &mut R,
    walls: &[Rect],
    width: f32,
    height: f32,
    inset: f32,
    half_size: f32,
    max_attempts: u32,
) -> Result<Vec2, SimError> {
    sample_free_point(rng, walls, width, height, inset, max_attempts, |p| {
        Rect::centered(p, half_size)
    })
}

/// Place `coin_count` coins, each clear of every wall
pub fn place_coins<R: Rng + ?Sized>(
    rng: &mut R,
    walls: &[Rect],
    width: f32,
    height: f32,
    tuning: &Tuning,
) -> Result<Vec<Vec2>, SimError> {
    let (w, h) = tuning.coin_size;
    (0..tuning.coin_count)
        .map(|_| {
            sample_free_point(
                rng,
                walls,
                width,
                height,
                tuning.spawn_inset,
                tuning.spawn_attempts,
                |p| Rect::new(p.x - w / 2.0, p.y - h / 2.0, w, h),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_avoids_walls() {
        let mut rng = Pcg32::seed_from_u64(3);
        // Wall covering the left half of the world
        let walls = [Rect::new(0.0, 0.0, 100.0, 200.0)];
        for _ in 0..200 {
            let p = sample_spawn(&mut rng, &walls, 200.0, 200.0, 20.0, 10.0, 1000).unwrap();
            assert!(p.x >= 110.0, "spawned inside wall at {p:?}");
            assert!((20.0..=180.0).contains(&p.y));
        }
    }

    #[test]
    fn test_blocked_arena_fails_instead_of_hanging() {
        let mut rng = Pcg32::seed_from_u64(3);
        let walls = [Rect::new(0.0, 0.0, 500.0, 500.0)];
        let err = sample_spawn(&mut rng, &walls, 500.0, 500.0, 20.0, 10.0, 50).unwrap_err();
        assert!(matches!(err, SimError::SpawnExhausted { attempts: 50 }));
    }

    #[test]
    fn test_inset_larger_than_world() {
        let mut rng = Pcg32::seed_from_u64(3);
        let err = sample_spawn(&mut rng, &[], 30.0, 30.0, 20.0, 10.0, 50).unwrap_err();
        assert!(matches!(err, SimError::InvalidArena(_)));
    }

    #[test]
    fn test_coins_clear_walls() {
        let mut rng = Pcg32::seed_from_u64(11);
        let tuning = Tuning::default();
        let walls = [Rect::new(100.0, 0.0, 20.0, 400.0)];
        let coins = place_coins(&mut rng, &walls, 400.0, 400.0, &tuning).unwrap();
        assert_eq!(coins.len(), tuning.coin_count as usize);
        for c in coins {
            let bounds = Rect::new(c.x - 6.0, c.y - 8.0, 12.0, 16.0);
            assert!(!bounds.overlaps(&walls[0]));
        }
    }
}
