//! Property-based tests using proptest
//!
//! Invariants that must hold for any seed or input sequence:
//! - Pool: handles are distinct, released slots are reused first
//! - Energy: bars drop once per `shots_per_bar` frames and never underflow
//! - Spawner: blue streaks stay bounded, the ramp respects its limits
//! - Monster: the drop decision is a Euclidean distance check

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::collections::HashSet;

use monster_invasion::consts::*;
use monster_invasion::sim::*;
use monster_invasion::tuning::{EnergyTuning, SpawnerTuning};
use monster_invasion::{Range, SimError};

fn projectile_pool() -> Pool<(), Projectile> {
    Pool::new((), |_: (), _: usize| -> Result<Projectile, SimError> {
        Ok(Projectile::new(45.0))
    })
}

fn new_spawner(rng: &mut Pcg32) -> MonsterSpawner<KinematicBody> {
    let tuning = SpawnerTuning::default();
    MonsterSpawner::new(&tuning, kinematic_bodies(tuning.home), rng).unwrap()
}

// ============================================================
// Pool Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_acquires_yield_distinct_active_handles(prewarm in 0usize..8, n in 1usize..40) {
        let mut pool = projectile_pool();
        pool.prewarm(prewarm).unwrap();
        let handles: Vec<_> = (0..n).map(|_| pool.acquire().unwrap()).collect();

        let unique: HashSet<_> = handles.iter().collect();
        prop_assert_eq!(unique.len(), n);
        prop_assert!(handles.iter().all(|h| pool.get(*h).is_some_and(|p| p.is_active())));
        prop_assert_eq!(pool.len(), n.max(prewarm));
        prop_assert_eq!(pool.active_count(), n);
    }

    #[test]
    fn prop_released_slots_are_reused(n in 2usize..30, release_mask in any::<u32>()) {
        let mut pool = projectile_pool();
        let handles: Vec<_> = (0..n).map(|_| pool.acquire().unwrap()).collect();
        let released: Vec<_> = handles
            .iter()
            .enumerate()
            .filter(|(i, _)| release_mask & (1 << (i % 32)) != 0)
            .map(|(_, h)| *h)
            .collect();
        for handle in &released {
            prop_assert!(pool.release(*handle));
        }

        let reacquired: HashSet<_> = (0..released.len()).map(|_| pool.acquire().unwrap()).collect();
        let expected: HashSet<_> = released.iter().copied().collect();
        prop_assert_eq!(reacquired, expected);
        prop_assert_eq!(pool.len(), n);
    }
}

// ============================================================
// Energy Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_bars_follow_sustained_fire(shots_per_bar in 1u32..6, calls in 0u32..60) {
        let mut energy = EnergyGenerator::new(&EnergyTuning {
            shots_per_bar,
            ..EnergyTuning::default()
        });
        let mut events = Vec::new();
        for _ in 0..calls {
            energy.on_fire_held(&mut events);
        }
        let dropped = (calls / shots_per_bar).min(u32::from(energy.max_bars()));
        prop_assert_eq!(u32::from(energy.bars()), u32::from(energy.max_bars()) - dropped);
        prop_assert_eq!(energy.can_fire(), energy.bars() > 0);
        prop_assert_eq!(energy.is_overheated(), energy.bars() == 0);
    }

    #[test]
    fn prop_restoration_never_overfills(calls in 0u32..20, steps in prop::collection::vec(0.0f32..0.6, 0..30)) {
        let mut energy = EnergyGenerator::new(&EnergyTuning::default());
        let mut events = Vec::new();
        for _ in 0..calls {
            energy.on_fire_held(&mut events);
        }
        energy.on_fire_released();
        for dt in steps {
            energy.step(dt, &mut events);
            prop_assert!(energy.bars() <= energy.max_bars());
        }
    }
}

// ============================================================
// Spawner Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_blue_streaks_stay_bounded(seed in any::<u64>(), n in 1usize..200) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut spawner = new_spawner(&mut rng);
        let mut events = Vec::new();

        let mut streak = 0;
        for _ in 0..n {
            let handle = spawner.spawn(&mut rng, &mut events).unwrap();
            match handle.kind {
                MonsterColor::Blue => streak += 1,
                MonsterColor::Red => {
                    prop_assert!(streak >= RED_THRESHOLD.0);
                    streak = 0;
                }
            }
            prop_assert!(streak < INITIAL_RED_THRESHOLD.1);
        }
        prop_assert_eq!(spawner.state().total_spawns, n as u64);
    }

    #[test]
    fn prop_ramp_respects_limits(seed in any::<u64>(), n in 0usize..400) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut spawner = new_spawner(&mut rng);
        let mut events = Vec::new();
        let tuning = SpawnerTuning::default();

        for _ in 0..n {
            spawner.spawn(&mut rng, &mut events).unwrap();
        }
        let state = spawner.state();
        prop_assert_eq!(state.speed_bump_counter as usize, n % 10);
        prop_assert_eq!(state.interval_counter as usize, n % 51);
        prop_assert!(state.vertical_velocity.min <= VERTICAL_MIN_CEILING);
        prop_assert!(state.vertical_velocity.max <= VERTICAL_MAX_CEILING);
        prop_assert!(state.next_spawn_interval >= tuning.spawn_interval.min - INTERVAL_BUMP_STEP);
        prop_assert!(state.next_spawn_interval <= tuning.spawn_interval.max);
    }

    #[test]
    fn prop_global_reset_restores_configuration(seed in any::<u64>(), n in 0usize..150) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut spawner = new_spawner(&mut rng);
        let mut events = Vec::new();
        for _ in 0..n {
            spawner.spawn(&mut rng, &mut events).unwrap();
        }
        spawner.global_reset(&mut rng, &mut events);

        let tuning = SpawnerTuning::default();
        let state = spawner.state();
        prop_assert_eq!(state.vertical_velocity, tuning.vertical_velocity);
        prop_assert_eq!(state.next_spawn_interval, tuning.spawn_interval.max);
        prop_assert_eq!(state.blue_streak, 0);
        prop_assert_eq!(spawner.active_monsters().count(), 0);
    }
}

// ============================================================
// Monster Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_drop_decision_uses_euclidean_distance(
        seed in any::<u64>(),
        angle in 0.0f32..std::f32::consts::TAU,
        distance in prop_oneof![0.0f32..0.99, 1.01f32..6.0],
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut spawner = new_spawner(&mut rng);
        let handle = spawner.spawn(&mut rng, &mut Vec::new()).unwrap();

        let monster = spawner.monster_mut(handle).unwrap();
        let target = monster.drop_target();
        monster.body_mut().pos = target + Vec2::from_angle(angle) * distance;
        monster.tick();

        let expected = if distance <= DROP_REACH_DISTANCE {
            MotionState::DroppingDown
        } else {
            MotionState::PlatformMotion
        };
        prop_assert_eq!(monster.state(), expected);
    }

    #[test]
    fn prop_range_samples_stay_inside(seed in any::<u64>(), min in -10.0f32..10.0, span in 0.0f32..10.0) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let range = Range::new(min, min + span);
        for _ in 0..20 {
            prop_assert!(range.contains(range.sample(&mut rng)));
        }
    }
}
