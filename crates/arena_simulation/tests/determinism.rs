//! Determinism tests
//!
//! The same config (seed included) must replay the same duel tick for tick.

use arena_simulation::{
    create_arena_app, world_snapshot, ArenaMode, ArenaPosition, CombatAi, Health,
    SimulationConfig,
};

const TICK_COUNT: usize = 1200;

/// Runs an AI vs AI duel and returns a snapshot of the world
fn run_duel(seed: u64) -> Vec<u8> {
    let config = SimulationConfig {
        seed,
        mode: ArenaMode::AiVsAi,
        ..SimulationConfig::default()
    };
    let mut app = create_arena_app(&config);

    for _ in 0..TICK_COUNT {
        app.update();
    }

    let mut snapshot = world_snapshot::<ArenaPosition>(app.world_mut());
    snapshot.extend(world_snapshot::<Health>(app.world_mut()));
    snapshot.extend(world_snapshot::<CombatAi>(app.world_mut()));
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_duel(SEED);
    let second = run_duel(SEED);

    assert_eq!(
        first, second,
        "duel with seed {} replayed differently",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let snapshots: Vec<_> = (0..3).map(|_| run_duel(SEED)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "run {} differs from run 0", i);
    }
}

#[test]
fn test_different_seeds_diverge() {
    assert_ne!(run_duel(1), run_duel(2));
}
