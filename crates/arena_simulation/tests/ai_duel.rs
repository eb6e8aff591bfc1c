//! AI duel integration tests
//!
//! Full headless app (all plugins, manual fixed clock) with real fighters.
//!
//! Checks:
//! - Health invariants hold every tick
//! - AI fighters close in and land hits
//! - AI stays silent while the match phase pauses it
//! - Human slots only move on their own commands

use bevy::prelude::*;
use arena_simulation::*;

#[derive(Resource, Default)]
struct Journal {
    commands: Vec<FighterCommand>,
    hits: Vec<MeleeHit>,
}

fn record_commands(mut events: EventReader<FighterCommand>, mut journal: ResMut<Journal>) {
    journal.commands.extend(events.read().copied());
}

fn record_hits(mut events: EventReader<MeleeHit>, mut journal: ResMut<Journal>) {
    journal.hits.extend(events.read().cloned());
}

/// Helper: arena app with a journal of commands and hits
fn create_duel_app(config: &SimulationConfig) -> App {
    let mut app = create_arena_app(config);
    app.init_resource::<Journal>().add_systems(
        FixedUpdate,
        (
            record_commands.after(ArenaSet::Decide).before(ArenaSet::Act),
            record_hits.after(ArenaSet::Act).before(ArenaSet::Match),
        ),
    );
    app
}

fn fighters_with<T: Component>(app: &mut App) -> Vec<Entity> {
    let mut query = app.world_mut().query_filtered::<Entity, With<T>>();
    let mut entities: Vec<Entity> = query.iter(app.world()).collect();
    entities.sort();
    entities
}

/// Test: two AI fighters duel for 60s without breaking invariants
#[test]
fn test_ai_vs_ai_duel_lands_hits() {
    let config = SimulationConfig {
        seed: 42,
        mode: ArenaMode::AiVsAi,
        ..SimulationConfig::default()
    };
    let mut app = create_duel_app(&config);

    for _ in 0..3600 {
        app.update();

        let mut query = app.world_mut().query::<&Health>();
        for health in query.iter(app.world()) {
            assert!(
                health.current >= 0.0 && health.current <= health.max,
                "health out of range: {:?}",
                health
            );
        }
    }

    let journal = app.world().resource::<Journal>();
    assert!(!journal.commands.is_empty(), "AI never issued a command");
    assert!(
        journal
            .commands
            .iter()
            .any(|c| c.action == FighterAction::Attack),
        "AI never swung"
    );
    assert!(!journal.hits.is_empty(), "no swing ever connected");
}

/// Test: no commands while the phase pauses AI
#[test]
fn test_ai_paused_after_game_over() {
    let config = SimulationConfig {
        mode: ArenaMode::AiVsAi,
        ..SimulationConfig::default()
    };
    let mut app = create_duel_app(&config);
    app.insert_resource(MatchPhase::GameOver);

    for _ in 0..300 {
        app.update();
    }

    assert!(app.world().resource::<Journal>().commands.is_empty());
    for fighter in fighters_with::<CombatAi>(&mut app) {
        let ai = app.world().get::<CombatAi>(fighter).unwrap();
        assert_eq!(ai.0.state(), AIState::Idle);
        assert_eq!(ai.0.decision_timer(), 0.0);
    }
}

/// Test: the bot hunts down a passive human player
#[test]
fn test_bot_attacks_passive_player() {
    let config = SimulationConfig {
        seed: 7,
        mode: ArenaMode::PlayerVsBot,
        ..SimulationConfig::default()
    };
    let mut app = create_duel_app(&config);

    for _ in 0..1800 {
        app.update();
    }

    let bots = fighters_with::<CombatAi>(&mut app);
    assert_eq!(bots.len(), 1);
    let bot = bots[0];

    let journal = app.world().resource::<Journal>();
    assert!(journal.commands.iter().all(|c| c.fighter == bot));
    assert!(journal.hits.iter().all(|hit| hit.attacker == bot));
    assert!(!journal.hits.is_empty(), "bot never reached the player");
}

/// Test: human commands drive the human fighter
#[test]
fn test_player_commands_move_the_player() {
    let config = SimulationConfig {
        mode: ArenaMode::PlayerVsPlayer,
        ..SimulationConfig::default()
    };
    let mut app = create_duel_app(&config);
    app.update();

    let mut query = app
        .world_mut()
        .query::<(Entity, &Side, &ArenaPosition)>();
    let (player, start) = query
        .iter(app.world())
        .find(|(_, side, _)| **side == Side::PlayerOne)
        .map(|(entity, _, position)| (entity, position.0))
        .unwrap();

    for _ in 0..30 {
        app.world_mut().send_event(FighterCommand {
            fighter: player,
            action: FighterAction::MoveHorizontal(1.0),
        });
        app.update();
    }

    let end = app.world().get::<ArenaPosition>(player).unwrap().0;
    assert!(end.x > start.x + 1.0, "player moved from {:?} to {:?}", start, end);
    assert!(fighters_with::<CombatAi>(&mut app).is_empty());
}
