//! Whole-session tests: determinism, foraging, save/restore

use formicary::core::config::GenerationConfig;
use formicary::core::error::{SimError, SnapshotError};
use formicary::core::types::{ColonyId, GridPos};
use formicary::simulation::{ColonyOrchestrator, GodAction, SimEvent, SimulationSnapshot};
use formicary::world::{Anchor, Terrain};
use formicary::SimulationConfig;

fn test_config() -> SimulationConfig {
    SimulationConfig {
        world: GenerationConfig {
            cols: 48,
            rows: 32,
            nests: vec![GridPos::new(24, 16)],
            rock_formations: 3,
            caverns: 2,
            food_clusters: 3,
            ..GenerationConfig::default()
        },
        ..SimulationConfig::default()
    }
}

/// Scripted actions so both sides of a comparison receive identical input
fn scripted_actions(tick: u32) -> Vec<GodAction> {
    match tick % 25 {
        0 => vec![GodAction::Dig {
            center: GridPos::new(10 + (tick % 20) as i32, 12),
            radius: 1,
        }],
        7 => vec![GodAction::DropFood {
            colony: ColonyId(0),
            amount: 3.0,
        }],
        13 => vec![GodAction::RockWall {
            center: GridPos::new(30, 20),
            radius: 1,
        }],
        _ => Vec::new(),
    }
}

fn run(sim: &mut ColonyOrchestrator, from: u32, ticks: u32) {
    for t in from..from + ticks {
        for action in scripted_actions(t) {
            sim.submit_action(action);
        }
        sim.tick(1.0);
    }
}

#[test]
fn test_same_seed_same_session() {
    let mut a = ColonyOrchestrator::new(99, test_config()).unwrap();
    let mut b = ColonyOrchestrator::new(99, test_config()).unwrap();
    run(&mut a, 0, 150);
    run(&mut b, 0, 150);
    assert_eq!(a.to_snapshot(), b.to_snapshot());
    assert_eq!(a.drain_events(), b.drain_events());
}

#[test]
fn test_different_seeds_diverge() {
    let a = ColonyOrchestrator::new(1, test_config()).unwrap();
    let b = ColonyOrchestrator::new(2, test_config()).unwrap();
    assert_ne!(a.world().cells(), b.world().cells());
}

#[test]
fn test_restore_then_replay_matches() {
    let mut original = ColonyOrchestrator::new(2024, test_config()).unwrap();
    run(&mut original, 0, 120);

    let snapshot = original.to_snapshot();
    let mut restored = ColonyOrchestrator::from_snapshot(test_config(), snapshot.clone()).unwrap();
    assert_eq!(restored.to_snapshot(), snapshot);

    run(&mut original, 120, 200);
    run(&mut restored, 120, 200);
    assert_eq!(original.to_snapshot(), restored.to_snapshot());
}

#[test]
fn test_restore_into_existing_session() {
    let mut original = ColonyOrchestrator::new(5, test_config()).unwrap();
    run(&mut original, 0, 60);
    let snapshot = original.to_snapshot();

    let mut other = ColonyOrchestrator::new(77, test_config()).unwrap();
    run(&mut other, 0, 10);
    other.restore_from_snapshot(snapshot).unwrap();

    run(&mut original, 60, 80);
    run(&mut other, 60, 80);
    assert_eq!(original.to_snapshot(), other.to_snapshot());
}

#[test]
fn test_json_round_trip_is_exact() {
    let mut sim = ColonyOrchestrator::new(31, test_config()).unwrap();
    sim.submit_action(GodAction::Dig {
        center: GridPos::new(5, 20),
        radius: 2,
    });
    run(&mut sim, 1, 90);

    let snapshot = sim.to_snapshot();
    let json = snapshot.to_json().unwrap();
    let parsed = SimulationSnapshot::from_json(&json).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn test_bad_snapshots_leave_session_untouched() {
    let mut sim = ColonyOrchestrator::new(8, test_config()).unwrap();
    run(&mut sim, 0, 30);
    let before = sim.to_snapshot();

    let mut wrong_version = before.clone();
    wrong_version.version = 99;
    let err = sim.restore_from_snapshot(wrong_version).unwrap_err();
    assert!(matches!(
        err,
        SimError::Snapshot(SnapshotError::Version { found: 99, .. })
    ));

    let mut short_cells = before.clone();
    short_cells.cells.pop();
    assert!(matches!(
        sim.restore_from_snapshot(short_cells),
        Err(SimError::Snapshot(SnapshotError::Dimensions { field: "cells", .. }))
    ));

    let mut negative_trail = before.clone();
    negative_trail.home_trail[0] = -1.0;
    assert!(sim.restore_from_snapshot(negative_trail).is_err());

    let mut overloaded = before.clone();
    overloaded.ants[0].carry = 50.0;
    assert!(sim.restore_from_snapshot(overloaded).is_err());

    let mut stray = before.clone();
    stray.ants[0].position.x = 1_000.0;
    assert!(sim.restore_from_snapshot(stray).is_err());

    let mut orphan = before.clone();
    orphan.ants[0].colony = ColonyId(42);
    assert!(sim.restore_from_snapshot(orphan).is_err());

    // Sides whose product wraps to zero must not pass as an empty grid
    let mut oversized = before.clone();
    oversized.cols = 1 << 32;
    oversized.rows = 1 << 32;
    oversized.cells.clear();
    oversized.food_trail.clear();
    oversized.home_trail.clear();
    oversized.ants.clear();
    oversized.colonies.clear();
    oversized.blueprints.clear();
    assert!(matches!(
        sim.restore_from_snapshot(oversized),
        Err(SimError::Snapshot(SnapshotError::Dimensions { field: "cells", len: 0, .. }))
    ));

    assert!(SimulationSnapshot::from_json("{\"version\": 1}").is_err());
    assert_eq!(sim.to_snapshot(), before);
}

#[test]
fn test_ants_bring_food_home() {
    // Food right beside the nest, no rocks or caverns in the way
    let mut config = test_config();
    config.world.rock_formations = 0;
    config.world.caverns = 0;
    config.anchors = vec![Anchor::FoodCluster {
        center: GridPos::new(28, 16),
        radius: 1,
    }];
    config.colony.initial_ants = 20;
    config.colony.food_spawn_interval = 100_000;
    let mut sim = ColonyOrchestrator::new(12, config).unwrap();

    let food_before = sim.world().count(Terrain::Food);
    let mut collected = 0.0;
    for _ in 0..600 {
        sim.tick(1.0);
        for event in sim.drain_events() {
            if let SimEvent::FoodCollected { amount, .. } = event {
                collected += amount;
            }
        }
    }

    assert!(collected > 0.0);
    assert!(sim.world().count(Terrain::Food) < food_before);
    assert_eq!(sim.colonies()[0].total_collected, collected);

    let max_carry = sim.config().ants.max_carry;
    assert!(sim.ants().iter().all(|a| a.carry >= 0.0 && a.carry <= max_carry));
}

#[test]
fn test_calendar_events_follow_ticks() {
    let mut config = test_config();
    config.calendar.ticks_per_day = 10;
    config.calendar.days_per_season = 2;
    let mut sim = ColonyOrchestrator::new(3, config).unwrap();
    for _ in 0..40 {
        sim.tick(1.0);
    }

    let events = sim.drain_events();
    let days: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::DayAdvanced { day } => Some(*day),
            _ => None,
        })
        .collect();
    assert_eq!(days, vec![1, 2, 3, 4]);
    let seasons = events
        .iter()
        .filter(|e| matches!(e, SimEvent::SeasonChanged { .. }))
        .count();
    assert_eq!(seasons, 2);
}
