//! Property tests for generation, the pheromone field and ant carrying

use proptest::prelude::*;

use formicary::core::config::{GenerationConfig, PheromoneConfig};
use formicary::core::types::GridPos;
use formicary::simulation::ColonyOrchestrator;
use formicary::world::{generate, Deposit, PheromoneField, Terrain, Trail};
use formicary::SimulationConfig;

fn small_world() -> GenerationConfig {
    GenerationConfig {
        cols: 32,
        rows: 24,
        nests: vec![GridPos::new(16, 14)],
        rock_formations: 3,
        caverns: 2,
        food_clusters: 2,
        ..GenerationConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generation_is_deterministic(seed in any::<u64>()) {
        let config = small_world();
        let a = generate(seed, &config, &[]).unwrap();
        let b = generate(seed, &config, &[]).unwrap();
        prop_assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn pheromone_mass_strictly_decreases(
        drops in prop::collection::vec((0usize..400, 0.01f32..1.0), 1..40),
        dt in 0.5f32..2.0,
        eight in any::<bool>(),
    ) {
        let cells = vec![Terrain::Air; 400];
        let mut config = PheromoneConfig::default();
        if eight {
            config.neighborhood = formicary::core::config::Neighborhood::Eight;
        }
        let mut field = PheromoneField::new(20, 20);
        for (index, amount) in drops {
            field.deposit(Deposit { index, trail: Trail::Food, amount }, config.max_strength);
        }

        let mut mass = field.total_mass(Trail::Food);
        for _ in 0..60 {
            field.step(&cells, &config, dt);
            let next = field.total_mass(Trail::Food);
            prop_assert!(field.trail(Trail::Food).iter().all(|v| *v >= 0.0 && v.is_finite()));
            if mass > 0.0 {
                prop_assert!(next < mass, "mass grew from {} to {}", mass, next);
            }
            mass = next;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn carry_never_exceeds_max(seed in any::<u64>(), max_carry in 0.2f32..3.0) {
        let mut config = SimulationConfig {
            world: small_world(),
            ..SimulationConfig::default()
        };
        config.ants.max_carry = max_carry;
        config.colony.initial_ants = 15;
        let mut sim = ColonyOrchestrator::new(seed, config).unwrap();

        for _ in 0..150 {
            sim.tick(1.0);
            prop_assert!(sim
                .ants()
                .iter()
                .all(|a| a.carry >= 0.0 && a.carry <= max_carry));
        }
    }
}
