use std::path::{Path, PathBuf};
use std::sync::Arc;
use warforge::config::{ArenaConfig, EncoderConfig, EvolutionConfig};
use warforge::engines::evaluation::{BattleSimulator, MatchScheduler};
use warforge::engines::generation::{EvolutionEngine, ProgressCallback};
use warforge::error::{Result, WarforgeError};

/// Oracle stand-in: every opponent reports the same canned result, except
/// the ones listed as failing.
struct ScriptedSimulator {
    report: String,
    failing: Vec<PathBuf>,
}

impl BattleSimulator for ScriptedSimulator {
    fn run(&self, _program: &Path, opponent: &Path, _report: &Path) -> Result<String> {
        if self.failing.iter().any(|f| f == opponent) {
            return Err(WarforgeError::Simulation("exit status 1".to_string()));
        }
        Ok(self.report.clone())
    }
}

struct TestProgressCallback {
    generations_seen: usize,
}

impl ProgressCallback for TestProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_size: usize) {
        self.generations_seen = generation + 1;
        println!(
            "Generation {}: best fitness = {:.4}, hall size = {}",
            generation + 1,
            best_fitness,
            hall_size
        );
    }
}

fn test_configs(work_dir: &Path) -> (EvolutionConfig, EncoderConfig, ArenaConfig) {
    let evolution = EvolutionConfig {
        population_size: 6,
        num_generations: 3,
        mutation_rate: 0.05,
        crossover_rate: 0.9,
        elitism_count: 1,
        tournament_size: 3,
        wide_mutation_generation: 2,
        hall_of_fame_size: 4,
        seed: Some(42),
    };
    let encoder = EncoderConfig::default();
    let arena = ArenaConfig {
        opponents: vec![
            PathBuf::from("a.red"),
            PathBuf::from("b.red"),
            PathBuf::from("c.red"),
        ],
        work_dir: work_dir.to_path_buf(),
        ..ArenaConfig::default()
    };
    (evolution, encoder, arena)
}

#[test]
fn evolution_runs_to_completion_against_mock_oracle() {
    let dir = tempfile::tempdir().unwrap();
    let (evolution, encoder, arena) = test_configs(dir.path());

    let simulator = Arc::new(ScriptedSimulator {
        report: "Results: 50 0 0\n".to_string(),
        failing: Vec::new(),
    });
    let scheduler = MatchScheduler::new(simulator, encoder.clone(), arena);
    let mut engine = EvolutionEngine::new(evolution, encoder, scheduler);

    let mut callback = TestProgressCallback { generations_seen: 0 };
    let elites = engine.run(&mut callback).expect("evolution failed");

    assert!(!elites.is_empty(), "should have found at least one warrior");
    // Every match is a clean sweep, so the best fitness is exactly the
    // zero-variance mean of 1.0.
    let best = &elites[0];
    assert!((best.fitness - 1.0).abs() < 1e-12, "fitness {}", best.fitness);
    assert!(best.program.contains("ORG 0"));
    assert_eq!(best.program.lines().count(), 2 + 15);
}

#[test]
fn failing_opponent_never_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let (evolution, encoder, arena) = test_configs(dir.path());

    let simulator = Arc::new(ScriptedSimulator {
        report: "Results: 50 0 0\n".to_string(),
        failing: vec![PathBuf::from("b.red")],
    });
    let scheduler = MatchScheduler::new(simulator, encoder.clone(), arena);
    let mut engine = EvolutionEngine::new(evolution, encoder, scheduler);

    let mut callback = TestProgressCallback { generations_seen: 0 };
    let elites = engine.run(&mut callback).expect("evolution failed");

    assert_eq!(callback.generations_seen, 3);
    for warrior in &elites {
        assert!(warrior.fitness.is_finite());
        // One guaranteed loss keeps every fitness below the clean-sweep line.
        assert!(warrior.fitness < 1.0);
    }
}

#[test]
fn malformed_reports_degrade_to_worst_case_fitness() {
    let dir = tempfile::tempdir().unwrap();
    let (evolution, encoder, arena) = test_configs(dir.path());
    let lambda = arena.variance_lambda;

    let simulator = Arc::new(ScriptedSimulator {
        report: "garbage with no contract line\n".to_string(),
        failing: Vec::new(),
    });
    let scheduler = MatchScheduler::new(simulator, encoder.clone(), arena);
    let mut engine = EvolutionEngine::new(evolution, encoder, scheduler);

    let mut callback = TestProgressCallback { generations_seen: 0 };
    let elites = engine.run(&mut callback).expect("evolution failed");

    assert!(lambda >= 0.0);
    for warrior in &elites {
        // All losses against every opponent: mean -1.0, variance 0.
        assert!((warrior.fitness + 1.0).abs() < 1e-12, "fitness {}", warrior.fitness);
    }
}
