use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use warforge::config::ConfigManager;
use warforge::engines::evaluation::{MatchScheduler, PmarsSimulator};
use warforge::engines::generation::{ConsoleProgressCallback, EvolutionEngine};

#[derive(Serialize)]
struct RunSummary {
    generations: usize,
    population_size: usize,
    best_fitness: f64,
    best_generation: usize,
    hall_of_fame_size: usize,
}

const CONFIG_PATH: &str = "warforge.toml";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if Path::new(CONFIG_PATH).exists() {
        manager
            .load_from_file(CONFIG_PATH)
            .with_context(|| format!("loading {}", CONFIG_PATH))?;
    }
    let config = manager.get();
    config.validate()?;

    let simulator = Arc::new(PmarsSimulator::new(&config.arena, config.encoder.core_size));
    let scheduler = MatchScheduler::new(simulator, config.encoder.clone(), config.arena.clone());
    let mut engine = EvolutionEngine::new(
        config.evolution.clone(),
        config.encoder.clone(),
        scheduler,
    );

    let elites = engine.run(ConsoleProgressCallback)?;
    let best = elites
        .first()
        .context("evolution produced no warriors")?;

    std::fs::write("best.red", &best.program).context("writing best.red")?;
    log::info!("Best fitness {:.4}, warrior written to best.red", best.fitness);

    let summary = RunSummary {
        generations: config.evolution.num_generations,
        population_size: config.evolution.population_size,
        best_fitness: best.fitness,
        best_generation: best.generation,
        hall_of_fame_size: elites.len(),
    };
    std::fs::write("run_summary.json", serde_json::to_string_pretty(&summary)?)
        .context("writing run_summary.json")?;

    Ok(())
}
