use crate::engines::generation::evolution_engine::ProgressCallback;

/// Logs generation progress through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::info!("Generation {} starting", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_size: usize) {
        log::info!(
            "Generation {} complete: best fitness {:.4}, hall of fame size {}",
            generation + 1,
            best_fitness,
            hall_size
        );
    }
}
