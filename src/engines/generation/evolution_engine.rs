use crate::config::{EncoderConfig, EvolutionConfig};
use crate::engines::evaluation::MatchScheduler;
use crate::engines::generation::{
    encoder::encode,
    genome::{check_genome_len, Genome},
    hall_of_fame::{EliteWarrior, HallOfFame},
    operators::{crossover, tournament_selection},
    seeding::{mutate_genome, seed_genome},
};
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_size: usize);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_size: usize) {
        (**self).on_generation_complete(generation, best_fitness, hall_size);
    }
}

/// The population-search driver.
///
/// Owns generation counting, selection and crossover, and calls the three
/// core hooks: `seed_genome` to build the initial population,
/// `MatchScheduler::evaluate` for fitness, and `mutate_genome` on offspring
/// between generations.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    encoder_config: EncoderConfig,
    scheduler: MatchScheduler,
    hall_of_fame: HallOfFame,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(
        config: EvolutionConfig,
        encoder_config: EncoderConfig,
        scheduler: MatchScheduler,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let hall_of_fame = HallOfFame::new(config.hall_of_fame_size);

        Self {
            config,
            encoder_config,
            scheduler,
            hall_of_fame,
            rng,
        }
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<Vec<EliteWarrior>> {
        let mut population = self.initialize_population();

        // Startup contract check: a genome/config mismatch must never be
        // silently truncated by the encoder.
        for genome in &population {
            check_genome_len(genome, &self.encoder_config)?;
        }

        for generation in 0..self.config.num_generations {
            callback.on_generation_start(generation);

            let evaluated = self.evaluate_population(&population);

            for (genome, fitness) in &evaluated {
                let elite = EliteWarrior {
                    genome: genome.clone(),
                    fitness: *fitness,
                    program: encode(genome, &self.encoder_config),
                    generation,
                };
                self.hall_of_fame.try_add(elite);
            }

            let best_fitness = evaluated
                .iter()
                .map(|(_, f)| *f)
                .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .unwrap_or(0.0);

            callback.on_generation_complete(generation, best_fitness, self.hall_of_fame.len());

            if generation == self.config.num_generations - 1 {
                break;
            }

            population = self.create_next_generation(&evaluated, generation);
        }

        Ok(self.hall_of_fame.get_all().to_vec())
    }

    fn initialize_population(&mut self) -> Vec<Genome> {
        (0..self.config.population_size)
            .map(|_| {
                seed_genome(
                    &self.encoder_config,
                    0,
                    self.config.wide_mutation_generation,
                    &mut self.rng,
                )
            })
            .collect()
    }

    /// Fitness for the whole population, one scheduler evaluation per
    /// genome, spread across the rayon pool. Each evaluation owns its
    /// job-keyed files, so concurrent evaluations never interfere.
    fn evaluate_population(&self, population: &[Genome]) -> Vec<(Genome, f64)> {
        population
            .par_iter()
            .map(|genome| (genome.clone(), self.scheduler.evaluate(genome)))
            .collect()
    }

    fn create_next_generation(
        &mut self,
        evaluated: &[(Genome, f64)],
        generation: usize,
    ) -> Vec<Genome> {
        let mut next_generation = Vec::with_capacity(self.config.population_size);

        // Elitism: copy top performers
        let mut sorted: Vec<&(Genome, f64)> = evaluated.iter().collect();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (genome, _) in sorted.iter().take(self.config.elitism_count) {
            next_generation.push(genome.clone());
        }

        while next_generation.len() < self.config.population_size {
            if self.rng.gen::<f64>() < self.config.crossover_rate {
                let parent1 =
                    tournament_selection(evaluated, self.config.tournament_size, &mut self.rng);
                let parent2 =
                    tournament_selection(evaluated, self.config.tournament_size, &mut self.rng);

                let (mut child1, mut child2) = crossover(&parent1, &parent2, &mut self.rng);

                self.mutate(&mut child1, generation);
                self.mutate(&mut child2, generation);

                next_generation.push(child1);
                if next_generation.len() < self.config.population_size {
                    next_generation.push(child2);
                }
            } else {
                // Reproduction (copy)
                let mut child =
                    tournament_selection(evaluated, self.config.tournament_size, &mut self.rng);
                self.mutate(&mut child, generation);
                next_generation.push(child);
            }
        }

        next_generation.truncate(self.config.population_size);
        next_generation
    }

    fn mutate(&mut self, genome: &mut Genome, generation: usize) {
        let changed = mutate_genome(
            genome,
            generation,
            self.config.wide_mutation_generation,
            self.config.mutation_rate,
            &mut self.rng,
        );
        log::debug!("Mutated {} genes", changed);
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }
}
