use super::traits::ConfigSection;
use crate::error::WarforgeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub num_generations: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_count: usize,
    pub tournament_size: usize,
    /// Generations below this threshold mutate operand fields only, with
    /// small deltas; later generations widen the deltas and touch opcode
    /// fields too.
    pub wide_mutation_generation: usize,
    pub hall_of_fame_size: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            num_generations: 20,
            mutation_rate: 0.05,
            crossover_rate: 0.9,
            elitism_count: 2,
            tournament_size: 3,
            wide_mutation_generation: 5,
            hall_of_fame_size: 5,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), WarforgeError> {
        if self.population_size < 2 {
            return Err(WarforgeError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(WarforgeError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(WarforgeError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if self.elitism_count >= self.population_size {
            return Err(WarforgeError::Configuration(
                "Elitism count must be smaller than the population".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(WarforgeError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
