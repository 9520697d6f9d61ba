use crate::config::EncoderConfig;
use crate::error::{Result, WarforgeError};

/// Genome representation for warrior evolution
///
/// A genome is a flat sequence of signed integers that deterministically maps
/// to a Redcode program. Every 5 consecutive genes form one instruction
/// record:
///
/// `[ opcode_raw, a_mode_raw, a_value, b_mode_raw, b_value ]`
///
/// # Why a flat integer vector instead of structured instructions?
///
/// Genetic algorithms work best on simple, linear structures:
/// - **Crossover**: swapping genome segments is trivial (array slicing)
/// - **Mutation**: changing individual genes is straightforward
/// - **No invalid states**: any gene value decodes to a valid instruction,
///   because every decode step uses a wrapped modulo projection
///
/// Mutation is free to push genes outside enum boundaries or make them
/// negative; the encoder's projections absorb that by design.
pub type Genome = Vec<i32>;

/// Genes per instruction record.
pub const INSTR_FIELDS: usize = 5;

/// Maps any integer into `[0, n)`, including negatives.
pub fn wrapped_mod(x: i32, n: i32) -> i32 {
    debug_assert!(n > 0);
    ((x % n) + n) % n
}

/// Rejects genomes whose length disagrees with the configured instruction
/// count. This is a startup contract check; it must never be silently
/// tolerated by truncating.
pub fn check_genome_len(genome: &Genome, config: &EncoderConfig) -> Result<()> {
    let expected = config.genome_len();
    if genome.len() != expected {
        return Err(WarforgeError::Configuration(format!(
            "Genome length {} does not match {} instructions x {} fields = {}",
            genome.len(),
            config.instr_count,
            INSTR_FIELDS,
            expected
        )));
    }
    Ok(())
}
