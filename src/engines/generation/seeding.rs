use crate::config::EncoderConfig;
use crate::engines::generation::encoder::OpcodeKind;
use crate::engines::generation::genome::{Genome, INSTR_FIELDS};
use rand::Rng;

/// Hand-designed anchor records copied into the head of every fresh genome.
///
/// This is the classic Dwarf skeleton (ADD / MOV / JMP plus a data cell),
/// a program known to survive long enough for selection to work with.
/// Encoder safety rules still apply on top, so the emitted head may differ
/// from a textbook Dwarf, but the structure biases early search toward
/// viable control flow.
const DWARF_SEED: [[i32; INSTR_FIELDS]; 4] = [
    [OpcodeKind::Add as i32, 0, 4, 1, 3],
    [OpcodeKind::Mov as i32, 1, 2, 2, 2],
    [OpcodeKind::Jmp as i32, 1, -2, 0, 0],
    [OpcodeKind::Dat as i32, 0, 0, 0, 33],
];

/// Safe default opcodes for the records past the seed pattern, most
/// survivable first. Weights favour MOV, then JMP, then SPL, then DAT.
const FILL_OPCODES: [(OpcodeKind, u32); 4] = [
    (OpcodeKind::Mov, 6),
    (OpcodeKind::Jmp, 3),
    (OpcodeKind::Spl, 2),
    (OpcodeKind::Dat, 1),
];

const SMALL_DELTA: i32 = 5;
const WIDE_DELTA: i32 = 25;
const FILL_OPERAND_RANGE: i32 = 100;

fn weighted_fill_opcode<R: Rng>(rng: &mut R) -> i32 {
    let total: u32 = FILL_OPCODES.iter().map(|(_, w)| w).sum();
    let mut spin = rng.gen_range(0..total);
    for (kind, weight) in FILL_OPCODES {
        if spin < weight {
            return kind as i32;
        }
        spin -= weight;
    }
    OpcodeKind::Mov as i32
}

/// Random delta for one gene under the generation-staged policy. Returns 0
/// when this field must not move yet.
fn field_delta<R: Rng>(
    field: usize,
    generation: usize,
    wide_generation: usize,
    rng: &mut R,
) -> i32 {
    let wide = generation >= wide_generation;
    if field == 0 && !wide {
        // Opcode fields stay anchored until the population has had time to
        // establish viable structure.
        return 0;
    }
    let magnitude = if wide { WIDE_DELTA } else { SMALL_DELTA };
    rng.gen_range(-magnitude..=magnitude)
}

/// Population seeding hook: Dwarf pattern up front, weighted safe defaults
/// behind it, then one jitter pass so individuals of the same generation do
/// not collapse into identical genomes.
pub fn seed_genome<R: Rng>(
    config: &EncoderConfig,
    generation: usize,
    wide_generation: usize,
    rng: &mut R,
) -> Genome {
    let mut genome = Vec::with_capacity(config.genome_len());

    for index in 0..config.instr_count {
        if index < DWARF_SEED.len() {
            genome.extend_from_slice(&DWARF_SEED[index]);
        } else {
            genome.push(weighted_fill_opcode(rng));
            for _ in 1..INSTR_FIELDS {
                genome.push(rng.gen_range(-FILL_OPERAND_RANGE..=FILL_OPERAND_RANGE));
            }
        }
    }

    // Jitter value fields so the anchor is a bias, not a clone factory.
    // Opcode and mode genes stay put at init; mutation perturbs them later.
    for (i, gene) in genome.iter_mut().enumerate() {
        let field = i % INSTR_FIELDS;
        if field == 2 || field == 4 {
            *gene += field_delta(field, generation, wide_generation, rng);
        }
    }

    genome
}

/// Mutation hook: each gene moves with probability `mutation_rate`, with the
/// same generation-staged magnitude rule as seeding. Mutates in place and
/// returns the number of genes actually changed.
pub fn mutate_genome<R: Rng>(
    genome: &mut Genome,
    generation: usize,
    wide_generation: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> usize {
    let mut changed = 0;
    for (i, gene) in genome.iter_mut().enumerate() {
        if rng.gen::<f64>() >= mutation_rate {
            continue;
        }
        let delta = field_delta(i % INSTR_FIELDS, generation, wide_generation, rng);
        if delta != 0 {
            *gene += delta;
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn seeded_genome_has_contract_length() {
        let config = EncoderConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let genome = seed_genome(&config, 0, 5, &mut rng);
        assert_eq!(genome.len(), config.genome_len());
    }

    #[test]
    fn seed_head_is_dwarf_shaped() {
        let config = EncoderConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let genome = seed_genome(&config, 0, 5, &mut rng);
        assert_eq!(OpcodeKind::from_raw(genome[0]), OpcodeKind::Add);
        assert_eq!(OpcodeKind::from_raw(genome[INSTR_FIELDS]), OpcodeKind::Mov);
        assert_eq!(
            OpcodeKind::from_raw(genome[2 * INSTR_FIELDS]),
            OpcodeKind::Jmp
        );
    }

    #[test]
    fn fill_opcodes_stay_in_safe_set() {
        let config = EncoderConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let genome = seed_genome(&config, 0, 5, &mut rng);
        for index in DWARF_SEED.len()..config.instr_count {
            let kind = OpcodeKind::from_raw(genome[index * INSTR_FIELDS]);
            assert!(
                matches!(
                    kind,
                    OpcodeKind::Mov | OpcodeKind::Jmp | OpcodeKind::Spl | OpcodeKind::Dat
                ),
                "unexpected fill opcode {:?}",
                kind
            );
        }
    }

    #[test]
    fn early_mutation_never_touches_opcode_fields() {
        let config = EncoderConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut genome = seed_genome(&config, 0, 5, &mut rng);
        let opcodes_before: Vec<i32> = genome.iter().step_by(INSTR_FIELDS).copied().collect();

        // Mutation rate 1.0 hits every gene the policy allows.
        mutate_genome(&mut genome, 0, 5, 1.0, &mut rng);

        let opcodes_after: Vec<i32> = genome.iter().step_by(INSTR_FIELDS).copied().collect();
        assert_eq!(opcodes_before, opcodes_after);
    }

    #[test]
    fn late_mutation_reports_changed_gene_count() {
        let config = EncoderConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut genome = seed_genome(&config, 10, 5, &mut rng);
        let before = genome.clone();
        let changed = mutate_genome(&mut genome, 10, 5, 1.0, &mut rng);
        let diff = genome.iter().zip(&before).filter(|(a, b)| a != b).count();
        assert_eq!(changed, diff);
        assert!(changed > 0);
    }
}
