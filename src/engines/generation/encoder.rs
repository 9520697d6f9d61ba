use crate::config::EncoderConfig;
use crate::engines::generation::genome::{wrapped_mod, Genome, INSTR_FIELDS};
use std::fmt::Write;

/// The sixteen Redcode instruction kinds the decoder can produce.
///
/// Discriminant order matters: `from_raw` projects a raw gene onto this
/// order, and the seeding tables in `seeding.rs` store these discriminants
/// directly in opcode genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeKind {
    Mov,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Jmp,
    Jmz,
    Jmn,
    Djn,
    Spl,
    Seq,
    Sne,
    Slt,
    Nop,
    Dat,
}

pub const OPCODE_COUNT: i32 = 16;

const OPCODES: [OpcodeKind; OPCODE_COUNT as usize] = [
    OpcodeKind::Mov,
    OpcodeKind::Add,
    OpcodeKind::Sub,
    OpcodeKind::Mul,
    OpcodeKind::Div,
    OpcodeKind::Mod,
    OpcodeKind::Jmp,
    OpcodeKind::Jmz,
    OpcodeKind::Jmn,
    OpcodeKind::Djn,
    OpcodeKind::Spl,
    OpcodeKind::Seq,
    OpcodeKind::Sne,
    OpcodeKind::Slt,
    OpcodeKind::Nop,
    OpcodeKind::Dat,
];

impl OpcodeKind {
    /// Wrapped-modulo projection: any raw gene, including negatives produced
    /// by mutation, maps to a valid kind. Lossy and many-to-one on purpose.
    pub fn from_raw(raw: i32) -> Self {
        OPCODES[wrapped_mod(raw, OPCODE_COUNT) as usize]
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpcodeKind::Mov => "MOV",
            OpcodeKind::Add => "ADD",
            OpcodeKind::Sub => "SUB",
            OpcodeKind::Mul => "MUL",
            OpcodeKind::Div => "DIV",
            OpcodeKind::Mod => "MOD",
            OpcodeKind::Jmp => "JMP",
            OpcodeKind::Jmz => "JMZ",
            OpcodeKind::Jmn => "JMN",
            OpcodeKind::Djn => "DJN",
            OpcodeKind::Spl => "SPL",
            OpcodeKind::Seq => "SEQ",
            OpcodeKind::Sne => "SNE",
            OpcodeKind::Slt => "SLT",
            OpcodeKind::Nop => "NOP",
            OpcodeKind::Dat => "DAT",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            OpcodeKind::Add | OpcodeKind::Sub | OpcodeKind::Mul | OpcodeKind::Div | OpcodeKind::Mod
        )
    }

    /// JMP, SPL and DAT are emitted with a single operand; everything else
    /// takes two.
    pub fn single_operand(self) -> bool {
        matches!(self, OpcodeKind::Jmp | OpcodeKind::Spl | OpcodeKind::Dat)
    }
}

/// Redcode addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    Immediate,
    Direct,
    AIndirect,
    BIndirect,
    Predecrement,
    Postincrement,
}

impl AddrMode {
    pub fn symbol(self) -> char {
        match self {
            AddrMode::Immediate => '#',
            AddrMode::Direct => '$',
            AddrMode::AIndirect => '*',
            AddrMode::BIndirect => '@',
            AddrMode::Predecrement => '<',
            AddrMode::Postincrement => '>',
        }
    }
}

/// Which part of the warrior an instruction record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Leading records the instruction pointer is expected to walk.
    Executable,
    /// Trailing records holding bombs and attack data.
    Payload,
}

impl Region {
    pub fn of(index: usize, config: &EncoderConfig) -> Self {
        if index < config.safe_code_len {
            Region::Executable
        } else {
            Region::Payload
        }
    }
}

/// Indirection inside the executable region overwhelmingly resolves back
/// into the warrior's own code, so it is only allowed in the payload.
const EXEC_MODES: [AddrMode; 2] = [AddrMode::Immediate, AddrMode::Direct];
const PAYLOAD_MODES: [AddrMode; 3] = [AddrMode::Immediate, AddrMode::Direct, AddrMode::BIndirect];

fn pick_mode(raw: i32, region: Region) -> AddrMode {
    let allowed: &[AddrMode] = match region {
        Region::Executable => &EXEC_MODES,
        Region::Payload => &PAYLOAD_MODES,
    };
    allowed[wrapped_mod(raw, allowed.len() as i32) as usize]
}

/// Safety constraint selected for one `(kind, region)` pair.
///
/// Every encoder rule is a row in this table, so each rule is testable on
/// its own without running the full encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionPolicy {
    /// Emit the instruction as decoded, clamped to the region's mode set and
    /// operand bound.
    Plain,
    /// A DAT in the executable region halts the warrior the moment the
    /// instruction pointer reaches it; emit NOP instead.
    SubstituteNop,
    /// DAT in the payload is a weapon: force an immediate operand aimed past
    /// the executable region, out at the opponent.
    Bomb,
    /// SPL in the executable region must fork strictly forward within the
    /// region, or become NOP when there is no room left.
    ForkAhead,
    /// Executable-region arithmetic would corrupt live instructions; its
    /// destination is redirected into the payload records.
    RedirectDestination,
}

/// The `(OpcodeKind, Region)` constraint table.
pub fn policy(kind: OpcodeKind, region: Region) -> InstructionPolicy {
    match (kind, region) {
        (OpcodeKind::Dat, Region::Executable) => InstructionPolicy::SubstituteNop,
        (OpcodeKind::Dat, Region::Payload) => InstructionPolicy::Bomb,
        (OpcodeKind::Spl, Region::Executable) => InstructionPolicy::ForkAhead,
        (k, Region::Executable) if k.is_arithmetic() => InstructionPolicy::RedirectDestination,
        _ => InstructionPolicy::Plain,
    }
}

/// Compiles a genome into a Redcode listing.
///
/// Encoding is total and fully deterministic: every decode step is a wrapped
/// projection, and all choices (including addressing modes and operand
/// offsets) are derived from genome fields, so re-encoding the same genome
/// always yields byte-identical text.
///
/// Precondition: `genome.len() == config.genome_len()`, enforced at startup
/// by `check_genome_len`.
pub fn encode(genome: &Genome, config: &EncoderConfig) -> String {
    debug_assert_eq!(genome.len(), config.genome_len());

    let mut out = String::with_capacity(32 * config.instr_count);
    out.push_str("; evolved by warforge\n");
    out.push_str("ORG 0\n");

    for (index, record) in genome.chunks_exact(INSTR_FIELDS).enumerate() {
        let line = encode_record(index, record, config);
        out.push_str(&line);
        out.push('\n');
    }

    out
}

fn encode_record(index: usize, record: &[i32], config: &EncoderConfig) -> String {
    let kind = OpcodeKind::from_raw(record[0]);
    let region = Region::of(index, config);

    match policy(kind, region) {
        InstructionPolicy::SubstituteNop => plain_line(OpcodeKind::Nop, region, record, config),
        InstructionPolicy::Plain => plain_line(kind, region, record, config),
        InstructionPolicy::Bomb => bomb_line(record, config),
        InstructionPolicy::ForkAhead => fork_line(index, record, config),
        InstructionPolicy::RedirectDestination => redirect_line(kind, index, record, config),
    }
}

fn operand_bound(region: Region, config: &EncoderConfig) -> i32 {
    match region {
        // Small offsets keep executable-region control flow local.
        Region::Executable => config.local_operand_bound,
        // Payload operands get reach across the core.
        Region::Payload => config.payload_operand_bound,
    }
}

fn plain_line(kind: OpcodeKind, region: Region, record: &[i32], config: &EncoderConfig) -> String {
    let bound = operand_bound(region, config);
    let a_mode = pick_mode(record[1], region);
    let a_value = wrapped_mod(record[2], bound);

    let mut line = String::new();
    let _ = write!(line, "{} {}{}", kind.mnemonic(), a_mode.symbol(), a_value);
    if !kind.single_operand() {
        let b_mode = pick_mode(record[3], region);
        let b_value = wrapped_mod(record[4], bound);
        let _ = write!(line, ", {}{}", b_mode.symbol(), b_value);
    }
    line
}

/// Bomb targets are drawn from `[safe_code_len + margin, core_size)`:
/// guaranteed outside our own executable region, likely in enemy territory.
fn bomb_line(record: &[i32], config: &EncoderConfig) -> String {
    let floor = config.safe_code_len as i32 + config.bomb_margin;
    let span = config.core_size - floor;
    let target = floor + wrapped_mod(record[4], span);
    format!("DAT #{}", target)
}

fn fork_line(index: usize, record: &[i32], config: &EncoderConfig) -> String {
    // Room to fork strictly forward while staying inside the region.
    let room = config.safe_code_len as i32 - index as i32 - 1;
    if room <= 0 {
        return plain_line(OpcodeKind::Nop, Region::Executable, record, config);
    }
    let offset = 1 + wrapped_mod(record[2], room);
    format!("SPL ${}", offset)
}

fn redirect_line(
    kind: OpcodeKind,
    index: usize,
    record: &[i32],
    config: &EncoderConfig,
) -> String {
    let a_mode = pick_mode(record[1], Region::Executable);
    let a_value = wrapped_mod(record[2], config.local_operand_bound);

    // Destination is forced to a direct address of a payload record, so the
    // mutated cell never holds a live instruction.
    let payload_span = (config.instr_count - config.safe_code_len) as i32;
    let dest_index = config.safe_code_len as i32 + wrapped_mod(record[4], payload_span);
    let offset = dest_index - index as i32;

    format!(
        "{} {}{}, ${}",
        kind.mnemonic(),
        a_mode.symbol(),
        a_value,
        offset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;

    fn config() -> EncoderConfig {
        EncoderConfig::default()
    }

    fn record(op: i32, am: i32, av: i32, bm: i32, bv: i32) -> [i32; 5] {
        [op, am, av, bm, bv]
    }

    #[test]
    fn opcode_projection_is_total() {
        assert_eq!(OpcodeKind::from_raw(0), OpcodeKind::Mov);
        assert_eq!(OpcodeKind::from_raw(15), OpcodeKind::Dat);
        assert_eq!(OpcodeKind::from_raw(16), OpcodeKind::Mov);
        assert_eq!(OpcodeKind::from_raw(-1), OpcodeKind::Dat);
        assert_eq!(OpcodeKind::from_raw(i32::MIN + 1), OpcodeKind::from_raw(-1));
    }

    #[test]
    fn policy_table_rows() {
        assert_eq!(
            policy(OpcodeKind::Dat, Region::Executable),
            InstructionPolicy::SubstituteNop
        );
        assert_eq!(policy(OpcodeKind::Dat, Region::Payload), InstructionPolicy::Bomb);
        assert_eq!(
            policy(OpcodeKind::Spl, Region::Executable),
            InstructionPolicy::ForkAhead
        );
        assert_eq!(policy(OpcodeKind::Spl, Region::Payload), InstructionPolicy::Plain);
        assert_eq!(
            policy(OpcodeKind::Add, Region::Executable),
            InstructionPolicy::RedirectDestination
        );
        assert_eq!(policy(OpcodeKind::Add, Region::Payload), InstructionPolicy::Plain);
        assert_eq!(policy(OpcodeKind::Mov, Region::Executable), InstructionPolicy::Plain);
        assert_eq!(policy(OpcodeKind::Jmp, Region::Payload), InstructionPolicy::Plain);
    }

    #[test]
    fn dat_in_executable_region_becomes_nop() {
        let cfg = config();
        let line = encode_record(0, &record(15, 0, 1, 1, 2), &cfg);
        assert!(line.starts_with("NOP "), "got: {}", line);
    }

    #[test]
    fn payload_bomb_targets_past_executable_region() {
        let cfg = config();
        for bv in [-5000, -1, 0, 3, 7999, 123456] {
            let line = encode_record(cfg.safe_code_len + 1, &record(15, 0, 0, 0, bv), &cfg);
            let target: i32 = line
                .strip_prefix("DAT #")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(|| panic!("not a bomb line: {}", line));
            let floor = cfg.safe_code_len as i32 + cfg.bomb_margin;
            assert!(target >= floor && target < cfg.core_size, "target {}", target);
        }
    }

    #[test]
    fn split_forks_strictly_forward_inside_region() {
        let cfg = config();
        for index in 0..cfg.safe_code_len - 1 {
            for av in [-100, -1, 0, 1, 99] {
                let line = encode_record(index, &record(10, 0, av, 0, 0), &cfg);
                let offset: i32 = line
                    .strip_prefix("SPL $")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| panic!("not a fork line: {}", line));
                let target = index as i32 + offset;
                assert!(offset >= 1);
                assert!((target as usize) < cfg.safe_code_len, "target {}", target);
            }
        }
    }

    #[test]
    fn split_with_no_room_becomes_nop() {
        let cfg = config();
        let line = encode_record(cfg.safe_code_len - 1, &record(10, 0, 3, 0, 0), &cfg);
        assert!(line.starts_with("NOP "), "got: {}", line);
    }

    #[test]
    fn executable_arithmetic_destination_lands_in_payload() {
        let cfg = config();
        for (op, index) in [(1, 0), (2, 1), (3, 2), (4, 3), (5, 5)] {
            for bv in [-400, -1, 0, 8, 399] {
                let line = encode_record(index, &record(op, 0, 4, 1, bv), &cfg);
                let offset: i32 = line
                    .rsplit('$')
                    .next()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| panic!("no direct destination: {}", line));
                let dest = index as i32 + offset;
                assert!(dest >= cfg.safe_code_len as i32, "dest {}", dest);
                assert!(dest < cfg.instr_count as i32, "dest {}", dest);
            }
        }
    }

    #[test]
    fn executable_region_modes_never_indirect() {
        let cfg = config();
        for raw in -12..12 {
            let mode = pick_mode(raw, Region::Executable);
            assert!(matches!(mode, AddrMode::Immediate | AddrMode::Direct));
        }
    }

    #[test]
    fn encode_emits_one_line_per_record() {
        let cfg = config();
        let genome: Genome = (0..cfg.genome_len() as i32).map(|g| g * 7 - 50).collect();
        let text = encode(&genome, &cfg);
        let lines: Vec<&str> = text.lines().collect();
        // comment + ORG + instructions
        assert_eq!(lines.len(), 2 + cfg.instr_count);
        assert_eq!(lines[1], "ORG 0");
    }

    #[test]
    fn encoding_is_deterministic() {
        let cfg = config();
        let genome: Genome = (0..cfg.genome_len() as i32).map(|g| g * 31 - 900).collect();
        assert_eq!(encode(&genome, &cfg), encode(&genome, &cfg));
    }
}
