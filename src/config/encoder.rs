use super::traits::ConfigSection;
use crate::error::WarforgeError;
use serde::{Deserialize, Serialize};

/// Layout and safety constraints for the genome-to-Redcode encoder.
///
/// `instr_count * 5` is the genome length; every genome in a run must have
/// exactly that many genes. The remaining fields tune how aggressively the
/// encoder clamps operands in the executable region versus the payload
/// region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Number of instruction records per warrior.
    pub instr_count: usize,
    /// Leading records the instruction pointer is expected to walk.
    pub safe_code_len: usize,
    /// Size of the simulator core, in cells.
    pub core_size: i32,
    /// Modulo bound for operands of executable-region instructions.
    pub local_operand_bound: i32,
    /// Modulo bound for operands of payload-region instructions.
    pub payload_operand_bound: i32,
    /// Extra cells between the executable region and the nearest bomb target.
    pub bomb_margin: i32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            instr_count: 15,
            safe_code_len: 6,
            core_size: 8000,
            local_operand_bound: 20,
            payload_operand_bound: 400,
            bomb_margin: 10,
        }
    }
}

impl EncoderConfig {
    /// Genome length implied by this layout.
    pub fn genome_len(&self) -> usize {
        self.instr_count * crate::engines::generation::genome::INSTR_FIELDS
    }
}

impl ConfigSection for EncoderConfig {
    fn section_name() -> &'static str {
        "encoder"
    }

    fn validate(&self) -> Result<(), WarforgeError> {
        if self.instr_count == 0 {
            return Err(WarforgeError::Configuration(
                "Instruction count must be at least 1".to_string(),
            ));
        }
        if self.safe_code_len == 0 || self.safe_code_len >= self.instr_count {
            return Err(WarforgeError::Configuration(format!(
                "Executable region length {} must be in 1..{}",
                self.safe_code_len, self.instr_count
            )));
        }
        if self.local_operand_bound <= 0 || self.payload_operand_bound <= 0 {
            return Err(WarforgeError::Configuration(
                "Operand bounds must be positive".to_string(),
            ));
        }
        if self.bomb_margin < 0 {
            return Err(WarforgeError::Configuration(
                "Bomb margin must not be negative".to_string(),
            ));
        }
        let first_bomb_target = self.safe_code_len as i32 + self.bomb_margin;
        if first_bomb_target >= self.core_size {
            return Err(WarforgeError::Configuration(format!(
                "Core size {} leaves no room for bomb targets past cell {}",
                self.core_size, first_bomb_target
            )));
        }
        Ok(())
    }
}
