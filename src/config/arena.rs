use super::traits::ConfigSection;
use crate::error::WarforgeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and how battles are fought: the pMARS binary, the fixed opponent
/// roster, and the fitness reduction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Path to the pMARS executable.
    pub pmars_path: PathBuf,
    /// Opponent warrior files, battled in order.
    pub opponents: Vec<PathBuf>,
    /// Rounds per match (`pmars -r`).
    pub rounds: u32,
    /// Weight of the variance penalty in the fitness reduction.
    pub variance_lambda: f64,
    /// Directory for per-job program and report files.
    pub work_dir: PathBuf,
    /// Wall-clock budget for one pMARS invocation before it counts as lost.
    pub match_timeout_secs: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            pmars_path: PathBuf::from("pmars"),
            opponents: vec![
                PathBuf::from("warriors/dwarf.red"),
                PathBuf::from("warriors/imp.red"),
                PathBuf::from("warriors/paper.red"),
            ],
            rounds: 50,
            variance_lambda: 0.1,
            work_dir: PathBuf::from("tmp"),
            match_timeout_secs: 30,
        }
    }
}

impl ConfigSection for ArenaConfig {
    fn section_name() -> &'static str {
        "arena"
    }

    fn validate(&self) -> Result<(), WarforgeError> {
        if self.opponents.is_empty() {
            return Err(WarforgeError::Configuration(
                "Opponent roster must not be empty".to_string(),
            ));
        }
        if self.rounds == 0 {
            return Err(WarforgeError::Configuration(
                "Round count must be at least 1".to_string(),
            ));
        }
        if self.variance_lambda < 0.0 {
            return Err(WarforgeError::Configuration(
                "Variance lambda must not be negative".to_string(),
            ));
        }
        if self.match_timeout_secs == 0 {
            return Err(WarforgeError::Configuration(
                "Match timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}
