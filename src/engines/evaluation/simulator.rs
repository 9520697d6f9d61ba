use crate::config::ArenaConfig;
use crate::error::{Result, WarforgeError};
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Capability interface over the battle oracle.
///
/// The real implementation shells out to pMARS; tests substitute mocks so
/// every scheduler property is checkable without an interpreter binary.
pub trait BattleSimulator: Send + Sync {
    /// Fights `program` against `opponent`, leaving the raw textual report
    /// at `report_path`, and returns the report text.
    fn run(&self, program: &Path, opponent: &Path, report_path: &Path) -> Result<String>;
}

/// Subprocess-backed simulator invoking pMARS in batch mode.
#[derive(Debug, Clone)]
pub struct PmarsSimulator {
    pmars_path: std::path::PathBuf,
    rounds: u32,
    core_size: i32,
    timeout: Duration,
}

impl PmarsSimulator {
    pub fn new(arena: &ArenaConfig, core_size: i32) -> Self {
        Self {
            pmars_path: arena.pmars_path.clone(),
            rounds: arena.rounds,
            core_size,
            timeout: Duration::from_secs(arena.match_timeout_secs),
        }
    }
}

impl BattleSimulator for PmarsSimulator {
    fn run(&self, program: &Path, opponent: &Path, report_path: &Path) -> Result<String> {
        let report_file = File::create(report_path)?;

        let mut child = Command::new(&self.pmars_path)
            .arg("-r")
            .arg(self.rounds.to_string())
            .arg("-s")
            .arg(self.core_size.to_string())
            .arg("-b")
            .arg(program)
            .arg(opponent)
            .stdout(Stdio::from(report_file))
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| {
                WarforgeError::Simulation(format!(
                    "Failed to launch {}: {}",
                    self.pmars_path.display(),
                    e
                ))
            })?;

        // Bounded wait: a hung interpreter becomes a lost match, not a hung
        // worker thread.
        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WarforgeError::Simulation(format!(
                        "pMARS timed out after {:?} against {}",
                        self.timeout,
                        opponent.display()
                    )));
                }
                None => std::thread::sleep(Duration::from_millis(10)),
            }
        };

        if !status.success() {
            return Err(WarforgeError::Simulation(format!(
                "pMARS exited with {} against {}",
                status,
                opponent.display()
            )));
        }

        Ok(std::fs::read_to_string(report_path)?)
    }
}
