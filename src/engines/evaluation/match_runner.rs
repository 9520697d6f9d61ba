use crate::engines::evaluation::report::{parse_report, ReportParse};
use crate::engines::evaluation::simulator::BattleSimulator;
use std::path::{Path, PathBuf};

/// Result of one (warrior, opponent) match.
///
/// Produced exactly once per match and never mutated after parse. Failures
/// of any kind collapse to `all_losses`, so the scheduler's reduction never
/// sees missing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
}

impl MatchOutcome {
    /// Worst-case outcome used when a match cannot produce a real report.
    pub fn all_losses(rounds: u32) -> Self {
        Self {
            wins: 0,
            ties: 0,
            losses: rounds,
        }
    }
}

/// Filesystem paths scoped to one (warrior, opponent, job) tuple.
///
/// Job ids are never reused concurrently, so two in-flight matches can never
/// read or write each other's files.
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    pub job_id: u64,
    pub program_path: PathBuf,
    pub report_path: PathBuf,
}

impl JobWorkspace {
    pub fn new(work_dir: &Path, program_path: PathBuf, job_id: u64) -> Self {
        Self {
            job_id,
            program_path,
            report_path: work_dir.join(format!("report_{}.txt", job_id)),
        }
    }
}

/// Runs one isolated battle and reduces every failure mode to an outcome.
///
/// Launch failures, non-zero interpreter exits, timeouts and malformed
/// reports are all logged and absorbed into an all-loss outcome rather than
/// propagated; the caller always receives a well-formed result.
pub fn run_match(
    simulator: &dyn BattleSimulator,
    opponent: &Path,
    workspace: &JobWorkspace,
    rounds: u32,
) -> MatchOutcome {
    let report = match simulator.run(&workspace.program_path, opponent, &workspace.report_path) {
        Ok(report) => report,
        Err(e) => {
            log::warn!(
                "job {}: match against {} failed, scoring as all losses: {}",
                workspace.job_id,
                opponent.display(),
                e
            );
            return MatchOutcome::all_losses(rounds);
        }
    };

    match parse_report(&report) {
        ReportParse::Parsed(r) => MatchOutcome {
            wins: r.wins,
            ties: r.ties,
            losses: r.losses,
        },
        ReportParse::Malformed => {
            log::warn!(
                "job {}: malformed report from match against {}, scoring as all losses",
                workspace.job_id,
                opponent.display()
            );
            MatchOutcome::all_losses(rounds)
        }
    }
}
