pub mod match_runner;
pub mod report;
pub mod scheduler;
pub mod simulator;

pub use match_runner::{run_match, JobWorkspace, MatchOutcome};
pub use report::{parse_report, BattleReport, ReportParse};
pub use scheduler::{JobIdAllocator, MatchScheduler};
pub use simulator::{BattleSimulator, PmarsSimulator};
