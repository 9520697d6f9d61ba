use crate::config::{ArenaConfig, EncoderConfig};
use crate::engines::evaluation::match_runner::{run_match, JobWorkspace, MatchOutcome};
use crate::engines::evaluation::simulator::BattleSimulator;
use crate::engines::generation::encoder::encode;
use crate::engines::generation::genome::Genome;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Hands out job ids unique within one allocator. The scheduler owns one
/// and keys every path it hands to workers with it, so workspace isolation
/// holds across overlapping evaluations of different genomes on the same
/// scheduler.
#[derive(Debug, Default)]
pub struct JobIdAllocator(AtomicU64);

impl JobIdAllocator {
    pub fn next_id(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Fans one genome out to one match per roster opponent and reduces the
/// outcomes to a single fitness number.
pub struct MatchScheduler {
    simulator: Arc<dyn BattleSimulator>,
    encoder_config: EncoderConfig,
    arena: ArenaConfig,
    jobs: JobIdAllocator,
}

impl MatchScheduler {
    pub fn new(
        simulator: Arc<dyn BattleSimulator>,
        encoder_config: EncoderConfig,
        arena: ArenaConfig,
    ) -> Self {
        Self {
            simulator,
            encoder_config,
            arena,
            jobs: JobIdAllocator::default(),
        }
    }

    /// Fitness hook for the search driver.
    ///
    /// Compiles the genome once, runs every roster match concurrently, and
    /// always returns a finite fitness: every per-match failure has already
    /// been absorbed into an all-loss outcome, and program-file write
    /// failures degrade the whole evaluation the same way.
    pub fn evaluate(&self, genome: &Genome) -> f64 {
        let rounds = self.arena.rounds;
        let outcomes = match self.write_program(genome) {
            Ok(program_path) => {
                let outcomes = self.run_matches(&program_path);
                let _ = std::fs::remove_file(&program_path);
                outcomes
            }
            Err(e) => {
                log::warn!("Failed to write program file, scoring as all losses: {}", e);
                vec![MatchOutcome::all_losses(rounds); self.arena.opponents.len()]
            }
        };

        self.reduce(&outcomes)
    }

    fn write_program(&self, genome: &Genome) -> std::io::Result<std::path::PathBuf> {
        let text = encode(genome, &self.encoder_config);
        std::fs::create_dir_all(&self.arena.work_dir)?;
        let path = self
            .arena
            .work_dir
            .join(format!("warrior_{}.red", self.jobs.next_id()));
        std::fs::write(&path, text)?;
        Ok(path)
    }

    fn run_matches(&self, program_path: &std::path::Path) -> Vec<MatchOutcome> {
        let rounds = self.arena.rounds;

        // Job ids are allocated up front; results are keyed by opponent
        // position, so completion order cannot affect the reduction.
        let workspaces: Vec<JobWorkspace> = self
            .arena
            .opponents
            .iter()
            .map(|_| {
                JobWorkspace::new(
                    &self.arena.work_dir,
                    program_path.to_path_buf(),
                    self.jobs.next_id(),
                )
            })
            .collect();

        let outcomes: Vec<MatchOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .arena
                .opponents
                .iter()
                .zip(&workspaces)
                .map(|(opponent, workspace)| {
                    scope.spawn(move || {
                        run_match(self.simulator.as_ref(), opponent, workspace, rounds)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        log::warn!("Match worker panicked, scoring as all losses");
                        MatchOutcome::all_losses(rounds)
                    })
                })
                .collect()
        });

        for workspace in &workspaces {
            let _ = std::fs::remove_file(&workspace.report_path);
        }

        outcomes
    }

    /// Per-opponent score in `[-1.0, 1.0]`: full wins score 1, full losses
    /// score -1, ties count half.
    fn score(&self, outcome: &MatchOutcome) -> f64 {
        let rounds = f64::from(self.arena.rounds);
        (f64::from(outcome.wins) + 0.5 * f64::from(outcome.ties) - f64::from(outcome.losses))
            / rounds
    }

    /// `mean - lambda * population_variance`: consistently decent beats
    /// brilliant-against-one, hopeless-against-another.
    fn reduce(&self, outcomes: &[MatchOutcome]) -> f64 {
        let scores: Vec<f64> = outcomes.iter().map(|o| self.score(o)).collect();
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
        mean - self.arena.variance_lambda * variance
    }
}
