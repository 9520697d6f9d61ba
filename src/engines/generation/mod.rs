pub mod encoder;
pub mod evolution_engine;
pub mod genome;
pub mod hall_of_fame;
pub mod operators;
pub mod progress;
pub mod seeding;

pub use encoder::{encode, AddrMode, InstructionPolicy, OpcodeKind, Region};
pub use evolution_engine::{EvolutionEngine, ProgressCallback};
pub use genome::Genome;
pub use hall_of_fame::{EliteWarrior, HallOfFame};
pub use progress::ConsoleProgressCallback;
pub use seeding::{mutate_genome, seed_genome};
