pub mod arena;
pub mod encoder;
pub mod evolution;
pub mod manager;
pub mod traits;

pub use arena::ArenaConfig;
pub use encoder::EncoderConfig;
pub use evolution::EvolutionConfig;
pub use manager::{AppConfig, ConfigManager};
