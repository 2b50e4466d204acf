pub mod arena;
pub mod container;
pub mod diagnostics;
pub mod emit;
pub mod engine;
pub mod error;
pub mod input;
pub mod length;
pub mod node;
pub mod qsort;

pub use container::GrowthPolicy;
pub use engine::{Engine, MAX_BURST_THRESHOLD, MIN_BURST_THRESHOLD};
pub use error::{CliError, EngineError};
