/// Implemented RL algorithms
pub mod algo;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Configuration errors
pub mod error;

/// Exploration policies
pub mod exploration;

/// Experience replay
pub mod memory;

/// Conversion traits
pub mod traits;
