//! Core types for the occupancy simulator
//!
//! This module contains identifiers, enumerations and the configuration structures
//! used throughout the simulator.
//!
//! # Usage Example
//!
//! ```rust
//! use occupancy_closure_sim::types::*;
//!
//! let run_id = RunId::new();
//! let format: OutputFormat = "csv".parse().unwrap();
//!
//! let config = SimulationConfig {
//!     n_pt: 50,
//!     n_rep: 3,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! # let _ = (run_id, format);
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
