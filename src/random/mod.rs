//! Random draws for the generator
//!
//! ```rust
//! use occupancy_closure_sim::random::{DrawSource, RandomSource};
//!
//! let mut a = RandomSource::from_seed(42);
//! let mut b = RandomSource::from_seed(42);
//! assert_eq!(a.standard_normal(), b.standard_normal());
//! ```

pub mod source;

pub use source::*;
