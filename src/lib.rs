//! Predicts `java.util.Random` output from a handful of observed values.
//!
//! ```no_run
//! let mut victim = random_predictor::JavaRandom::new(42);
//! let d = victim.next_double();
//! let mut clone = random_predictor::from_double(d).unwrap();
//! assert_eq!(clone.next_double(), victim.next_double());
//! ```

mod config;
mod error;
pub mod lcg;
mod observation;
mod predict;
mod random;
mod report;
mod search;

pub use config::*;
pub use error::*;
pub use observation::{Decomposition, Observation, Shape};
pub use predict::*;
pub use random::*;
pub use report::*;
pub use search::*;

pub mod decompose {
    pub use crate::observation::{bytes, double, long, three_floats, two_floats, two_ints};
}
