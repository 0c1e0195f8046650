//! Runtime side of the Valis task simulation.
//!
//! - `simulator`: the tokio-driven `TaskSimulator`
//! - `increment`: pluggable progress increment sources

pub mod increment;
pub mod simulator;

pub use increment::{ProgressSource, RandomIncrement, SequenceIncrement};
pub use simulator::TaskSimulator;
