//! Rules that do not belong to a single phase.
//!
//! - `tally`: plurality counting with tie detection
//! - `victory`: the terminal-state evaluator
//!
//! Both are pure: they read state and return values, never mutate.

pub mod tally;
pub mod victory;

pub use tally::{Plurality, Tally};
pub use victory::{evaluate, Verdict, VictoryReason, Winner};
