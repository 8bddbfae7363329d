//! Tour construction heuristics.

pub mod construction;

pub use construction::*;
