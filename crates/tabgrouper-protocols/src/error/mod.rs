//! Error types for the TabGrouper protocol layer.

mod categorize;
mod oracle;
mod partition;

pub use categorize::*;
pub use oracle::*;
pub use partition::*;
