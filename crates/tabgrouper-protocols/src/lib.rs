//! # TabGrouper Protocols
//!
//! Shared type definitions for the TabGrouper workspace.
//! Contains only data types and boundary traits - no I/O.
//!
//! ## Core Types
//!
//! - [`Tab`] / [`TabSnapshot`] - browser tabs and the indexed reference frame
//! - [`RawPartition`] - the untrusted grouping proposed by the categorizer
//! - [`TabEvent`] - tab lifecycle events emitted by the browser boundary
//! - [`TabOracle`] - trait for the browser tab boundary
//! - [`Provider`] - the categorization providers known to the relay

pub mod error;
pub mod event;
pub mod oracle;
pub mod partition;
pub mod provider;
pub mod tab;

pub use error::{CategorizeError, PartitionInvalidError, PartitionViolation, TabOracleError};
pub use event::{OpenerRef, TabEvent};
pub use oracle::TabOracle;
pub use partition::RawPartition;
pub use provider::{CategorizeRequest, ChatMessage, ErrorBody, Provider, UnknownProvider};
pub use tab::{ParentInfo, SnapshotEntry, Tab, TabId, TabSnapshot};
