//! # TabGrouper Core
//!
//! The tab-to-group assignment protocol and its sidebar reconciliation.
//!
//! ## Flow
//!
//! ```text
//! TabOracle ──► snapshot ──► CategorizeClient ──► normalizer ──► TabTree::apply_grouping
//!     │                                                              ▲
//!     └── tab events ──► EventRelay ──► Sidebar ─────────────────────┘
//! ```
//!
//! The [`Sidebar`] consumes one ordered channel of [`SidebarMessage`]s and
//! applies each one to the [`TabTree`] as a single, complete step.

pub mod client;
pub mod event_relay;
pub mod memory_oracle;
pub mod normalizer;
pub mod pipeline;
pub mod sidebar;
pub mod snapshot;
pub mod tree;

pub use client::CategorizeClient;
pub use event_relay::{EventRelay, PipelineUpdate, SidebarMessage, UserCommand};
pub use memory_oracle::MemoryTabOracle;
pub use normalizer::{normalize, CanonicalGrouping, Group};
pub use pipeline::CategorizationPipeline;
pub use sidebar::{ControlState, Sidebar};
pub use snapshot::capture_snapshot;
pub use tree::{GroupNode, TabNode, TabTree, TreeError, TreeState, UNSORTED_GROUP};
