//! # Seeker library.
//!
//! This library allows other crates in the workspace to access items defined
//! inside the seeker crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - global cyclic state of the executable
pub mod data_store;

/// Kinematics module - the single source of truth for all motion in the system
pub mod kin;

/// Executive parameters - cadences of the cyclic tasks
pub mod params;

/// Pursuit control module - walks the agent along the discovered path
pub mod pursuit_ctrl;

/// Target manager - provides the fixed or orbiting target
pub mod target_mgr;

/// Scene telemetry assembly - builds renderer-facing snapshots
pub mod tm;

/// Search tree module - the arena of reachable poses grown by the search
pub mod tree;

/// Tree search engine - grows the tree towards the target
pub mod tree_search;
