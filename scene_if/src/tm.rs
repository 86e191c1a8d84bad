//! # Scene telemetry
//!
//! Defines the telemetry pack summarising the state of a run: the search
//! tree, the agent, and the target. A renderer can replay every branch's arc
//! geometry from the parent pose and the stored manoeuvre without touching
//! the core.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A snapshot of the whole scene at the end of a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneTm {
    /// Number of the cycle this snapshot was taken on
    pub cycle: u128,

    /// Session-elapsed time of the snapshot in seconds
    pub elapsed_s: f64,

    /// Mode of the tree search engine
    pub search_mode: SearchModeTm,

    /// Mode of the pursuit controller
    pub pursuit_mode: PursuitModeTm,

    /// Index of the tree's root node in `nodes`
    pub root: usize,

    /// Index of the node currently closest to the target
    pub closest: usize,

    /// Index of the node the agent is currently driving towards
    pub agent_target: usize,

    /// All nodes of the tree
    pub nodes: Vec<NodeTm>,

    /// Current agent pose
    pub agent: PoseTm,

    /// Current target state
    pub target: TargetTm,
}

/// A single tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTm {
    /// Stable index of this node
    pub id: usize,

    /// Index of the parent node, `None` for the root
    pub parent: Option<usize>,

    /// Pose of this node
    pub pose: PoseTm,

    /// The manoeuvre of the edge connecting the parent to this node, `None`
    /// for the root
    pub branch: Option<BranchTm>,
}

/// The manoeuvre of a single edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BranchTm {
    /// Curvature of the edge's arc in 1/meters
    pub curv_m: f64,

    /// Arc length of the edge in meters
    pub dist_m: f64,
}

/// A 2D pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoseTm {
    pub x_m: f64,
    pub y_m: f64,
    pub heading_rad: f64,
}

/// The target's position and mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetTm {
    pub x_m: f64,
    pub y_m: f64,

    /// True if the target is orbiting, false if it is fixed
    pub orbiting: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Telemetry image of the search engine's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchModeTm {
    Off,
    Running,
    Finished,
}

/// Telemetry image of the pursuit controller's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuitModeTm {
    Off,
    Moving,
}
