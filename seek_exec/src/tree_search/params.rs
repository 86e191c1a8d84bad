//! Tree search engine parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the tree search engine
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Half-range of the curvature sample.
    ///
    /// Expansion manoeuvre curvatures are drawn uniformly in
    /// [-curv_sample_m, +curv_sample_m].
    pub curv_sample_m: f64,

    /// Range of the distance sample.
    ///
    /// Expansion manoeuvre distances are drawn uniformly in
    /// [dist_sample_offset_m, dist_sample_offset_m + dist_sample_m].
    pub dist_sample_m: f64,

    /// Offset of the distance sample.
    pub dist_sample_offset_m: f64,

    /// The exploration margin.
    ///
    /// A node whose distance to the target is within this margin of the
    /// closest node's distance remains eligible for expansion, keeping a
    /// band of near-optimal alternatives alive.
    pub explore_dist_m: f64,

    /// The search finishes when a node comes within this distance of a
    /// fixed target. Orbiting targets never finish the search.
    pub finish_dist_m: f64,

    /// Number of ancestor hops of the closest node retained when chopping
    /// the trunk.
    pub prune_depth: usize,

    /// Maximum number of expansion steps performed per proc call.
    pub expansions_per_cycle: usize,

    /// Arena size above which the tree is compacted after processing.
    pub compact_node_limit: usize,
}
