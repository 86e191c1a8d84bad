//! Pursuit control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for pursuit control
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Distance travelled by the agent in one controller tick.
    pub step_dist_m: f64,

    /// The agent is considered to have reached its target node when within
    /// this distance of it.
    pub finish_move_dist_m: f64,

    /// Curvature demand minimum limit.
    pub min_curv_dem_m: f64,

    /// Curvature demand maximum limit.
    pub max_curv_dem_m: f64,
}
