//! Executive parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the executive's cyclic scheduling.
///
/// Each logical task (target, search, pursuit, telemetry) runs on its own
/// cadence, expressed as a number of base cycles between steps. The divisors
/// must be at least 1.
#[derive(Deserialize, Debug, Clone)]
pub struct ExecParams {

    /// Target period of one base cycle in seconds.
    pub cycle_period_s: f64,

    /// Number of base cycles between tree search steps.
    pub search_cycle_div: u128,

    /// Number of base cycles between pursuit controller (and target
    /// manager) steps.
    pub pursuit_cycle_div: u128,

    /// Number of base cycles between telemetry snapshot builds.
    pub tm_cycle_div: u128,

    /// Number of base cycles between telemetry snapshot saves.
    pub save_cycle_div: u128,

    /// Start position of the agent (and of the tree's root).
    pub start_pos_m: [f64; 2],

    /// Start heading of the agent in radians.
    pub start_heading_rad: f64,
}
