//! Target manager parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the target manager
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Centre of the orbit.
    pub orbit_centre_m: [f64; 2],

    /// Radius of the orbit.
    pub orbit_radius_m: f64,

    /// Angular step of the orbit per tick in radians.
    pub orbit_step_rad: f64,

    /// Initial angular phase of the orbit in radians.
    pub orbit_start_ang_rad: f64,
}
