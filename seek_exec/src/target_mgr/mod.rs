//! # Target manager module
//!
//! This module provides the target the search is biased towards. The target
//! is either orbiting (driven along a circular path by an internal periodic
//! phase) or fixed (set by an external `SetTarget` scene command, which
//! takes the target out of orbit mode for good).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
pub use params::Params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use nalgebra::Vector2;

// Internal
use util::params as util_params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct TargetMgr {
    params: Params,

    /// Executing mode
    mode: TargetMode,

    /// Current angular phase of the orbit
    ang_rad: f64,

    /// Current position of the target
    pos_m: Vector2<f64>,
}

/// The target state produced by one proc call.
#[derive(Debug, Copy, Clone)]
pub struct TargetOutput {
    /// Position of the target
    pub pos_m: Vector2<f64>,

    /// True if the target is orbiting, false if it is fixed
    pub orbiting: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during initialisation of the module.
#[derive(Debug, thiserror::Error)]
pub enum TargetMgrError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util_params::LoadError),
}

/// The possible modes of the target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TargetMode {
    /// The target follows a circular path around the configured centre
    Orbiting,

    /// The target holds a commanded position
    Fixed,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetMgr {
    /// Intiailise the target manager.
    ///
    /// Expected init data is a path to the parameter file. The target starts
    /// in orbit mode at the configured start phase.
    pub fn init(params_path: &str) -> Result<Self, TargetMgrError> {
        // Load the parameters
        let params = match util_params::load(params_path) {
            Ok(p) => p,
            Err(e) => return Err(TargetMgrError::ParamLoadError(e)),
        };

        Ok(Self::with_params(params))
    }

    /// Create a target manager directly from parameters.
    pub fn with_params(params: Params) -> Self {
        let ang_rad = params.orbit_start_ang_rad;
        let pos_m = Self::orbit_pos(&params, ang_rad);

        Self {
            params,
            mode: TargetMode::Orbiting,
            ang_rad,
            pos_m,
        }
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    pub fn output(&self) -> TargetOutput {
        TargetOutput {
            pos_m: self.pos_m,
            orbiting: self.mode == TargetMode::Orbiting,
        }
    }

    /// Fix the target at the given position, leaving orbit mode.
    pub fn set_fixed(&mut self, pos_m: Vector2<f64>) {
        self.mode = TargetMode::Fixed;
        self.pos_m = pos_m;

        info!("Target fixed at ({:.2}, {:.2}) m", pos_m[0], pos_m[1]);
    }

    /// Process the target manager, advancing the orbit phase one step.
    pub fn proc(&mut self) -> TargetOutput {
        if self.mode == TargetMode::Orbiting {
            self.ang_rad += self.params.orbit_step_rad;
            self.pos_m = Self::orbit_pos(&self.params, self.ang_rad);
        }

        self.output()
    }

    fn orbit_pos(params: &Params, ang_rad: f64) -> Vector2<f64> {
        Vector2::new(
            params.orbit_centre_m[0] + params.orbit_radius_m * ang_rad.sin(),
            params.orbit_centre_m[1] + params.orbit_radius_m * ang_rad.cos(),
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::kin;
    use std::f64::consts::PI;

    fn test_params() -> Params {
        Params {
            orbit_centre_m: [400.0, 300.0],
            orbit_radius_m: 240.0,
            orbit_step_rad: PI / 500.0,
            orbit_start_ang_rad: 0.0,
        }
    }

    #[test]
    fn test_orbit_advances() {
        let mut mgr = TargetMgr::with_params(test_params());

        assert_eq!(mgr.mode(), TargetMode::Orbiting);

        let first = mgr.proc();
        let second = mgr.proc();

        assert!(first.orbiting);
        assert!(second.orbiting);
        assert!(kin::dist_between(&first.pos_m, &second.pos_m) > 0.0);

        // The target stays on the orbit circle
        let centre = Vector2::new(400.0, 300.0);
        assert!((kin::dist_between(&second.pos_m, &centre) - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_period() {
        // 1000 steps of pi/500 is a full revolution
        let mut mgr = TargetMgr::with_params(test_params());

        let first = mgr.proc();
        let mut last = first;
        for _ in 0..1000 {
            last = mgr.proc();
        }

        assert!(kin::dist_between(&first.pos_m, &last.pos_m) < 1e-6);
    }

    #[test]
    fn test_set_fixed_leaves_orbit() {
        let mut mgr = TargetMgr::with_params(test_params());

        mgr.proc();
        mgr.set_fixed(Vector2::new(12.0, -7.0));

        assert_eq!(mgr.mode(), TargetMode::Fixed);

        // Further procs no longer move the target
        let out = mgr.proc();
        assert!(!out.orbiting);
        assert_eq!(out.pos_m, Vector2::new(12.0, -7.0));

        let out = mgr.proc();
        assert_eq!(out.pos_m, Vector2::new(12.0, -7.0));
    }
}
