//! # Kinematics module
//!
//! This module is the single source of truth for all motion in the system.
//! Tree expansion, branch geometry replay and agent stepping all go through
//! [`step_ack`], so a stored manoeuvre replayed from its recorded start pose
//! always reproduces the recorded end pose.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Curvatures with an absolute value at or below this limit are treated as
/// straight-line travel.
pub const CURV_EPSILON_M: f64 = 1e-4;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pose (position and heading) in the scene frame.
///
/// Poses are immutable values, every kinematic step produces a new pose
/// rather than mutating one in place.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the scene frame
    pub position_m: Vector2<f64>,

    /// The heading (angle to the positive x axis) in radians
    pub heading_rad: f64,
}

/// A reduced (curvature and distance only) Ackermann manoeuvre.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct AckMnvr {
    /// The curvature of the manoeuvre in 1/meters.
    ///
    /// Follows the right hand rule about the scene's Z+ (out of plane) axis,
    /// so that positive curvature is a turn to the left, and negative
    /// curvature a turn to the right.
    pub curv_m: f64,

    /// The total distance to traverse in this manoeuvre, along the arc, in
    /// meters.
    pub dist_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Step a pose along a constant-curvature arc.
///
/// The manoeuvre's distance is the arc length of the sector traced by the
/// motion. Below [`CURV_EPSILON_M`] the motion degenerates to straight-line
/// travel along the current heading.
pub fn step_ack(pose: &Pose, mnvr: &AckMnvr) -> Pose {
    let mut dx_local_m = mnvr.dist_m;
    let mut dy_local_m = 0.0;
    let mut theta_rad = 0.0;

    if mnvr.curv_m.abs() > CURV_EPSILON_M {
        let radius_m = 1.0 / mnvr.curv_m;
        theta_rad = mnvr.dist_m * mnvr.curv_m;
        dx_local_m = radius_m * theta_rad.sin();
        dy_local_m = radius_m * (1.0 - theta_rad.cos());
    }

    // Rotate the local displacement into the scene frame by the negative of
    // the current heading
    let c = (-pose.heading_rad).cos();
    let s = (-pose.heading_rad).sin();

    Pose {
        position_m: Vector2::new(
            dx_local_m * c + dy_local_m * s + pose.position_m[0],
            -dx_local_m * s + dy_local_m * c + pose.position_m[1],
        ),
        heading_rad: pose.heading_rad + theta_rad,
    }
}

/// Step a pose a given distance along a fixed absolute heading.
///
/// The new pose adopts the given heading. This is an alternate motion
/// primitive kept for heading-hold motion models, the main loop uses
/// [`step_ack`] exclusively.
pub fn step_heading(pose: &Pose, heading_rad: f64, dist_m: f64) -> Pose {
    Pose {
        position_m: Vector2::new(
            pose.position_m[0] + dist_m * heading_rad.cos(),
            pose.position_m[1] + dist_m * heading_rad.sin(),
        ),
        heading_rad,
    }
}

/// Solve for the curvature of the arc, tangent to the pose's heading, which
/// passes through the target point.
///
/// Returns `None` if the target is at the pose's position (to within floating
/// point precision), in which case no turn is needed and the caller should
/// treat the curvature as zero.
pub fn curv_to_point(pose: &Pose, target_m: &Vector2<f64>) -> Option<f64> {
    let s = pose.heading_rad.sin();
    let c = pose.heading_rad.cos();

    let dx_global_m = target_m[0] - pose.position_m[0];
    let dy_global_m = target_m[1] - pose.position_m[1];

    // Transform the target into the pose's local frame
    let dx_m = dx_global_m * c + dy_global_m * s;
    let dy_m = -dx_global_m * s + dy_global_m * c;

    let dist_sq_m = dx_m * dx_m + dy_m * dy_m;

    if dist_sq_m <= std::f64::EPSILON {
        return None;
    }

    Some((2.0 * dy_m) / dist_sq_m)
}

/// Return the euclidian distance between two points, headings ignored.
pub fn dist_between(a_m: &Vector2<f64>, b_m: &Vector2<f64>) -> f64 {
    (a_m - b_m).norm()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_step_straight() {
        // At or below the epsilon the step is exactly straight-line travel
        let pose = Pose::new(1.0, 2.0, 0.0);
        let new = step_ack(&pose, &AckMnvr { curv_m: CURV_EPSILON_M, dist_m: 10.0 });

        assert!((new.position_m[0] - 11.0).abs() < 1e-12);
        assert!((new.position_m[1] - 2.0).abs() < 1e-12);
        assert!((new.heading_rad - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_epsilon_continuity() {
        // Just above the epsilon the arc formula must agree with straight
        // line travel to within the curvature of the arc itself
        let pose = Pose::new(0.0, 0.0, 0.0);
        let straight = step_ack(&pose, &AckMnvr { curv_m: 0.0, dist_m: 10.0 });
        let arc = step_ack(&pose, &AckMnvr { curv_m: 2.0 * CURV_EPSILON_M, dist_m: 10.0 });

        assert!((arc.position_m[0] - straight.position_m[0]).abs() < 1e-3);
        assert!((arc.position_m[1] - straight.position_m[1]).abs() < 2e-2);
        assert!((arc.heading_rad - straight.heading_rad).abs() < 3e-3);
    }

    #[test]
    fn test_step_quarter_circle() {
        // Unit curvature over an arc length of pi/2 is a quarter circle
        let pose = Pose::new(0.0, 0.0, 0.0);
        let new = step_ack(&pose, &AckMnvr { curv_m: 1.0, dist_m: PI / 2.0 });

        assert!((new.position_m[0] - 1.0).abs() < 1e-9);
        assert!((new.position_m[1] - 1.0).abs() < 1e-9);
        assert!((new.heading_rad - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_replay() {
        // Replaying a manoeuvre from the same start pose reproduces the same
        // end pose
        let pose = Pose::new(-3.0, 7.5, 1.2);
        let mnvr = AckMnvr { curv_m: 0.013, dist_m: 61.0 };

        let a = step_ack(&pose, &mnvr);
        let b = step_ack(&pose, &mnvr);

        assert_eq!(a.position_m, b.position_m);
        assert_eq!(a.heading_rad, b.heading_rad);
    }

    #[test]
    fn test_step_heading() {
        let pose = Pose::new(0.0, 0.0, 0.0);
        let new = step_heading(&pose, PI / 2.0, 5.0);

        assert!((new.position_m[0] - 0.0).abs() < 1e-12);
        assert!((new.position_m[1] - 5.0).abs() < 1e-12);
        assert_eq!(new.heading_rad, PI / 2.0);
    }

    #[test]
    fn test_curv_to_point() {
        let pose = Pose::new(0.0, 0.0, 0.0);

        // A point dead ahead needs no turn
        let curv = curv_to_point(&pose, &Vector2::new(10.0, 0.0)).unwrap();
        assert!(curv.abs() < 1e-12);

        // A point to the left needs a positive (left) curvature
        let curv = curv_to_point(&pose, &Vector2::new(0.0, 10.0)).unwrap();
        assert!((curv - 0.2).abs() < 1e-12);

        // A point to the right needs a negative (right) curvature
        let curv = curv_to_point(&pose, &Vector2::new(0.0, -10.0)).unwrap();
        assert!((curv + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_curv_to_point_degenerate() {
        // A target at the pose's own position is degenerate and must not
        // produce a NaN
        let pose = Pose::new(4.0, -2.0, 0.7);
        assert!(curv_to_point(&pose, &Vector2::new(4.0, -2.0)).is_none());
    }

    #[test]
    fn test_curv_steers_onto_point() {
        // Stepping along the solved arc for the full chord must pass through
        // the target point: step in small increments and check the closest
        // approach
        let pose = Pose::new(0.0, 0.0, 0.3);
        let target = Vector2::new(20.0, 10.0);

        let curv_m = curv_to_point(&pose, &target).unwrap();

        let mut p = pose;
        let mut min_dist_m = std::f64::MAX;
        for _ in 0..10000 {
            p = step_ack(&p, &AckMnvr { curv_m, dist_m: 0.01 });
            let d = dist_between(&p.position_m, &target);
            if d < min_dist_m {
                min_dist_m = d;
            }
        }

        assert!(min_dist_m < 0.01);
    }

    #[test]
    fn test_dist_between() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(3.0, 4.0);
        assert!((dist_between(&a, &b) - 5.0).abs() < 1e-12);
    }
}
