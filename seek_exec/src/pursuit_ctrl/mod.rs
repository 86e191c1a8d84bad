//! # Pursuit control module
//!
//! Pursuit control walks the agent along the path discovered by the tree
//! search engine. It is a pure-pursuit controller: it always aims at a
//! single current waypoint (its target node) and continuously re-solves the
//! tangent-arc curvature to it rather than precomputing a trajectory, which
//! is the appropriate control law here because the tree, and hence the path,
//! is live and mutating underneath the agent.
//!
//! As waypoints are completed the controller bumps its target node one step
//! along the path and re-roots the tree at the new target, discarding the
//! traversed history.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;
