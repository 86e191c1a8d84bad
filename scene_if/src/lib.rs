//! # Scene interface library
//!
//! This crate defines the interface between the seeker core and its external
//! collaborators: the commands which may be injected into a run (for example
//! from a scenario script), and the telemetry snapshots a renderer may
//! consume. The core accepts no drawing calls and performs no drawing itself.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Scene commands - events injected into the run from outside
pub mod cmd;

/// Scene telemetry - read-only snapshots of the run for rendering
pub mod tm;
