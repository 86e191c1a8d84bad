//! # Tree search engine module
//!
//! The tree search engine grows the search tree towards the target. It runs
//! an incremental best-first rollout: the oldest node in the frontier is
//! expanded with a freshly sampled manoeuvre, the child is kept for further
//! expansion if it improves on (or lands near) the best distance to the
//! target seen so far, and the trunk of the tree is periodically chopped so
//! that the retained history stays bounded as the search runs.
//!
//! The engine performs a bounded number of expansion steps per call to
//! [`TreeSearch::proc`], the cadence is provided by the executive.

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
