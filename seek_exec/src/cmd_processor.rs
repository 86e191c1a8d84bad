//! # Scene command processor module
//!
//! The command processor handles scene commands coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;

// Internal
use scene_if::cmd::SceneCmd;
use seek_lib::data_store::DataStore;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a scene command.
///
/// Mutates the datastore to send commands to different modules.
pub(crate) fn exec(ds: &mut DataStore, cmd: &SceneCmd) {

    // Handle different commands
    match cmd {
        SceneCmd::SetTarget { x_m, y_m } => {
            debug!("Recieved SetTarget command");

            ds.target_mgr.set_fixed(Vector2::new(*x_m, *y_m));
            ds.target_out = ds.target_mgr.output();

            // A new target restarts the rollout if the search had finished
            ds.search_input.start_requested = true;
        }
    }
}
