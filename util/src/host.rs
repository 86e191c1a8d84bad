//! Host platform utility functions

use std::path::PathBuf;

/// Retrieve the software root directory from the `SEEKER_SW_ROOT` environment
/// variable.
pub fn get_seeker_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var("SEEKER_SW_ROOT").map(PathBuf::from)
}
