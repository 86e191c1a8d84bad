//! # Scene commands
//!
//! A scene command is an instruction sent to the running executive from
//! outside, for example by a scenario script or an interactive frontend.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command that can be performed by the seeker system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SceneCmd {
    /// Fix the target at the given position.
    ///
    /// Receiving this command takes the target out of orbit mode, and the
    /// target will remain fixed until another command moves it. The target
    /// has no heading, only a position.
    SetTarget {
        /// The x-coordinate of the target position in meters.
        x_m: f64,

        /// The y-coordinate of the target position in meters.
        y_m: f64,
    },
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum CmdParseError {
    #[error("Command contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SceneCmd {
    /// Parse a new command from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, CmdParseError> {
        serde_json::from_str(json_str).map_err(CmdParseError::InvalidJson)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        let cmd = SceneCmd::from_json(
            "{\"SetTarget\": {\"x_m\": 100.0, \"y_m\": -20.5}}"
        ).unwrap();

        match cmd {
            SceneCmd::SetTarget { x_m, y_m } => {
                assert_eq!(x_m, 100.0);
                assert_eq!(y_m, -20.5);
            }
        }
    }

    #[test]
    fn test_from_bad_json() {
        assert!(SceneCmd::from_json("{\"NotACommand\": 1}").is_err());
        assert!(SceneCmd::from_json("not even json").is_err());
    }
}
