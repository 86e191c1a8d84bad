//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use scene_if::tm::SceneTm;

use crate::params::ExecParams;
use crate::pursuit_ctrl::{self, PursuitCtrl};
use crate::target_mgr::{TargetMgr, TargetOutput};
use crate::tree::Tree;
use crate::tree_search::{self, TreeSearch};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on the tree search cadence
    pub is_search_cycle: bool,

    /// True if this cycle falls on the pursuit controller cadence
    pub is_pursuit_cycle: bool,

    /// True if this cycle falls on the telemetry build cadence
    pub is_tm_cycle: bool,

    /// True if this cycle falls on the telemetry save cadence
    pub is_save_cycle: bool,

    // Tree
    pub tree: Tree,

    // TreeSearch
    pub tree_search: TreeSearch,
    pub search_input: tree_search::InputData,
    pub search_report: tree_search::StatusReport,

    // PursuitCtrl
    pub pursuit_ctrl: PursuitCtrl,
    pub pursuit_input: pursuit_ctrl::InputData,
    pub pursuit_report: pursuit_ctrl::StatusReport,

    // TargetMgr
    pub target_mgr: TargetMgr,
    pub target_out: TargetOutput,

    // Telemetry
    pub scene_tm: Option<SceneTm>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Build the data store from the initialised modules.
    pub fn new(
        tree: Tree,
        tree_search: TreeSearch,
        pursuit_ctrl: PursuitCtrl,
        target_mgr: TargetMgr,
    ) -> Self {
        let target_out = target_mgr.output();

        Self {
            num_cycles: 0,
            is_search_cycle: false,
            is_pursuit_cycle: false,
            is_tm_cycle: false,
            is_save_cycle: false,
            tree,
            tree_search,
            search_input: tree_search::InputData::default(),
            search_report: tree_search::StatusReport::default(),
            pursuit_ctrl,
            pursuit_input: pursuit_ctrl::InputData::default(),
            pursuit_report: pursuit_ctrl::StatusReport::default(),
            target_mgr,
            target_out,
            scene_tm: None,
            num_consec_cycle_overruns: 0,
        }
    }

    /// Perform start of cycle updates, advancing the cycle counter and
    /// raising the cadence flags for this cycle.
    pub fn cycle_start(&mut self, exec_params: &ExecParams) {
        self.num_cycles += 1;

        self.is_search_cycle = self.num_cycles % exec_params.search_cycle_div == 0;
        self.is_pursuit_cycle = self.num_cycles % exec_params.pursuit_cycle_div == 0;
        self.is_tm_cycle = self.num_cycles % exec_params.tm_cycle_div == 0;
        self.is_save_cycle = self.num_cycles % exec_params.save_cycle_div == 0;
    }
}
