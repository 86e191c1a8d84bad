//! # Scene telemetry assembly
//!
//! Builds the [`SceneTm`] snapshot a renderer consumes out of the core
//! state. This is the only surface the rendering collaborator sees, reads
//! are one-way and the core performs no drawing itself.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use scene_if::tm::{BranchTm, NodeTm, PoseTm, PursuitModeTm, SceneTm, SearchModeTm, TargetTm};

// Internal
use crate::data_store::DataStore;
use crate::kin::{AckMnvr, Pose};
use crate::pursuit_ctrl::PursuitCtrlMode;
use crate::tree_search::TreeSearchMode;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build a scene snapshot from the current state of the data store.
pub fn scene_tm(ds: &DataStore, elapsed_s: f64) -> SceneTm {
    let nodes = ds
        .tree
        .iter()
        .map(|(id, node)| NodeTm {
            id: id.index(),
            parent: node.parent.map(|p| p.index()),
            pose: pose_tm(&node.pose),
            branch: node.branch.as_ref().map(branch_tm),
        })
        .collect();

    SceneTm {
        cycle: ds.num_cycles,
        elapsed_s,
        search_mode: search_mode_tm(ds.tree_search.mode()),
        pursuit_mode: pursuit_mode_tm(ds.pursuit_ctrl.mode()),
        root: ds.tree.root().index(),
        closest: ds.tree.closest().index(),
        agent_target: ds.pursuit_ctrl.target_node().index(),
        nodes,
        agent: pose_tm(&ds.pursuit_ctrl.agent_pose()),
        target: TargetTm {
            x_m: ds.target_out.pos_m[0],
            y_m: ds.target_out.pos_m[1],
            orbiting: ds.target_out.orbiting,
        },
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn pose_tm(pose: &Pose) -> PoseTm {
    PoseTm {
        x_m: pose.position_m[0],
        y_m: pose.position_m[1],
        heading_rad: pose.heading_rad,
    }
}

fn branch_tm(mnvr: &AckMnvr) -> BranchTm {
    BranchTm {
        curv_m: mnvr.curv_m,
        dist_m: mnvr.dist_m,
    }
}

fn search_mode_tm(mode: TreeSearchMode) -> SearchModeTm {
    match mode {
        TreeSearchMode::Off => SearchModeTm::Off,
        TreeSearchMode::Running => SearchModeTm::Running,
        TreeSearchMode::Finished => SearchModeTm::Finished,
    }
}

fn pursuit_mode_tm(mode: PursuitCtrlMode) -> PursuitModeTm {
    match mode {
        PursuitCtrlMode::Off => PursuitModeTm::Off,
        PursuitCtrlMode::Moving => PursuitModeTm::Moving,
    }
}
