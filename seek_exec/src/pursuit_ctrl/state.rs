//! Pursuit control state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;

// Internal
use super::Params;
use crate::kin::{self, AckMnvr, Pose};
use crate::tree::{NodeId, Tree};
use util::{maths::clamp, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct PursuitCtrl {
    params: Params,

    /// Executing mode
    mode: PursuitCtrlMode,

    /// Current pose of the agent
    agent_pose: Pose,

    /// The node the agent is currently driving towards
    target_node: NodeId,

    /// The path from the tree's closest node up to the target node, ordered
    /// closest-first
    path: Vec<NodeId>,

    report: StatusReport,
}

/// Input data for one proc call.
#[derive(Debug, Default, Copy, Clone)]
pub struct InputData {
    /// True if the search engine is currently running a rollout
    pub search_running: bool,

    /// True if the target is currently orbiting
    pub target_orbiting: bool,
}

/// The status report containing monitoring quantities for one proc call.
#[derive(Debug, Default, Copy, Clone)]
pub struct StatusReport {
    /// Distance from the agent to its target node
    pub dist_to_target_node_m: f64,

    /// Length of the derived path
    pub path_len: usize,

    /// True if the agent is within the finish-move tolerance of its target
    /// node
    pub at_target_node: bool,

    /// True if the controller re-rooted the tree in this call
    pub chopped: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during initialisation of the module.
#[derive(Debug, thiserror::Error)]
pub enum PursuitCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),
}

/// The possible modes of execution of pursuit control.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PursuitCtrlMode {
    Off,
    Moving,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PursuitCtrl {
    /// Intiailise the pursuit control module.
    ///
    /// Expected init data is a path to the parameter file, the agent's start
    /// pose and the tree the agent will walk.
    pub fn init(params_path: &str, start: Pose, tree: &Tree) -> Result<Self, PursuitCtrlError> {
        // Load the parameters
        let params = match params::load(params_path) {
            Ok(p) => p,
            Err(e) => return Err(PursuitCtrlError::ParamLoadError(e)),
        };

        Ok(Self::with_params(params, start, tree))
    }

    /// Create a controller directly from parameters.
    pub fn with_params(params: Params, start: Pose, tree: &Tree) -> Self {
        Self {
            params,
            mode: PursuitCtrlMode::Off,
            agent_pose: start,
            target_node: tree.root(),
            path: Vec::new(),
            report: StatusReport::default(),
        }
    }

    pub fn mode(&self) -> PursuitCtrlMode {
        self.mode
    }

    pub fn agent_pose(&self) -> Pose {
        self.agent_pose
    }

    pub fn target_node(&self) -> NodeId {
        self.target_node
    }

    /// Re-point the target node through a compaction remap.
    ///
    /// A target which was discarded by the compaction falls back to the
    /// tree's root, the next path rebuild recovers from there.
    pub fn apply_remap(&mut self, remap: &[Option<NodeId>], tree: &Tree) {
        self.target_node = match remap.get(self.target_node.index()) {
            Some(Some(new_id)) => *new_id,
            _ => tree.root(),
        };
        self.path.clear();
    }

    /// Process pursuit control.
    ///
    /// Processing involves:
    ///  1. Recomputing the path from the tree's closest node to the current
    ///     target node.
    ///  2. Bumping the target node one step along the path once the current
    ///     one is reached, re-rooting the tree at the new target.
    ///  3. Steering the agent towards the target node along a tangent arc.
    pub fn proc(&mut self, tree: &mut Tree, input: &InputData) -> StatusReport {
        // Setup cycle data
        self.report = StatusReport::default();

        match self.mode {
            PursuitCtrlMode::Off => {
                // The agent needs to move when the search has found a node
                // other than the one we're already targeting
                if input.search_running && tree.closest() != self.target_node {
                    self.mode = PursuitCtrlMode::Moving;
                    info!("Pursuit started");
                } else {
                    return self.report;
                }
            }
            PursuitCtrlMode::Moving => (),
        }

        // A stale target id (the tree was compacted without a remap reaching
        // us) falls back to the root
        if !tree.is_valid(self.target_node) {
            self.target_node = tree.root();
        }

        self.construct_path(tree);

        // Bump up the node once the current one is complete
        if self.at_target_node(tree) && !self.path.is_empty() {
            self.target_node = self.path.pop().unwrap();

            // Drop the traversed history: the tree re-roots at the node the
            // agent is now chasing
            tree.prune_frontier(self.target_node);
            if tree.chop_trunk(self.target_node) {
                self.report.chopped = true;
            }
        }

        let mut step_dist_m = self.params.step_dist_m;

        if self.at_target_node(tree) && self.path.is_empty() {
            // Nothing left to chase, don't move forward
            step_dist_m = 0.0;

            // With a fixed target the controller is done. An orbiting target
            // keeps us ticking, awaiting a new path.
            if !input.target_orbiting {
                self.mode = PursuitCtrlMode::Off;
                info!("Pursuit complete, agent idle");
                self.fill_report(tree);
                return self.report;
            }
        }

        // Find the curvature to the target node and step the agent forward.
        // A degenerate solve means the agent sits on the target, no turn
        // needed.
        let curv_m = match kin::curv_to_point(
            &self.agent_pose,
            &tree.node(self.target_node).pose.position_m,
        ) {
            Some(c) => clamp(&c, &self.params.min_curv_dem_m, &self.params.max_curv_dem_m),
            None => 0.0,
        };

        self.agent_pose = kin::step_ack(
            &self.agent_pose,
            &AckMnvr {
                curv_m,
                dist_m: step_dist_m,
            },
        );

        self.fill_report(tree);
        self.report
    }

    /// Rebuild the path from the tree's closest node up to the target node.
    ///
    /// The walk stops early, without error, if a node has no parent before
    /// the target node is reached - the tree may have been pruned out from
    /// under a stale target.
    fn construct_path(&mut self, tree: &Tree) {
        self.path.clear();

        let mut node = tree.closest();
        while node != self.target_node {
            self.path.push(node);
            match tree.node(node).parent {
                Some(p) => node = p,
                None => break,
            }
        }
    }

    fn at_target_node(&self, tree: &Tree) -> bool {
        kin::dist_between(
            &tree.node(self.target_node).pose.position_m,
            &self.agent_pose.position_m,
        ) < self.params.finish_move_dist_m
    }

    fn fill_report(&mut self, tree: &Tree) {
        self.report.dist_to_target_node_m = kin::dist_between(
            &tree.node(self.target_node).pose.position_m,
            &self.agent_pose.position_m,
        );
        self.report.path_len = self.path.len();
        self.report.at_target_node = self.at_target_node(tree);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::kin;

    fn test_params() -> Params {
        Params {
            step_dist_m: 2.0,
            finish_move_dist_m: 1.0,
            min_curv_dem_m: -0.5,
            max_curv_dem_m: 0.5,
        }
    }

    /// Build a tree holding a straight two-segment path ahead of the root,
    /// with the closest node at the far end.
    fn straight_tree() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);

        let mnvr = AckMnvr {
            curv_m: 0.0,
            dist_m: 10.0,
        };

        let pose_a = kin::step_ack(&tree.node(tree.root()).pose, &mnvr);
        let a = tree.add_child(tree.root(), mnvr, pose_a);

        let pose_b = kin::step_ack(&pose_a, &mnvr);
        let b = tree.add_child(a, mnvr, pose_b);

        tree.set_closest(b);

        (tree, a, b)
    }

    #[test]
    fn test_walks_path_then_idles() {
        let (mut tree, _a, b) = straight_tree();

        let mut ctrl = PursuitCtrl::with_params(
            test_params(),
            Pose::new(0.0, 0.0, 0.0),
            &tree,
        );

        let input = InputData {
            search_running: true,
            target_orbiting: false,
        };

        for _ in 0..40 {
            ctrl.proc(&mut tree, &input);

            if ctrl.mode() == PursuitCtrlMode::Off {
                break;
            }
        }

        // The agent ends at the far node, within the finish-move tolerance,
        // and the controller returns to idle
        assert_eq!(ctrl.mode(), PursuitCtrlMode::Off);
        let dist = kin::dist_between(
            &ctrl.agent_pose().position_m,
            &tree.node(b).pose.position_m,
        );
        assert!(dist < 1.0);
    }

    #[test]
    fn test_target_bump_reroots_tree() {
        let (mut tree, a, _b) = straight_tree();

        let mut ctrl = PursuitCtrl::with_params(
            test_params(),
            Pose::new(0.0, 0.0, 0.0),
            &tree,
        );

        let input = InputData {
            search_running: true,
            target_orbiting: false,
        };

        // On the first proc the agent sits on its target (the root) with a
        // non-empty path, so the target bumps to the nearest path node and
        // the tree re-roots
        let report = ctrl.proc(&mut tree, &input);

        assert_eq!(ctrl.target_node(), a);
        assert!(report.chopped);
        assert_eq!(tree.root(), tree.node(a).parent.unwrap_or(tree.root()));
    }

    #[test]
    fn test_orbiting_keeps_ticking() {
        let (mut tree, _a, _b) = straight_tree();

        let mut ctrl = PursuitCtrl::with_params(
            test_params(),
            Pose::new(0.0, 0.0, 0.0),
            &tree,
        );

        let input = InputData {
            search_running: true,
            target_orbiting: true,
        };

        // With an orbiting target the controller never goes idle, it ticks
        // in place at the end of the path awaiting new nodes
        for _ in 0..60 {
            ctrl.proc(&mut tree, &input);
        }

        assert_eq!(ctrl.mode(), PursuitCtrlMode::Moving);
        let report = ctrl.proc(&mut tree, &input);
        assert!(report.at_target_node);
    }

    #[test]
    fn test_no_trigger_when_search_off() {
        let (mut tree, _a, _b) = straight_tree();

        let mut ctrl = PursuitCtrl::with_params(
            test_params(),
            Pose::new(0.0, 0.0, 0.0),
            &tree,
        );

        let input = InputData {
            search_running: false,
            target_orbiting: false,
        };

        ctrl.proc(&mut tree, &input);
        assert_eq!(ctrl.mode(), PursuitCtrlMode::Off);
    }

    #[test]
    fn test_stale_target_path_walk_stops_early() {
        // The closest node sits on a different limb than the target node,
        // the path walk must stop at the root without error
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);

        let left = AckMnvr {
            curv_m: 0.3,
            dist_m: 8.0,
        };
        let right = AckMnvr {
            curv_m: -0.3,
            dist_m: 8.0,
        };

        let pose_l = kin::step_ack(&tree.node(tree.root()).pose, &left);
        let l = tree.add_child(tree.root(), left, pose_l);

        let pose_r = kin::step_ack(&tree.node(tree.root()).pose, &right);
        let r = tree.add_child(tree.root(), right, pose_r);

        tree.set_closest(l);

        let mut ctrl = PursuitCtrl::with_params(
            test_params(),
            Pose::new(0.0, 0.0, 0.0),
            &tree,
        );

        // Force the controller to chase the other limb
        ctrl.target_node = r;
        ctrl.mode = PursuitCtrlMode::Moving;

        let input = InputData {
            search_running: true,
            target_orbiting: false,
        };

        let report = ctrl.proc(&mut tree, &input);

        // The walk from l stops at the root, so the path holds l and the
        // root rather than reaching r
        assert_eq!(report.path_len, 2);
    }

    #[test]
    fn test_chases_searched_target() {
        // Run a seeded search towards a fixed target while stepping the
        // controller against the live tree, the agent must come to rest by
        // the target
        use crate::tree_search::{self, TreeSearch, TreeSearchMode};
        use nalgebra::Vector2;

        let search_params = tree_search::Params {
            curv_sample_m: 0.02,
            dist_sample_m: 10.0,
            dist_sample_offset_m: 5.0,
            explore_dist_m: 20.0,
            finish_dist_m: 4.0,
            prune_depth: 30,
            expansions_per_cycle: 2,
            compact_node_limit: 100_000,
        };
        let mut search = TreeSearch::with_seed(search_params, 42);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);

        let ctrl_params = Params {
            step_dist_m: 1.0,
            finish_move_dist_m: 1.0,
            min_curv_dem_m: -0.5,
            max_curv_dem_m: 0.5,
        };
        let mut ctrl = PursuitCtrl::with_params(ctrl_params, Pose::new(0.0, 0.0, 0.0), &tree);

        let target_m = Vector2::new(100.0, 0.0);
        let search_input = tree_search::InputData {
            target_pos_m: target_m,
            target_orbiting: false,
            start_requested: true,
        };

        for _ in 0..100_000 {
            if search.mode() != TreeSearchMode::Finished {
                search.proc(&mut tree, &search_input);
            }

            let pursuit_input = InputData {
                search_running: search.mode() == TreeSearchMode::Running,
                target_orbiting: false,
            };
            ctrl.proc(&mut tree, &pursuit_input);

            if search.mode() == TreeSearchMode::Finished && ctrl.mode() == PursuitCtrlMode::Off {
                break;
            }
        }

        assert_eq!(search.mode(), TreeSearchMode::Finished);
        assert_eq!(ctrl.mode(), PursuitCtrlMode::Off);

        // The agent rests within the finish-move tolerance of the final
        // closest node, which itself lies within the finish distance of the
        // target
        let dist_m = kin::dist_between(&ctrl.agent_pose().position_m, &target_m);
        assert!(dist_m < 5.0);
    }

    #[test]
    fn test_apply_remap_falls_back_to_root() {
        let (tree, a, b) = straight_tree();

        let mut ctrl = PursuitCtrl::with_params(
            test_params(),
            Pose::new(0.0, 0.0, 0.0),
            &tree,
        );
        ctrl.target_node = b;

        // A remap which keeps a but drops b
        let remap: Vec<Option<NodeId>> = vec![Some(tree.root()), Some(a), None];
        ctrl.apply_remap(&remap, &tree);
        assert_eq!(ctrl.target_node(), tree.root());

        // A remap which moves b
        ctrl.target_node = b;
        let remap: Vec<Option<NodeId>> = vec![Some(tree.root()), Some(a), Some(a)];
        ctrl.apply_remap(&remap, &tree);
        assert_eq!(ctrl.target_node(), a);
    }
}
