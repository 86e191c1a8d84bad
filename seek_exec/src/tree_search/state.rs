//! Tree search engine state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Internal
use super::Params;
use crate::kin::{self, AckMnvr};
use crate::tree::{NodeId, Tree};
use util::{maths::lin_map, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct TreeSearch {
    params: Params,

    /// Executing mode
    mode: TreeSearchMode,

    /// Manoeuvre sampler
    rng: StdRng,

    report: StatusReport,
}

/// Input data for one proc call.
#[derive(Debug, Default, Copy, Clone)]
pub struct InputData {
    /// Current position of the target
    pub target_pos_m: Vector2<f64>,

    /// True if the target is currently orbiting. Orbiting targets never
    /// satisfy the finish condition.
    pub target_orbiting: bool,

    /// Request to start a rollout. Ignored while a rollout is already
    /// running.
    pub start_requested: bool,
}

/// The status report containing monitoring quantities for one proc call.
#[derive(Debug, Default, Clone)]
pub struct StatusReport {
    /// Distance from the closest node to the target at the end of the call
    pub dist_to_target_m: f64,

    /// Number of nodes in the tree
    pub num_nodes: usize,

    /// Length of the frontier
    pub frontier_len: usize,

    /// Number of expansion steps performed in this call
    pub num_expansions: usize,

    /// True if the finish condition was met in this call
    pub finished: bool,

    /// True if the trunk was chopped in this call
    pub pruned: bool,

    /// True if the frontier emptied and was re-seeded from the root
    pub refilled: bool,

    /// If the tree was compacted in this call, the old-id to new-id remap
    /// which external holders of node ids must apply
    pub compaction_remap: Option<Vec<Option<NodeId>>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during initialisation of the module.
#[derive(Debug, thiserror::Error)]
pub enum TreeSearchError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),
}

/// The possible modes of execution of the tree search engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TreeSearchMode {
    Off,
    Running,
    Finished,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TreeSearch {
    /// Intiailise the tree search engine.
    ///
    /// Expected init data is a path to the parameter file.
    pub fn init(params_path: &str) -> Result<Self, TreeSearchError> {
        // Load the parameters
        let params = match params::load(params_path) {
            Ok(p) => p,
            Err(e) => return Err(TreeSearchError::ParamLoadError(e)),
        };

        Ok(Self::with_rng(params, StdRng::from_entropy()))
    }

    /// Create an engine directly from parameters with a seeded sampler.
    ///
    /// With a fixed seed the sequence of expansions is deterministic.
    pub fn with_seed(params: Params, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: Params, rng: StdRng) -> Self {
        Self {
            params,
            mode: TreeSearchMode::Off,
            rng,
            report: StatusReport::default(),
        }
    }

    pub fn mode(&self) -> TreeSearchMode {
        self.mode
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Process the tree search engine.
    ///
    /// Performs up to `expansions_per_cycle` expansion steps on the tree,
    /// then compacts the arena if it has grown past the configured limit.
    pub fn proc(&mut self, tree: &mut Tree, input: &InputData) -> StatusReport {
        // Setup cycle data
        self.report = StatusReport::default();

        // A rollout is triggered only if one isn't already running
        if input.start_requested && self.mode != TreeSearchMode::Running {
            self.mode = TreeSearchMode::Running;
            info!("Tree search rollout started");
        }

        if self.mode == TreeSearchMode::Running {
            for _ in 0..self.params.expansions_per_cycle {
                self.step_expand(tree, input);

                if self.mode != TreeSearchMode::Running {
                    break;
                }
            }

            // Reclaim the memory of chopped-off subtrees once the arena has
            // grown past the limit
            if tree.num_nodes() > self.params.compact_node_limit {
                let num_before = tree.num_nodes();
                self.report.compaction_remap = Some(tree.compact());
                info!(
                    "Tree compacted from {} to {} nodes",
                    num_before,
                    tree.num_nodes()
                );
            }
        }

        self.report.dist_to_target_m = kin::dist_between(
            &tree.node(tree.closest()).pose.position_m,
            &input.target_pos_m,
        );
        self.report.num_nodes = tree.num_nodes();
        self.report.frontier_len = tree.frontier_len();

        self.report.clone()
    }

    /// Perform a single expansion step.
    fn step_expand(&mut self, tree: &mut Tree, input: &InputData) {
        // Pop the oldest node from the frontier. An empty frontier is
        // re-seeded from the root.
        let node_id = match tree.pop_frontier() {
            Some(n) => n,
            None => {
                self.refill_frontier(tree);
                return;
            }
        };

        // Draw a fresh manoeuvre for this node. Sampling happens on every
        // expansion, so expanding the same node again produces a different
        // child.
        let mnvr = self.sample_mnvr();
        let parent_pose = tree.node(node_id).pose;
        let child_pose = kin::step_ack(&parent_pose, &mnvr);
        let child_id = tree.add_child(node_id, mnvr, child_pose);

        self.report.num_expansions += 1;

        let dist_to_closest_m = kin::dist_between(
            &tree.node(tree.closest()).pose.position_m,
            &input.target_pos_m,
        );
        let dist_to_child_m = kin::dist_between(&child_pose.position_m, &input.target_pos_m);

        // Acceptance policy: a strictly better child becomes the new closest
        // node, a child within the exploration margin stays eligible for
        // expansion, anything else is kept in the tree but not explored
        // further.
        if dist_to_child_m < dist_to_closest_m {
            tree.set_closest(child_id);
            tree.push_frontier(child_id);
        } else if dist_to_child_m < dist_to_closest_m + self.params.explore_dist_m {
            tree.push_frontier(child_id);
        }

        // The expanded node itself remains a viable expansion root while it
        // is within the exploration margin
        let dist_to_node_m = kin::dist_between(&parent_pose.position_m, &input.target_pos_m);
        if dist_to_node_m < dist_to_closest_m + self.params.explore_dist_m {
            tree.push_frontier(node_id);
        }

        // Finish condition. Orbiting targets keep the search running
        // indefinitely.
        if dist_to_child_m < self.params.finish_dist_m && !input.target_orbiting {
            self.mode = TreeSearchMode::Finished;
            self.report.finished = true;
            info!(
                "Search finished, node within {:.2} m of the target",
                dist_to_child_m
            );
            return;
        }

        // Trunk pruning: the ancestor of the closest node at the retention
        // depth marks the trunk, its parent becomes the new root
        if let Some(trunk) = tree.ancestor_at(tree.closest(), self.params.prune_depth) {
            if tree.chop_trunk(trunk) {
                self.report.pruned = true;
            }
        }

        // Safety refill, the search must not stall permanently
        if tree.frontier_is_empty() {
            self.refill_frontier(tree);
        }
    }

    /// Re-seed an empty frontier with the root, resetting the closest node
    /// tracking.
    fn refill_frontier(&mut self, tree: &mut Tree) {
        warn!("Frontier emptied, re-seeding from the root");
        let root = tree.root();
        tree.push_frontier(root);
        tree.set_closest(root);
        self.report.refilled = true;
    }

    /// Draw a fresh expansion manoeuvre from the configured sample ranges.
    fn sample_mnvr(&mut self) -> AckMnvr {
        AckMnvr {
            curv_m: lin_map(
                (0.0, 1.0),
                (-self.params.curv_sample_m, self.params.curv_sample_m),
                self.rng.gen::<f64>(),
            ),
            dist_m: lin_map(
                (0.0, 1.0),
                (
                    self.params.dist_sample_offset_m,
                    self.params.dist_sample_offset_m + self.params.dist_sample_m,
                ),
                self.rng.gen::<f64>(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::kin::Pose;

    fn test_params() -> Params {
        Params {
            curv_sample_m: 0.02,
            dist_sample_m: 10.0,
            dist_sample_offset_m: 5.0,
            explore_dist_m: 20.0,
            finish_dist_m: 5.0,
            prune_depth: 30,
            expansions_per_cycle: 64,
            compact_node_limit: 100_000,
        }
    }

    fn fixed_input(x_m: f64, y_m: f64) -> InputData {
        InputData {
            target_pos_m: Vector2::new(x_m, y_m),
            target_orbiting: false,
            start_requested: true,
        }
    }

    #[test]
    fn test_seeded_run_finishes() {
        // A stationary target ahead of the start pose must be reached within
        // a bounded number of expansions
        let mut search = TreeSearch::with_seed(test_params(), 42);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);
        let input = fixed_input(100.0, 0.0);

        for _ in 0..1000 {
            search.proc(&mut tree, &input);

            if search.mode() == TreeSearchMode::Finished {
                break;
            }
        }

        assert_eq!(search.mode(), TreeSearchMode::Finished);

        // The closest node ends within the finish distance of the target
        let dist = kin::dist_between(
            &tree.node(tree.closest()).pose.position_m,
            &input.target_pos_m,
        );
        assert!(dist < 5.0);
    }

    #[test]
    fn test_closest_dist_monotonic() {
        // While the target is stationary the closest distance never
        // increases (no refill occurs with a healthy exploration margin)
        let mut search = TreeSearch::with_seed(test_params(), 7);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);
        let input = fixed_input(100.0, 40.0);

        let mut last_dist_m = std::f64::MAX;
        for _ in 0..200 {
            let report = search.proc(&mut tree, &input);
            assert!(!report.refilled);
            assert!(report.dist_to_target_m <= last_dist_m);
            last_dist_m = report.dist_to_target_m;

            if search.mode() == TreeSearchMode::Finished {
                break;
            }
        }
    }

    #[test]
    fn test_orbiting_never_finishes() {
        // With an orbiting target the finish condition is never taken, even
        // when nodes land inside the finish distance
        let mut params = test_params();
        params.finish_dist_m = 1000.0;
        let mut search = TreeSearch::with_seed(params, 3);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);

        let mut input = fixed_input(50.0, 0.0);
        input.target_orbiting = true;

        for _ in 0..100 {
            search.proc(&mut tree, &input);
            assert_eq!(search.mode(), TreeSearchMode::Running);
        }
    }

    #[test]
    fn test_frontier_refill() {
        // A target sitting on the root with a zero exploration margin
        // discards every child and empties the frontier, which must be
        // re-seeded rather than stalling
        let mut params = test_params();
        params.explore_dist_m = 0.0;
        params.finish_dist_m = 0.001;
        params.expansions_per_cycle = 4;
        let mut search = TreeSearch::with_seed(params, 11);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);
        let input = fixed_input(0.0, 0.0);

        let report = search.proc(&mut tree, &input);

        assert!(report.refilled);
        assert_eq!(search.mode(), TreeSearchMode::Running);
        assert!(!tree.frontier_is_empty());
    }

    #[test]
    fn test_trunk_pruning_bounds_depth() {
        // With a shallow retention depth the chain from the closest node to
        // the root stays bounded
        let mut params = test_params();
        params.prune_depth = 5;
        let mut search = TreeSearch::with_seed(params, 19);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 5);
        let input = fixed_input(200.0, 0.0);

        let mut saw_prune = false;
        for _ in 0..200 {
            let report = search.proc(&mut tree, &input);
            saw_prune |= report.pruned;

            // The closest node must sit at most prune_depth + 1 hops below
            // the root
            assert!(tree.ancestor_at(tree.closest(), 5 + 2).is_none());

            if search.mode() == TreeSearchMode::Finished {
                break;
            }
        }

        assert!(saw_prune);
    }

    #[test]
    fn test_compaction_keeps_search_consistent() {
        // Force frequent compactions and check the search still converges
        // The target sits well within the reach of the retained window (the
        // root does not advance without an agent walking the path), and the
        // tight finish distance keeps the rollout churning long enough for
        // the arena to grow past the limit
        let mut params = test_params();
        params.prune_depth = 5;
        params.compact_node_limit = 64;
        params.finish_dist_m = 1.0;
        let mut search = TreeSearch::with_seed(params, 23);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 5);
        let input = fixed_input(40.0, 0.0);

        let mut saw_compaction = false;
        for _ in 0..1000 {
            let report = search.proc(&mut tree, &input);

            if report.compaction_remap.is_some() {
                saw_compaction = true;
                assert!(!tree.frontier_is_empty());
            }

            if search.mode() == TreeSearchMode::Finished {
                break;
            }
        }

        assert!(saw_compaction);
        assert_eq!(search.mode(), TreeSearchMode::Finished);
    }

    #[test]
    fn test_start_is_ignored_while_running() {
        let mut search = TreeSearch::with_seed(test_params(), 2);
        let mut tree = Tree::new(Pose::new(0.0, 0.0, 0.0), 30);
        let input = fixed_input(500.0, 0.0);

        search.proc(&mut tree, &input);
        assert_eq!(search.mode(), TreeSearchMode::Running);

        // A second start request leaves the rollout untouched
        let nodes_before = tree.num_nodes();
        search.proc(&mut tree, &input);
        assert_eq!(search.mode(), TreeSearchMode::Running);
        assert!(tree.num_nodes() > nodes_before);
    }
}
