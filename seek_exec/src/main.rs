//! Main seeker executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Scene command processing and handling
//!         - Target manager processing
//!         - Tree search processing
//!         - Pursuit control processing
//!         - Telemetry assembly and saving
//!
//! The tree search engine, the pursuit controller and the target manager are
//! cooperative tasks: each performs one bounded unit of work when its cadence
//! comes up and then yields back to this loop, so all shared state (the tree,
//! the agent's target node) is only ever mutated between steps.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use seek_lib::{
    data_store::DataStore,
    kin::Pose,
    params::ExecParams,
    pursuit_ctrl::{PursuitCtrl, PursuitCtrlMode},
    target_mgr::TargetMgr,
    tm,
    tree::Tree,
    tree_search::{TreeSearch, TreeSearchMode},
};
use util::{
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("seek_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Seeker Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        util::params::load("exec.toml").wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE SCENARIO SOURCE ----

    // An optional scenario script provides timed scene commands. Without one
    // the run is fully autonomous: the target orbits until the process is
    // stopped externally.
    let mut scenario: Option<ScriptInterpreter> = None;

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // If we have a single argument use it as the script path
    if args.len() == 2 {
        info!("Loading scenario from \"{}\"", &args[1]);

        let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load scenario script")?;

        // Display some info
        info!(
            "Loaded scenario lasts {:.02} s and contains {} commands\n",
            si.get_duration(),
            si.get_num_cmds()
        );

        scenario = Some(si);
    }
    // If no arguments the run is autonomous
    else if args.len() == 1 {
        info!("No scenario script provided, the target will orbit until stopped\n");
    } else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}",
            args.len() - 1
        ));
    }

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let start_pose = Pose::new(
        exec_params.start_pos_m[0],
        exec_params.start_pos_m[1],
        exec_params.start_heading_rad,
    );

    let tree_search =
        TreeSearch::init("tree_search.toml").wrap_err("Failed to initialise TreeSearch")?;
    info!("TreeSearch init complete");

    let tree = Tree::new(start_pose, tree_search.params().prune_depth);

    let pursuit_ctrl = PursuitCtrl::init("pursuit_ctrl.toml", start_pose, &tree)
        .wrap_err("Failed to initialise PursuitCtrl")?;
    info!("PursuitCtrl init complete");

    let target_mgr = TargetMgr::init("target_mgr.toml").wrap_err("Failed to initialise TargetMgr")?;
    info!("TargetMgr init complete");

    let mut ds = DataStore::new(tree, tree_search, pursuit_ctrl, target_mgr);

    // The rollout starts immediately, biased towards the orbiting target
    // until a command fixes it
    ds.search_input.start_requested = true;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let mut scenario_finished = false;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Raise this cycle's cadence flags
        ds.cycle_start(&exec_params);

        // ---- COMMAND PROCESSING ----

        if let Some(ref mut si) = scenario {
            match si.get_pending_cmds() {
                PendingCmds::None => (),
                PendingCmds::Some(cmd_vec) => {
                    for cmd in cmd_vec.iter() {
                        cmd_processor::exec(&mut ds, cmd);
                    }
                }
                PendingCmds::EndOfScript => {
                    if !scenario_finished {
                        info!("End of scenario script reached");
                        scenario_finished = true;
                    }
                }
            }
        }

        // ---- TARGET PROCESSING ----

        if ds.is_pursuit_cycle {
            ds.target_out = ds.target_mgr.proc();
        }

        // ---- SEARCH PROCESSING ----

        if ds.is_search_cycle {
            ds.search_input.target_pos_m = ds.target_out.pos_m;
            ds.search_input.target_orbiting = ds.target_out.orbiting;

            let report = ds.tree_search.proc(&mut ds.tree, &ds.search_input);
            ds.search_input.start_requested = false;

            // A compaction moved the arena around, re-point the controller's
            // target node
            if let Some(ref remap) = report.compaction_remap {
                ds.pursuit_ctrl.apply_remap(remap, &ds.tree);
            }

            ds.search_report = report;
        }

        // ---- PURSUIT PROCESSING ----

        if ds.is_pursuit_cycle {
            ds.pursuit_input.search_running = ds.tree_search.mode() == TreeSearchMode::Running;
            ds.pursuit_input.target_orbiting = ds.target_out.orbiting;

            ds.pursuit_report = ds.pursuit_ctrl.proc(&mut ds.tree, &ds.pursuit_input);
        }

        // ---- TELEMETRY ----

        if ds.is_tm_cycle {
            ds.scene_tm = Some(tm::scene_tm(&ds, util::session::get_elapsed_seconds()));
        }

        if ds.is_save_cycle {
            if let Some(ref scene_tm) = ds.scene_tm {
                session.save(format!("tm/scene_{:010}.json", ds.num_cycles), scene_tm.clone());
            }
        }

        // ---- EXIT CONDITION ----

        // Once the scenario is exhausted, the search has finished and the
        // agent has come to rest the run is over. Orbiting runs never
        // satisfy this and spin until stopped externally.
        if scenario_finished
            && ds.tree_search.mode() == TreeSearchMode::Finished
            && ds.pursuit_ctrl.mode() == PursuitCtrlMode::Off
        {
            info!("Scenario complete, stopping");
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match cycle_period.checked_sub(cycle_dur) {
            Some(remaining) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(remaining);
            }
            None => {
                ds.num_consec_cycle_overruns += 1;
                warn!(
                    "Cycle overran by {:.03} s ({} consecutive overruns)",
                    (cycle_dur - cycle_period).as_secs_f64(),
                    ds.num_consec_cycle_overruns
                );
            }
        }
    }

    // ---- SHUTDOWN ----

    info!(
        "Run complete after {} cycles, {} nodes in the tree",
        ds.num_cycles,
        ds.search_report.num_nodes
    );

    session.exit();

    Ok(())
}
