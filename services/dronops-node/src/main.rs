//! dronops-node: operator CLI over a JSON snapshot file
//!
//! Every subcommand is turned into one coordinator request. Results are
//! printed to stdout as JSON; logs go to stderr. Committed changes are
//! written back to the snapshot file before the process exits.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use dronops_assignment::{
    AssignmentChange, AssignmentSink, Coordinator, DroneQuery, JsonFileStore, MissionQuery, PilotQuery,
    PlanOutcome, PlannerOptions, Request, Response, SnapshotSource,
};
use dronops_core::{logging, Config};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init_from_config(&config.logging);

    info!(
        snapshot = %config.store.snapshot_path.display(),
        max_alternatives = config.planner.max_alternatives,
        "dronops-node starting"
    );
    let store = JsonFileStore::new(&config.store.snapshot_path);
    let coordinator = Coordinator::with_options(store, PlannerOptions::from(&config.planner));

    let response = run(&coordinator, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default_config(),
    };
    if let Some(snapshot) = &cli.snapshot {
        config.store.snapshot_path = snapshot.clone();
    }
    Ok(config)
}

fn build_request(command: Commands) -> Result<Request> {
    Ok(match command {
        Commands::Pilots {
            skill,
            certification,
            location,
            status,
        } => Request::ListPilots(PilotQuery {
            skill,
            certification,
            location,
            status: status.map(Into::into),
        }),
        Commands::Drones {
            capability,
            status,
            location,
        } => Request::ListDrones(DroneQuery {
            capability,
            status: status.map(Into::into),
            location,
        }),
        Commands::Missions { priority, location } => Request::ListMissions(MissionQuery {
            priority: priority.map(Into::into),
            location,
        }),
        Commands::Eligible { mission, kind } => Request::FindEligible {
            mission_id: mission,
            kind: kind.into(),
        },
        Commands::Suitability { mission, kind } => Request::RankSuitability {
            mission_id: mission,
            kind: kind.into(),
        },
        Commands::Conflicts => Request::DetectConflicts,
        Commands::Plan { mission, .. } => Request::PlanReassignment { mission_id: mission },
        Commands::PlanUrgent => Request::PlanUrgentBatch,
        Commands::Assign(args) => Request::ApplyAssignment(AssignmentChange::assign(args.resource(), args.mission)),
        Commands::Release(args) => Request::ApplyAssignment(AssignmentChange::release(args.resource(), args.mission)),
        Commands::Request { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read request {}", file.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("invalid request in {}", file.display()))?
        }
    })
}

/// Serve one command; committed changes are persisted to the store.
fn run<S>(coordinator: &Coordinator<S>, command: Commands) -> Result<Response>
where
    S: SnapshotSource + AssignmentSink,
{
    let confirm = match &command {
        Commands::Plan { confirm, .. } => confirm.clone(),
        _ => None,
    };

    let mut response = coordinator.handle(build_request(command)?)?;
    if let (Some(confirmation), Response::Plan(PlanOutcome::Plan(plan))) = (confirm, &response) {
        response = coordinator.handle(Request::ApplyPlan {
            plan: plan.clone(),
            confirmation,
        })?;
    }
    if let Response::Committed(result) = &response {
        coordinator.emit(coordinator.source(), result)?;
    }
    Ok(response)
}
