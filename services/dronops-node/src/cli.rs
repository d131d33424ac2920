//! Command-line surface

use clap::{Args, Parser, Subcommand, ValueEnum};
use dronops_domain::{DroneStatus, PilotStatus, Priority, ResourceKind, ResourceRef};
use std::path::PathBuf;

/// Drone operations coordination engine.
#[derive(Debug, Parser)]
#[command(name = "dronops-node", version, about = "Pilot and drone assignment engine")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot JSON file; overrides `[store] snapshot_path`
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List pilots
    Pilots {
        /// Holds this skill
        #[arg(long)]
        skill: Option<String>,
        /// Holds this certification
        #[arg(long)]
        certification: Option<String>,
        /// Based at this location
        #[arg(long)]
        location: Option<String>,
        /// In this status
        #[arg(long, value_enum)]
        status: Option<PilotStatusArg>,
    },

    /// List drones
    Drones {
        /// Carries this capability
        #[arg(long)]
        capability: Option<String>,
        /// In this status
        #[arg(long, value_enum)]
        status: Option<DroneStatusArg>,
        /// Located here
        #[arg(long)]
        location: Option<String>,
    },

    /// List missions
    Missions {
        /// With this priority
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        /// Flown at this location
        #[arg(long)]
        location: Option<String>,
    },

    /// Strictly eligible pilots or drones for a mission
    Eligible {
        /// Mission id
        mission: String,
        /// Candidate pool
        #[arg(long, value_enum, default_value = "pilot")]
        kind: KindArg,
    },

    /// Advisory suitability ranking for a mission
    Suitability {
        /// Mission id
        mission: String,
        /// Candidate pool
        #[arg(long, value_enum, default_value = "pilot")]
        kind: KindArg,
    },

    /// Scan the roster for conflicts
    Conflicts,

    /// Propose staffing for one mission
    Plan {
        /// Mission id
        mission: String,
        /// Commit the proposal if its hash matches this value
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Propose staffing for every understaffed Urgent mission
    PlanUrgent,

    /// Assign a pilot or drone to a mission
    Assign(ChangeArgs),

    /// Release a pilot or drone from a mission
    Release(ChangeArgs),

    /// Serve one JSON request read from a file
    Request {
        /// Request JSON file
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct ChangeArgs {
    /// Mission id
    pub mission: String,
    /// Resource kind
    #[arg(long, value_enum)]
    pub kind: KindArg,
    /// Resource id
    #[arg(long)]
    pub id: String,
}

impl ChangeArgs {
    pub fn resource(&self) -> ResourceRef {
        ResourceRef::new(self.kind.into(), self.id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Pilot,
    Drone,
}

impl From<KindArg> for ResourceKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Pilot => ResourceKind::Pilot,
            KindArg::Drone => ResourceKind::Drone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PilotStatusArg {
    Available,
    Assigned,
    OnLeave,
    Unavailable,
}

impl From<PilotStatusArg> for PilotStatus {
    fn from(arg: PilotStatusArg) -> Self {
        match arg {
            PilotStatusArg::Available => PilotStatus::Available,
            PilotStatusArg::Assigned => PilotStatus::Assigned,
            PilotStatusArg::OnLeave => PilotStatus::OnLeave,
            PilotStatusArg::Unavailable => PilotStatus::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DroneStatusArg {
    Available,
    InUse,
    Maintenance,
}

impl From<DroneStatusArg> for DroneStatus {
    fn from(arg: DroneStatusArg) -> Self {
        match arg {
            DroneStatusArg::Available => DroneStatus::Available,
            DroneStatusArg::InUse => DroneStatus::InUse,
            DroneStatusArg::Maintenance => DroneStatus::Maintenance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Standard,
    High,
    Urgent,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Standard => Priority::Standard,
            PriorityArg::High => Priority::High,
            PriorityArg::Urgent => Priority::Urgent,
        }
    }
}
