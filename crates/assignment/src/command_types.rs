//! Request and response envelopes for the coordinator
//!
//! Every operation the coordinator serves has one request variant. Both enums
//! are tagged so they travel as self-describing JSON.

#![warn(missing_docs)]

use crate::conflicts::ConflictReport;
use crate::coordinator::{AssignmentChange, CommitResult};
use crate::matcher::EligibleCandidate;
use crate::planner::{PlanOutcome, ReassignmentPlan};
use crate::roster::{DroneQuery, MissionQuery, PilotQuery};
use crate::suitability::SuitabilityEntry;
use dronops_domain::{Drone, Mission, Pilot, ResourceKind};
use serde::{Deserialize, Serialize};

/// Operator request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Request {
    /// Filtered pilot roster
    ListPilots(PilotQuery),
    /// Filtered drone fleet
    ListDrones(DroneQuery),
    /// Filtered mission list
    ListMissions(MissionQuery),
    /// Strictly eligible candidates
    FindEligible {
        /// Target mission
        mission_id: String,
        /// Pilot or drone pool
        kind: ResourceKind,
    },
    /// Advisory ranking
    RankSuitability {
        /// Target mission
        mission_id: String,
        /// Pilot or drone pool
        kind: ResourceKind,
    },
    /// Full conflict scan
    DetectConflicts,
    /// Staffing proposal for one mission
    PlanReassignment {
        /// Target mission
        mission_id: String,
    },
    /// Staffing proposals for every understaffed Urgent mission
    PlanUrgentBatch,
    /// Single operator change
    ApplyAssignment(AssignmentChange),
    /// Confirm a proposal
    ApplyPlan {
        /// Proposal as returned by the planner
        plan: ReassignmentPlan,
        /// Echo of the proposal hash
        confirmation: String,
    },
}

/// Coordinator response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Response {
    /// Pilots
    Pilots(Vec<Pilot>),
    /// Drones
    Drones(Vec<Drone>),
    /// Missions
    Missions(Vec<Mission>),
    /// Eligible candidates, best first
    Eligible(Vec<EligibleCandidate>),
    /// Suitability ranking, best first
    Suitability(Vec<SuitabilityEntry>),
    /// Conflict report
    Conflicts(ConflictReport),
    /// One proposal
    Plan(PlanOutcome),
    /// Batch proposals in processing order
    Plans(Vec<PlanOutcome>),
    /// Committed deltas
    Committed(CommitResult),
}
