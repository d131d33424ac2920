//! Drone-ops assignment engine
//!
//! Matches pilots and drones to missions, detects roster conflicts and plans
//! urgent reassignments over a snapshot supplied by an external store.
//!
//! # Architecture
//!
//! Requests flow through the following pipeline:
//! 1. `Coordinator` fetches a fresh snapshot from its `SnapshotSource`
//! 2. Malformed records are dropped and the assignment relation is derived
//! 3. The matcher, conflict scanner or planner computes a read-only result
//! 4. Confirmed changes are re-validated step by step and returned as deltas
//! 5. The caller persists the deltas through an `AssignmentSink`
//!
//! # Plan confirmation
//!
//! A `ReassignmentPlan` carries a BLAKE3 hash of its steps. `apply_plan`
//! accepts the plan only when the caller echoes that hash back, and rejects
//! it with `StaleState` when the roster moved underneath the proposal.
//!
//! # Examples
//!
//! ```no_run
//! use dronops_assignment::{Coordinator, JsonFileStore, PlanOutcome};
//!
//! let coordinator = Coordinator::new(JsonFileStore::new("snapshot.json"));
//! if let PlanOutcome::Plan(plan) = coordinator.plan_reassignment("PRJ009")? {
//!     let committed = coordinator.apply_plan(&plan, &plan.plan_hash)?;
//!     coordinator.emit(coordinator.source(), &committed)?;
//! }
//! # Ok::<(), dronops_assignment::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod command_types;
pub mod conflicts;
pub mod coordinator;
pub mod error;
pub mod matcher;
pub mod planner;
pub mod roster;
pub mod store;
pub mod suitability;
pub mod view;

pub use command_types::{Request, Response};
pub use conflicts::{detect_conflicts, Conflict, ConflictReason, ConflictReport, Severity};
pub use coordinator::{
    AssignmentChange, AssignmentDelta, ChangeAction, CommitResult, Coordinator, PriorState,
    ResourceStatus,
};
pub use error::{EngineError, Result};
pub use matcher::{check_eligible, find_eligible, Candidate, EligibleCandidate, Ineligibility};
pub use planner::{
    plan_urgent_batch, plan_urgent_reassignment, Donor, ImpactNote, PlanKind, PlanOutcome, PlanStep,
    PlannerOptions, RankedCandidate, ReassignmentPlan,
};
pub use roster::{DroneQuery, MissionQuery, PilotQuery};
pub use store::{
    prior_state, AssignmentSink, InMemoryStore, JsonFileStore, SnapshotSource, StoreError,
};
pub use suitability::{rank_drone_suitability, rank_pilot_suitability, SuitabilityEntry};
pub use view::RosterView;
