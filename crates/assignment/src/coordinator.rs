//! Assignment coordinator
//!
//! Entry point for every operator request. Each call fetches a fresh snapshot
//! from the [`SnapshotSource`], so no result is ever computed against a cached
//! roster. Commits are optimistic: every step is re-validated against the fresh
//! snapshot and the whole batch is rejected with [`EngineError::StaleState`]
//! when any step no longer holds. The source is never written to; committed
//! deltas are returned for the caller to hand to an [`AssignmentSink`].

#![warn(missing_docs)]

use crate::command_types::{Request, Response};
use crate::conflicts::{self, ConflictReport};
use crate::error::{EngineError, Result};
use crate::matcher::{check_eligible, eligible_for, Candidate, EligibleCandidate};
use crate::planner::{self, PlanOutcome, PlanStep, PlannerOptions, ReassignmentPlan};
use crate::roster::{DroneQuery, MissionQuery, PilotQuery};
use crate::store::{self, AssignmentSink, SnapshotSource, StoreError};
use crate::suitability::{rank_drone_suitability, rank_pilot_suitability, SuitabilityEntry};
use crate::view::RosterView;
use chrono::{DateTime, Utc};
use dronops_domain::{
    Drone, DroneStatus, Mission, Pilot, PilotStatus, ResourceKind, ResourceRef, Snapshot,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Direction of an assignment change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// Book the resource on the mission
    Assign,
    /// Take the resource off the mission
    Release,
}

/// One requested assignment change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentChange {
    /// Pilot or drone to move
    pub resource: ResourceRef,
    /// Mission it joins or leaves
    pub mission_id: String,
    /// Assign or release
    pub action: ChangeAction,
}

impl AssignmentChange {
    /// Assign `resource` to `mission_id`
    pub fn assign(resource: ResourceRef, mission_id: impl Into<String>) -> Self {
        Self {
            resource,
            mission_id: mission_id.into(),
            action: ChangeAction::Assign,
        }
    }

    /// Release `resource` from `mission_id`
    pub fn release(resource: ResourceRef, mission_id: impl Into<String>) -> Self {
        Self {
            resource,
            mission_id: mission_id.into(),
            action: ChangeAction::Release,
        }
    }
}

impl From<&PlanStep> for AssignmentChange {
    fn from(step: &PlanStep) -> Self {
        match step {
            PlanStep::Release { resource, mission_id } => Self::release(resource.clone(), mission_id.clone()),
            PlanStep::Assign { resource, mission_id } => Self::assign(resource.clone(), mission_id.clone()),
        }
    }
}

/// Status a resource takes after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Pilot status
    Pilot(PilotStatus),
    /// Drone status
    Drone(DroneStatus),
}

/// Store state a delta was computed against.
///
/// The store refuses the delta when any field differs at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorState {
    /// Holder of the mission's slot for this kind of resource
    pub slot_holder: Option<String>,
    /// The resource's `current_assignment`
    pub current_assignment: Option<String>,
    /// The resource's status
    pub status: ResourceStatus,
}

/// A committed change, ready for the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDelta {
    /// Resource moved
    pub resource: ResourceRef,
    /// Mission it joined or left
    pub mission_id: String,
    /// Assign or release
    pub action: ChangeAction,
    /// Status the resource takes
    pub new_status: ResourceStatus,
    /// Expected store state before the change
    pub prior: PriorState,
    /// Commit time
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a successful commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    /// Deltas in application order
    pub deltas: Vec<AssignmentDelta>,
}

/// Serves operator requests against a snapshot source
#[derive(Debug)]
pub struct Coordinator<S> {
    source: S,
    options: PlannerOptions,
}

impl<S: SnapshotSource> Coordinator<S> {
    /// Coordinator with default planner options
    pub fn new(source: S) -> Self {
        Self::with_options(source, PlannerOptions::default())
    }

    /// Coordinator with explicit planner options
    pub fn with_options(source: S, options: PlannerOptions) -> Self {
        Self { source, options }
    }

    /// Underlying snapshot source
    pub fn source(&self) -> &S {
        &self.source
    }

    fn fetch(&self) -> Result<Snapshot> {
        let snapshot = self.source.fetch()?;
        debug!(
            as_of = %snapshot.as_of,
            pilots = snapshot.pilots.len(),
            drones = snapshot.drones.len(),
            missions = snapshot.missions.len(),
            "Snapshot fetched"
        );
        Ok(snapshot)
    }

    /// Eligible pilots or drones for a mission
    pub fn find_eligible(&self, mission_id: &str, kind: ResourceKind) -> Result<Vec<EligibleCandidate>> {
        let snapshot = self.fetch()?;
        let validated = snapshot.validated();
        let view = RosterView::new(&validated)?;
        let mission = view.mission(mission_id)?;
        Ok(eligible_for(&view, mission, kind))
    }

    /// Advisory ranking of every qualified pilot or usable drone
    pub fn rank_suitability(&self, mission_id: &str, kind: ResourceKind) -> Result<Vec<SuitabilityEntry>> {
        let snapshot = self.fetch()?;
        let validated = snapshot.validated();
        let view = RosterView::new(&validated)?;
        let mission = view.mission(mission_id)?;
        Ok(match kind {
            ResourceKind::Pilot => rank_pilot_suitability(mission, &view.snapshot.pilots),
            ResourceKind::Drone => rank_drone_suitability(mission, &view.snapshot.drones),
        })
    }

    /// Pilots matching a query
    pub fn query_pilots(&self, query: &PilotQuery) -> Result<Vec<Pilot>> {
        Ok(query.apply(&self.fetch()?.validated().snapshot.pilots))
    }

    /// Drones matching a query
    pub fn query_drones(&self, query: &DroneQuery) -> Result<Vec<Drone>> {
        Ok(query.apply(&self.fetch()?.validated().snapshot.drones))
    }

    /// Missions matching a query
    pub fn query_missions(&self, query: &MissionQuery) -> Result<Vec<Mission>> {
        Ok(query.apply(&self.fetch()?.validated().snapshot.missions))
    }

    /// Full conflict scan of the current snapshot
    pub fn detect_conflicts(&self) -> Result<ConflictReport> {
        conflicts::detect_conflicts(&self.fetch()?)
    }

    /// Propose staffing for one mission
    pub fn plan_reassignment(&self, mission_id: &str) -> Result<PlanOutcome> {
        let snapshot = self.fetch()?;
        let validated = snapshot.validated();
        let view = RosterView::new(&validated)?;
        planner::plan_urgent_reassignment(&view, mission_id, self.options)
    }

    /// Propose staffing for every understaffed Urgent mission
    pub fn plan_urgent_batch(&self) -> Result<Vec<PlanOutcome>> {
        let snapshot = self.fetch()?;
        let validated = snapshot.validated();
        let view = RosterView::new(&validated)?;
        planner::plan_urgent_batch(&view, self.options)
    }

    /// Commit a single operator change
    pub fn apply_assignment(&self, change: &AssignmentChange) -> Result<CommitResult> {
        self.commit(std::slice::from_ref(change))
    }

    /// Commit a proposed plan.
    ///
    /// `confirmation` must echo the plan's hash, and the plan contents must
    /// still hash to it. Every step is then re-validated against a fresh
    /// snapshot.
    pub fn apply_plan(&self, plan: &ReassignmentPlan, confirmation: &str) -> Result<CommitResult> {
        let expected = plan.compute_hash()?;
        for supplied in [plan.plan_hash.as_str(), confirmation] {
            if supplied != expected {
                warn!(mission_id = %plan.mission_id, "Plan confirmation rejected");
                return Err(EngineError::PlanHashMismatch {
                    expected,
                    actual: supplied.to_string(),
                });
            }
        }
        let changes: Vec<AssignmentChange> = plan.steps.iter().map(AssignmentChange::from).collect();
        self.commit(&changes)
    }

    fn commit(&self, changes: &[AssignmentChange]) -> Result<CommitResult> {
        let mut working = self.fetch()?.validated().snapshot;
        let timestamp = Utc::now();
        let mut deltas = Vec::with_capacity(changes.len());

        for change in changes {
            let delta = match revalidate(&working, change, timestamp) {
                Ok(delta) => delta,
                Err(err) => {
                    warn!(
                        resource = %change.resource,
                        mission_id = %change.mission_id,
                        action = ?change.action,
                        error = %err,
                        "Commit rejected"
                    );
                    return Err(err);
                }
            };
            store::apply_delta(&mut working, &delta)?;
            deltas.push(delta);
        }

        info!(changes = deltas.len(), "Assignment changes committed");
        Ok(CommitResult { deltas })
    }

    /// Hand committed deltas to a sink.
    ///
    /// A sink that moved since the commit was validated rejects the whole
    /// batch with [`EngineError::StaleState`].
    pub fn emit<K: AssignmentSink>(&self, sink: &K, result: &CommitResult) -> Result<()> {
        sink.persist(&result.deltas).map_err(|err| match err {
            StoreError::Stale {
                resource,
                mission_id,
                reason,
            } => {
                warn!(resource = %resource, mission_id = %mission_id, reason = %reason, "Persist rejected");
                EngineError::StaleState {
                    resource,
                    mission_id,
                    reason,
                }
            }
            other => EngineError::Store(other),
        })?;
        info!(deltas = result.deltas.len(), "Assignment deltas persisted");
        Ok(())
    }

    /// Serve one request
    pub fn handle(&self, request: Request) -> Result<Response> {
        Ok(match request {
            Request::ListPilots(query) => Response::Pilots(self.query_pilots(&query)?),
            Request::ListDrones(query) => Response::Drones(self.query_drones(&query)?),
            Request::ListMissions(query) => Response::Missions(self.query_missions(&query)?),
            Request::FindEligible { mission_id, kind } => {
                Response::Eligible(self.find_eligible(&mission_id, kind)?)
            }
            Request::RankSuitability { mission_id, kind } => {
                Response::Suitability(self.rank_suitability(&mission_id, kind)?)
            }
            Request::DetectConflicts => Response::Conflicts(self.detect_conflicts()?),
            Request::PlanReassignment { mission_id } => Response::Plan(self.plan_reassignment(&mission_id)?),
            Request::PlanUrgentBatch => Response::Plans(self.plan_urgent_batch()?),
            Request::ApplyAssignment(change) => Response::Committed(self.apply_assignment(&change)?),
            Request::ApplyPlan { plan, confirmation } => {
                Response::Committed(self.apply_plan(&plan, &confirmation)?)
            }
        })
    }
}

fn stale(change: &AssignmentChange, reason: impl Into<String>) -> EngineError {
    EngineError::StaleState {
        resource: change.resource.clone(),
        mission_id: change.mission_id.clone(),
        reason: reason.into(),
    }
}

/// Check one change against the working snapshot and build its delta
fn revalidate(working: &Snapshot, change: &AssignmentChange, timestamp: DateTime<Utc>) -> Result<AssignmentDelta> {
    let validated = working.validated();
    let view = RosterView::new(&validated)?;
    let mission = view.mission(&change.mission_id)?;
    if !working.has_resource(change.resource.kind(), change.resource.id()) {
        return Err(EngineError::ResourceNotFound(change.resource.clone()));
    }

    let new_status = match change.action {
        ChangeAction::Release => {
            let booked = view
                .assignments
                .for_resource(&change.resource)
                .any(|a| a.mission_id == mission.id);
            if !booked {
                return Err(stale(change, format!("not assigned to mission {}", mission.id)));
            }
            released_status(working, &change.resource, &mission.id)?
        }
        ChangeAction::Assign => {
            if let Some(holder) = mission.assigned(change.resource.kind()) {
                let reason = if holder == change.resource.id() {
                    "already assigned to this mission".to_string()
                } else {
                    format!("{} slot already held by {}", change.resource.kind(), holder)
                };
                return Err(stale(change, reason));
            }
            let eligible = match &change.resource {
                ResourceRef::Pilot(id) => working
                    .pilot(id)
                    .map(|p| check_eligible(p, mission, &view.assignments)),
                ResourceRef::Drone(id) => working
                    .drone(id)
                    .map(|d| check_eligible(d, mission, &view.assignments)),
            };
            match eligible {
                Some(Ok(())) => {}
                Some(Err(reason)) => return Err(stale(change, reason.to_string())),
                None => return Err(EngineError::ResourceNotFound(change.resource.clone())),
            }
            match change.resource {
                ResourceRef::Pilot(_) => ResourceStatus::Pilot(PilotStatus::Assigned),
                ResourceRef::Drone(_) => ResourceStatus::Drone(DroneStatus::InUse),
            }
        }
    };

    Ok(AssignmentDelta {
        resource: change.resource.clone(),
        mission_id: change.mission_id.clone(),
        action: change.action,
        new_status,
        prior: store::prior_state(working, &change.resource, &change.mission_id)?,
        timestamp,
    })
}

/// Status after release.
///
/// Only the booking statuses change. A resource still pointing at another
/// mission, or one on leave or in maintenance, keeps its status.
fn released_status(working: &Snapshot, resource: &ResourceRef, mission_id: &str) -> Result<ResourceStatus> {
    let elsewhere = |current: &Option<String>| current.as_deref().is_some_and(|m| m != mission_id);
    match resource {
        ResourceRef::Pilot(id) => {
            let pilot = working
                .pilot(id)
                .ok_or_else(|| EngineError::ResourceNotFound(resource.clone()))?;
            let status = match pilot.status {
                PilotStatus::Assigned if !elsewhere(&pilot.current_assignment) => {
                    if pilot.available_from <= working.as_of {
                        PilotStatus::Available
                    } else {
                        PilotStatus::Unavailable
                    }
                }
                other => other,
            };
            Ok(ResourceStatus::Pilot(status))
        }
        ResourceRef::Drone(id) => {
            let drone = working
                .drone(id)
                .ok_or_else(|| EngineError::ResourceNotFound(resource.clone()))?;
            let status = match drone.status {
                DroneStatus::InUse if !elsewhere(&drone.current_assignment) => DroneStatus::Available,
                other => other,
            };
            Ok(ResourceStatus::Drone(status))
        }
    }
}
