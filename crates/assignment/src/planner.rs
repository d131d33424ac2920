//! Reassignment planning for urgent missions
//!
//! Planning never mutates anything. It proposes a [`ReassignmentPlan`] that
//! the coordinator applies only after the caller echoes the plan hash back.
//!
//! For every open slot (pilot, drone) of the target mission:
//! 1. An eligible, unbooked candidate gives a direct assignment.
//! 2. Otherwise candidates booked on a strictly lower priority mission, who
//!    would be eligible once released, are ranked by priority gap (desc),
//!    donor start date (desc), then id (asc). The best one is released from
//!    its donor mission and assigned to the target.
//! 3. If a slot has neither, no plan is available.

#![warn(missing_docs)]

use crate::error::{EngineError, Result};
use crate::matcher::{check_qualified, find_eligible, Candidate};
use crate::view::RosterView;
use chrono::NaiveDate;
use dronops_domain::{
    Drone, DroneStatus, Mission, Pilot, PilotStatus, Priority, ResourceKind, ResourceRef,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanStep {
    /// Take the resource off a mission
    Release {
        /// Resource to release
        resource: ResourceRef,
        /// Mission it leaves
        mission_id: String,
    },
    /// Put the resource on a mission
    Assign {
        /// Resource to assign
        resource: ResourceRef,
        /// Mission it joins
        mission_id: String,
    },
}

/// Mission a candidate would be pulled from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Donor mission id
    pub mission_id: String,
    /// Donor priority
    pub priority: Priority,
    /// Donor start date
    pub start_date: NaiveDate,
    /// Target rank minus donor rank, always positive
    pub priority_gap: u8,
}

/// A candidate for one slot, with its donor when it must be released first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// The candidate
    pub resource: ResourceRef,
    /// `None` for a direct assignment
    pub donor: Option<Donor>,
}

/// Consequence of a plan for another mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactNote {
    /// Mission losing a resource
    pub mission_id: String,
    /// Resource it loses
    pub resource: ResourceRef,
    /// Operator-facing note
    pub note: String,
}

/// Whether a plan pulls resources from other missions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Every open slot filled by an unbooked candidate
    Direct,
    /// At least one slot filled by releasing a resource from a donor
    Reassignment,
}

/// Proposed, not yet committed, staffing of one mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentPlan {
    /// Target mission
    pub mission_id: String,
    /// Direct or reassignment
    pub kind: PlanKind,
    /// Steps in application order
    pub steps: Vec<PlanStep>,
    /// Missions left short-handed
    pub impacts: Vec<ImpactNote>,
    /// Ranked backups per slot, best first, excluding the chosen ones
    pub alternatives: Vec<RankedCandidate>,
    /// BLAKE3 hex digest of mission id and steps
    pub plan_hash: String,
}

impl ReassignmentPlan {
    /// Recompute the hash from the plan's mission id and steps
    pub fn compute_hash(&self) -> Result<String> {
        plan_hash(&self.mission_id, &self.steps)
    }

    /// Resources the plan assigns
    pub fn claimed(&self) -> impl Iterator<Item = &ResourceRef> {
        self.steps.iter().filter_map(|s| match s {
            PlanStep::Assign { resource, .. } => Some(resource),
            PlanStep::Release { .. } => None,
        })
    }
}

fn plan_hash(mission_id: &str, steps: &[PlanStep]) -> Result<String> {
    let bytes = serde_json::to_vec(&(mission_id, steps))
        .map_err(|e| EngineError::Serialization(e.to_string()))?;
    Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
}

/// Planner result: a plan, or a reportable reason why none exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// A plan awaiting confirmation
    Plan(ReassignmentPlan),
    /// Nothing can be proposed; must be surfaced to the operator
    NoPlanAvailable {
        /// Target mission
        mission_id: String,
        /// Why
        reason: String,
    },
}

impl PlanOutcome {
    /// The plan, if any
    pub fn plan(&self) -> Option<&ReassignmentPlan> {
        match self {
            PlanOutcome::Plan(plan) => Some(plan),
            PlanOutcome::NoPlanAvailable { .. } => None,
        }
    }

    /// Target mission id
    pub fn mission_id(&self) -> &str {
        match self {
            PlanOutcome::Plan(plan) => &plan.mission_id,
            PlanOutcome::NoPlanAvailable { mission_id, .. } => mission_id,
        }
    }
}

/// Planner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerOptions {
    /// Ranked backups kept per slot
    pub max_alternatives: usize,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self { max_alternatives: 5 }
    }
}

impl From<&dronops_core::PlannerConfig> for PlannerOptions {
    fn from(config: &dronops_core::PlannerConfig) -> Self {
        Self {
            max_alternatives: config.max_alternatives,
        }
    }
}

/// Status a resource must hold to be pulled from a donor mission
trait Releasable: Candidate {
    fn is_releasable(&self, as_of: NaiveDate) -> bool;
}

impl Releasable for Pilot {
    // After release the pilot must come back as Available.
    fn is_releasable(&self, as_of: NaiveDate) -> bool {
        matches!(self.status, PilotStatus::Assigned | PilotStatus::Available)
            && self.available_from <= as_of
    }
}

impl Releasable for Drone {
    fn is_releasable(&self, _as_of: NaiveDate) -> bool {
        matches!(self.status, DroneStatus::InUse | DroneStatus::Available)
    }
}

fn current_assignment_of(view: &RosterView<'_>, resource: &ResourceRef) -> Option<String> {
    match resource {
        ResourceRef::Pilot(id) => view.snapshot.pilot(id)?.current_assignment.clone(),
        ResourceRef::Drone(id) => view.snapshot.drone(id)?.current_assignment.clone(),
    }
}

/// Candidates on lower priority missions that would qualify once released,
/// ranked best first.
fn ranked_donors<C: Releasable>(
    view: &RosterView<'_>,
    target: &Mission,
    pool: &[C],
    claimed: &BTreeSet<ResourceRef>,
) -> Vec<RankedCandidate> {
    let mut ranked = Vec::new();

    for candidate in pool {
        let resource = candidate.resource_ref();
        if claimed.contains(&resource)
            || !candidate.is_releasable(view.snapshot.as_of)
            || check_qualified(candidate, target).is_err()
        {
            continue;
        }

        let mut blocking: BTreeSet<String> = view
            .assignments
            .for_resource(&resource)
            .filter(|a| a.mission_id != target.id && a.range.overlaps(&target.range()))
            .map(|a| a.mission_id.clone())
            .collect();
        if let Some(current) = current_assignment_of(view, &resource) {
            if current != target.id {
                blocking.insert(current);
            }
        }

        // More than one blocking mission is a double booking, not a donor.
        let mut blocking = blocking.into_iter();
        let (Some(donor_id), None) = (blocking.next(), blocking.next()) else {
            continue;
        };
        let Some(donor) = view.snapshot.mission(&donor_id) else { continue };
        if donor.priority >= target.priority {
            continue;
        }

        ranked.push(RankedCandidate {
            resource,
            donor: Some(Donor {
                mission_id: donor.id.clone(),
                priority: donor.priority,
                start_date: donor.start_date,
                priority_gap: target.priority.rank() - donor.priority.rank(),
            }),
        });
    }

    ranked.sort_by(|a, b| {
        let (Some(da), Some(db)) = (&a.donor, &b.donor) else {
            return a.resource.cmp(&b.resource);
        };
        db.priority_gap
            .cmp(&da.priority_gap)
            .then_with(|| db.start_date.cmp(&da.start_date))
            .then_with(|| a.resource.id().cmp(b.resource.id()))
    });
    ranked
}

fn direct_candidates<C: Candidate>(
    view: &RosterView<'_>,
    target: &Mission,
    pool: &[C],
    claimed: &BTreeSet<ResourceRef>,
) -> Vec<RankedCandidate> {
    find_eligible(target, pool, &view.assignments)
        .into_iter()
        .map(|c| c.resource_ref())
        .filter(|r| !claimed.contains(r))
        .map(|resource| RankedCandidate { resource, donor: None })
        .collect()
}

fn slot_candidates(
    view: &RosterView<'_>,
    target: &Mission,
    kind: ResourceKind,
    claimed: &BTreeSet<ResourceRef>,
) -> Vec<RankedCandidate> {
    let direct = match kind {
        ResourceKind::Pilot => direct_candidates(view, target, &view.snapshot.pilots, claimed),
        ResourceKind::Drone => direct_candidates(view, target, &view.snapshot.drones, claimed),
    };
    if !direct.is_empty() {
        return direct;
    }
    match kind {
        ResourceKind::Pilot => ranked_donors(view, target, &view.snapshot.pilots, claimed),
        ResourceKind::Drone => ranked_donors(view, target, &view.snapshot.drones, claimed),
    }
}

/// Plan staffing for one mission, skipping resources already claimed by
/// earlier plans of the same batch.
pub fn plan_for_mission(
    view: &RosterView<'_>,
    target: &Mission,
    claimed: &BTreeSet<ResourceRef>,
    options: PlannerOptions,
) -> Result<PlanOutcome> {
    let open: Vec<ResourceKind> = [ResourceKind::Pilot, ResourceKind::Drone]
        .into_iter()
        .filter(|kind| target.assigned(*kind).is_none())
        .collect();
    if open.is_empty() {
        return Ok(PlanOutcome::NoPlanAvailable {
            mission_id: target.id.clone(),
            reason: "mission is already fully staffed".to_string(),
        });
    }

    let mut steps = Vec::new();
    let mut impacts = Vec::new();
    let mut alternatives = Vec::new();
    let mut kind = PlanKind::Direct;

    for slot in open {
        let mut ranked = slot_candidates(view, target, slot, claimed).into_iter();
        let Some(choice) = ranked.next() else {
            debug!(mission_id = %target.id, slot = %slot, "No candidate at any priority level");
            return Ok(PlanOutcome::NoPlanAvailable {
                mission_id: target.id.clone(),
                reason: format!("no eligible {slot} at any priority level"),
            });
        };
        alternatives.extend(ranked.take(options.max_alternatives));

        if let Some(donor) = &choice.donor {
            kind = PlanKind::Reassignment;
            steps.push(PlanStep::Release {
                resource: choice.resource.clone(),
                mission_id: donor.mission_id.clone(),
            });
            impacts.push(ImpactNote {
                mission_id: donor.mission_id.clone(),
                resource: choice.resource.clone(),
                note: format!(
                    "{} mission {} is now unstaffed: {} moves to {}",
                    donor.priority, donor.mission_id, choice.resource, target.id
                ),
            });
        }
        steps.push(PlanStep::Assign {
            resource: choice.resource,
            mission_id: target.id.clone(),
        });
    }

    let plan_hash = plan_hash(&target.id, &steps)?;
    info!(
        mission_id = %target.id,
        kind = ?kind,
        steps = steps.len(),
        plan_hash = %plan_hash,
        "Reassignment plan proposed"
    );
    Ok(PlanOutcome::Plan(ReassignmentPlan {
        mission_id: target.id.clone(),
        kind,
        steps,
        impacts,
        alternatives,
        plan_hash,
    }))
}

/// Plan staffing for one mission of the snapshot
pub fn plan_urgent_reassignment(
    view: &RosterView<'_>,
    mission_id: &str,
    options: PlannerOptions,
) -> Result<PlanOutcome> {
    let target = view.mission(mission_id)?;
    plan_for_mission(view, target, &BTreeSet::new(), options)
}

/// Plan every Urgent mission with an open slot.
///
/// Missions are processed by priority (desc), then start date (asc), then id,
/// so the sooner mission wins a contested candidate. A resource chosen by
/// one plan is never offered to a later plan of the batch.
pub fn plan_urgent_batch(view: &RosterView<'_>, options: PlannerOptions) -> Result<Vec<PlanOutcome>> {
    let mut targets: Vec<&Mission> = view
        .snapshot
        .missions
        .iter()
        .filter(|m| m.priority == Priority::Urgent)
        .filter(|m| m.assigned_pilot.is_none() || m.assigned_drone.is_none())
        .collect();
    targets.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.start_date.cmp(&b.start_date))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut claimed = BTreeSet::new();
    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = plan_for_mission(view, target, &claimed, options)?;
        if let Some(plan) = outcome.plan() {
            claimed.extend(plan.claimed().cloned());
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
