//! Eligibility matching of pilots and drones against mission requirements
//!
//! A candidate is eligible for a mission when every hard requirement holds:
//! - status is Available
//! - required skills and certifications (pilots) or capabilities (drones)
//!   are a subset of what the candidate holds
//! - candidate location equals the mission location (exact, case-sensitive)
//! - the candidate is free on the start date (pilots: `available_from`;
//!   drones: no maintenance window over the mission)
//! - no other booking of the candidate overlaps the mission's date range
//!
//! Matching never fails: an empty result is a normal outcome.

#![warn(missing_docs)]

use crate::view::RosterView;
use dronops_domain::{
    AssignmentSet, Drone, DroneStatus, Mission, Pilot, PilotStatus, ResourceKind, ResourceRef,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Why a candidate does not qualify for a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Ineligibility {
    /// Status is not Available
    NotAvailable {
        /// Current status as text
        status: String,
    },
    /// Missing skills, certifications or capabilities
    MissingRequirements {
        /// Requirement names not held
        missing: Vec<String>,
    },
    /// Location differs from the mission's
    LocationMismatch {
        /// Candidate location
        candidate: String,
        /// Mission location
        mission: String,
    },
    /// Pilot becomes available only after the mission starts
    NotYetAvailable {
        /// First available day
        available_from: String,
    },
    /// Drone maintenance window overlaps the mission
    MaintenanceOverlap {
        /// The window
        window: String,
    },
    /// Already booked on an overlapping mission
    ScheduleOverlap {
        /// The overlapping mission
        mission_id: String,
    },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::NotAvailable { status } => write!(f, "status is {status}"),
            Ineligibility::MissingRequirements { missing } => {
                write!(f, "missing {}", missing.join(", "))
            }
            Ineligibility::LocationMismatch { candidate, mission } => {
                write!(f, "located in {candidate}, mission is in {mission}")
            }
            Ineligibility::NotYetAvailable { available_from } => {
                write!(f, "not available until {available_from}")
            }
            Ineligibility::MaintenanceOverlap { window } => {
                write!(f, "maintenance window {window} overlaps the mission")
            }
            Ineligibility::ScheduleOverlap { mission_id } => {
                write!(f, "already booked on overlapping mission {mission_id}")
            }
        }
    }
}

/// A pilot or drone that can be matched against a mission
pub trait Candidate {
    /// Pilot or drone
    const KIND: ResourceKind;

    /// Record id
    fn id(&self) -> &str;

    /// Location compared against the mission's
    fn location(&self) -> &str;

    /// Whether the status is Available
    fn is_available(&self) -> bool;

    /// Status as text, for diagnostics
    fn status_label(&self) -> String;

    /// Mission requirements this candidate does not hold, in name order
    fn missing_requirements(&self, mission: &Mission) -> Vec<String>;

    /// Held items beyond the mission's minimum; more is ranked first
    fn extra_matches(&self, mission: &Mission) -> usize;

    /// Date-based availability other than bookings
    fn check_calendar(&self, mission: &Mission) -> Result<(), Ineligibility>;

    /// Typed reference
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(Self::KIND, self.id())
    }
}

fn missing_from(required: &BTreeSet<String>, held: &BTreeSet<String>) -> Vec<String> {
    required.difference(held).cloned().collect()
}

impl Candidate for Pilot {
    const KIND: ResourceKind = ResourceKind::Pilot;

    fn id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn is_available(&self) -> bool {
        self.status == PilotStatus::Available
    }

    fn status_label(&self) -> String {
        format!("{:?}", self.status)
    }

    fn missing_requirements(&self, mission: &Mission) -> Vec<String> {
        let mut missing = missing_from(&mission.required_skills, &self.skills);
        missing.extend(missing_from(
            &mission.required_certifications,
            &self.certifications,
        ));
        missing
    }

    fn extra_matches(&self, mission: &Mission) -> usize {
        self.skills.difference(&mission.required_skills).count()
    }

    fn check_calendar(&self, mission: &Mission) -> Result<(), Ineligibility> {
        if self.available_from > mission.start_date {
            return Err(Ineligibility::NotYetAvailable {
                available_from: self.available_from.to_string(),
            });
        }
        Ok(())
    }
}

impl Candidate for Drone {
    const KIND: ResourceKind = ResourceKind::Drone;

    fn id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn is_available(&self) -> bool {
        self.status == DroneStatus::Available
    }

    fn status_label(&self) -> String {
        format!("{:?}", self.status)
    }

    fn missing_requirements(&self, mission: &Mission) -> Vec<String> {
        missing_from(&mission.required_capabilities, &self.capabilities)
    }

    fn extra_matches(&self, mission: &Mission) -> usize {
        self.capabilities
            .difference(&mission.required_capabilities)
            .count()
    }

    fn check_calendar(&self, mission: &Mission) -> Result<(), Ineligibility> {
        match &self.maintenance_window {
            Some(window) if window.overlaps(&mission.range()) => {
                Err(Ineligibility::MaintenanceOverlap {
                    window: window.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Every requirement except status and bookings: what a candidate would need
/// to take the mission once freed from its current work.
pub fn check_qualified<C: Candidate>(candidate: &C, mission: &Mission) -> Result<(), Ineligibility> {
    let missing = candidate.missing_requirements(mission);
    if !missing.is_empty() {
        return Err(Ineligibility::MissingRequirements { missing });
    }
    if candidate.location() != mission.location {
        return Err(Ineligibility::LocationMismatch {
            candidate: candidate.location().to_string(),
            mission: mission.location.clone(),
        });
    }
    candidate.check_calendar(mission)
}

/// Full eligibility check of one candidate.
///
/// Returns the first failing requirement; checks run in a fixed order so the
/// reported reason is deterministic.
pub fn check_eligible<C: Candidate>(
    candidate: &C,
    mission: &Mission,
    assignments: &AssignmentSet,
) -> Result<(), Ineligibility> {
    if !candidate.is_available() {
        return Err(Ineligibility::NotAvailable {
            status: candidate.status_label(),
        });
    }
    check_qualified(candidate, mission)?;

    let resource = candidate.resource_ref();
    if let Some(clash) = assignments
        .for_resource(&resource)
        .find(|a| a.mission_id != mission.id && a.range.overlaps(&mission.range()))
    {
        return Err(Ineligibility::ScheduleOverlap {
            mission_id: clash.mission_id.clone(),
        });
    }
    Ok(())
}

/// Eligible candidates from a homogeneous pool.
///
/// Ordered by extra matches beyond the minimum (descending), then id
/// (ascending).
pub fn find_eligible<'p, C: Candidate>(
    mission: &Mission,
    pool: &'p [C],
    assignments: &AssignmentSet,
) -> Vec<&'p C> {
    let mut eligible: Vec<&C> = pool
        .iter()
        .filter(|c| check_eligible(*c, mission, assignments).is_ok())
        .collect();
    eligible.sort_by(|a, b| {
        b.extra_matches(mission)
            .cmp(&a.extra_matches(mission))
            .then_with(|| a.id().cmp(b.id()))
    });
    eligible
}

/// Serializable eligibility result entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleCandidate {
    /// The candidate
    pub resource: ResourceRef,
    /// Held items beyond the mission's minimum
    pub extra_matches: usize,
}

/// Eligible pilots or drones for a mission of the view
pub fn eligible_for(view: &RosterView<'_>, mission: &Mission, kind: ResourceKind) -> Vec<EligibleCandidate> {
    fn entries<C: Candidate>(mission: &Mission, pool: &[C], view: &RosterView<'_>) -> Vec<EligibleCandidate> {
        find_eligible(mission, pool, &view.assignments)
            .into_iter()
            .map(|c| EligibleCandidate {
                resource: c.resource_ref(),
                extra_matches: c.extra_matches(mission),
            })
            .collect()
    }

    let result = match kind {
        ResourceKind::Pilot => entries(mission, &view.snapshot.pilots, view),
        ResourceKind::Drone => entries(mission, &view.snapshot.drones, view),
    };
    tracing::debug!(
        mission_id = %mission.id,
        kind = %kind,
        eligible = result.len(),
        "Eligibility computed"
    );
    result
}
