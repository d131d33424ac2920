//! Point-in-time view of the roster.
//!
//! A [`Snapshot`] is everything the engine knows for one computation. It is
//! fetched fresh for every request and never cached or mutated by the engine.

use crate::entities::{Drone, Mission, Pilot, ResourceKind};
use crate::error::{EntityKind, ValidationIssue};
use crate::validation::{validate_drone, validate_mission, validate_pilot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Full set of pilot, drone and mission records as of one read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The day treated as "now" for this computation
    pub as_of: NaiveDate,
    /// Pilot roster
    #[serde(default)]
    pub pilots: Vec<Pilot>,
    /// Drone fleet
    #[serde(default)]
    pub drones: Vec<Drone>,
    /// Missions
    #[serde(default)]
    pub missions: Vec<Mission>,
}

impl Snapshot {
    /// Empty snapshot
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            pilots: Vec::new(),
            drones: Vec::new(),
            missions: Vec::new(),
        }
    }

    /// Look up a pilot by id
    pub fn pilot(&self, id: &str) -> Option<&Pilot> {
        self.pilots.iter().find(|p| p.id == id)
    }

    /// Look up a drone by id
    pub fn drone(&self, id: &str) -> Option<&Drone> {
        self.drones.iter().find(|d| d.id == id)
    }

    /// Look up a mission by id
    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// Mutable pilot lookup, for persistence collaborators applying deltas
    pub fn pilot_mut(&mut self, id: &str) -> Option<&mut Pilot> {
        self.pilots.iter_mut().find(|p| p.id == id)
    }

    /// Mutable drone lookup
    pub fn drone_mut(&mut self, id: &str) -> Option<&mut Drone> {
        self.drones.iter_mut().find(|d| d.id == id)
    }

    /// Mutable mission lookup
    pub fn mission_mut(&mut self, id: &str) -> Option<&mut Mission> {
        self.missions.iter_mut().find(|m| m.id == id)
    }

    /// Whether a pilot or drone with this id exists
    pub fn has_resource(&self, kind: ResourceKind, id: &str) -> bool {
        match kind {
            ResourceKind::Pilot => self.pilot(id).is_some(),
            ResourceKind::Drone => self.drone(id).is_some(),
        }
    }

    /// Re-validate every record, keeping only the usable ones.
    ///
    /// Records with duplicate ids keep their first occurrence.
    pub fn validated(&self) -> Validated {
        let mut issues = Vec::new();
        let mut rejected = BTreeSet::new();

        let pilots = keep_valid(
            &self.pilots,
            EntityKind::Pilot,
            |p| &p.id,
            validate_pilot,
            &mut issues,
            &mut rejected,
        );
        let drones = keep_valid(
            &self.drones,
            EntityKind::Drone,
            |d| &d.id,
            validate_drone,
            &mut issues,
            &mut rejected,
        );
        let missions = keep_valid(
            &self.missions,
            EntityKind::Mission,
            |m| &m.id,
            validate_mission,
            &mut issues,
            &mut rejected,
        );

        Validated {
            snapshot: Snapshot {
                as_of: self.as_of,
                pilots,
                drones,
                missions,
            },
            issues,
            rejected,
        }
    }
}

fn keep_valid<T: Clone>(
    records: &[T],
    entity: EntityKind,
    id_of: impl Fn(&T) -> &String,
    validate: impl Fn(&T) -> Vec<ValidationIssue>,
    issues: &mut Vec<ValidationIssue>,
    rejected: &mut BTreeSet<(EntityKind, String)>,
) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        let id = id_of(record);
        let found = validate(record);
        if !found.is_empty() {
            rejected.insert((entity, id.clone()));
            issues.extend(found);
            continue;
        }
        if !seen.insert(id.clone()) {
            issues.push(ValidationIssue::new(entity, id, "id", "duplicate id, later record ignored"));
            continue;
        }
        kept.push(record.clone());
    }
    kept
}

/// A snapshot with malformed records removed, plus the issues found
#[derive(Debug, Clone)]
pub struct Validated {
    /// The usable records
    pub snapshot: Snapshot,
    /// One entry per problem found
    pub issues: Vec<ValidationIssue>,
    rejected: BTreeSet<(EntityKind, String)>,
}

impl Validated {
    /// Whether a record with this id was dropped during validation.
    ///
    /// References to dropped records are skipped rather than treated as
    /// dangling.
    pub fn is_rejected(&self, entity: EntityKind, id: &str) -> bool {
        self.rejected.contains(&(entity, id.to_string()))
    }
}
