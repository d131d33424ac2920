//! The derived assignment relation.
//!
//! Assignments are not stored anywhere. They are rebuilt on every call from
//! the foreign keys on both sides: `Pilot/Drone.current_assignment` and
//! `Mission.assigned_pilot/assigned_drone`. Either side alone is enough to
//! establish a pair.

use crate::entities::{ResourceKind, ResourceRef};
use crate::error::{DomainError, EntityKind, Result};
use crate::schedule::DateRange;
use crate::snapshot::Validated;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One resource booked on one mission for the mission's date range
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    /// Pilot or drone
    pub resource: ResourceRef,
    /// Mission id
    pub mission_id: String,
    /// Mission date range
    pub range: DateRange,
}

/// All assignments of a validated snapshot, ordered by resource then mission id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSet {
    items: Vec<Assignment>,
}

impl AssignmentSet {
    /// Rebuild the relation from a validated snapshot.
    ///
    /// A reference to an id that was never in the snapshot is a caller
    /// contract violation and fails with [`DomainError::DanglingReference`].
    /// References to records dropped by validation are skipped.
    pub fn derive(validated: &Validated) -> Result<Self> {
        let snap = &validated.snapshot;
        let mut pairs: BTreeSet<(ResourceRef, String)> = BTreeSet::new();

        let resource_side = snap
            .pilots
            .iter()
            .map(|p| (ResourceRef::Pilot(p.id.clone()), EntityKind::Pilot, &p.current_assignment))
            .chain(snap.drones.iter().map(|d| {
                (ResourceRef::Drone(d.id.clone()), EntityKind::Drone, &d.current_assignment)
            }));

        for (resource, entity, current) in resource_side {
            let Some(mission_id) = current else { continue };
            if snap.mission(mission_id).is_some() {
                pairs.insert((resource, mission_id.clone()));
            } else if !validated.is_rejected(EntityKind::Mission, mission_id) {
                return Err(DomainError::DanglingReference {
                    entity,
                    id: resource.id().to_string(),
                    field: "current_assignment".to_string(),
                    missing: mission_id.clone(),
                });
            }
        }

        for mission in &snap.missions {
            for kind in [ResourceKind::Pilot, ResourceKind::Drone] {
                let Some(resource_id) = mission.assigned(kind) else { continue };
                let entity = match kind {
                    ResourceKind::Pilot => EntityKind::Pilot,
                    ResourceKind::Drone => EntityKind::Drone,
                };
                if snap.has_resource(kind, resource_id) {
                    pairs.insert((ResourceRef::new(kind, resource_id), mission.id.clone()));
                } else if !validated.is_rejected(entity, resource_id) {
                    return Err(DomainError::DanglingReference {
                        entity: EntityKind::Mission,
                        id: mission.id.clone(),
                        field: format!("assigned_{kind}"),
                        missing: resource_id.to_string(),
                    });
                }
            }
        }

        let mut items = Vec::with_capacity(pairs.len());
        for (resource, mission_id) in pairs {
            // Both sides were resolved above.
            if let Some(mission) = snap.mission(&mission_id) {
                items.push(Assignment {
                    resource,
                    range: mission.range(),
                    mission_id,
                });
            }
        }
        Ok(Self { items })
    }

    /// Every assignment
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.items.iter()
    }

    /// Assignments held by one resource
    pub fn for_resource<'a>(&'a self, resource: &'a ResourceRef) -> impl Iterator<Item = &'a Assignment> {
        self.items.iter().filter(move |a| &a.resource == resource)
    }

    /// Resources booked on one mission
    pub fn for_mission<'a>(&'a self, mission_id: &'a str) -> impl Iterator<Item = &'a Assignment> {
        self.items.iter().filter(move |a| a.mission_id == mission_id)
    }

    /// Whether `resource` holds any mission other than `except_mission`
    /// overlapping `range`
    pub fn has_overlap(&self, resource: &ResourceRef, range: &DateRange, except_mission: &str) -> bool {
        self.for_resource(resource)
            .any(|a| a.mission_id != except_mission && a.range.overlaps(range))
    }

    /// Number of assignments
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// No assignments at all
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
