//! Snapshot store collaborators
//!
//! The engine reads a full snapshot through [`SnapshotSource`] on every
//! request and hands assignment deltas to an [`AssignmentSink`]. It never
//! caches a snapshot between calls.

#![warn(missing_docs)]

use crate::coordinator::{AssignmentDelta, ChangeAction, PriorState, ResourceStatus};
use dronops_domain::{ResourceRef, Snapshot};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON of the expected shape
    #[error("Snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A delta names a record the store does not hold
    #[error("Unknown record: {0}")]
    UnknownRecord(String),

    /// A delta carries a status for the other kind of resource
    #[error("Status {status:?} does not apply to {resource}")]
    StatusKindMismatch {
        /// Target resource
        resource: ResourceRef,
        /// Offending status
        status: ResourceStatus,
    },

    /// The store moved since the delta was computed
    #[error("Stale delta for {resource} on mission {mission_id}: {reason}")]
    Stale {
        /// Target resource
        resource: ResourceRef,
        /// Target mission
        mission_id: String,
        /// First field that no longer matches
        reason: String,
    },

    /// Store lock poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Supplies the current roster snapshot
pub trait SnapshotSource {
    /// Read the full, current snapshot
    fn fetch(&self) -> Result<Snapshot, StoreError>;
}

/// Accepts committed assignment deltas
pub trait AssignmentSink {
    /// Persist deltas in order, all or nothing.
    ///
    /// Fails with [`StoreError::Stale`] when the stored records no longer
    /// match a delta's prior state.
    fn persist(&self, deltas: &[AssignmentDelta]) -> Result<(), StoreError>;
}

/// Current slot holder, booking and status of a resource for one mission
pub fn prior_state(snapshot: &Snapshot, resource: &ResourceRef, mission_id: &str) -> Result<PriorState, StoreError> {
    let mission = snapshot
        .mission(mission_id)
        .ok_or_else(|| StoreError::UnknownRecord(format!("mission {mission_id}")))?;
    let unknown = || StoreError::UnknownRecord(resource.to_string());
    let (current_assignment, status) = match resource {
        ResourceRef::Pilot(id) => {
            let pilot = snapshot.pilot(id).ok_or_else(unknown)?;
            (pilot.current_assignment.clone(), ResourceStatus::Pilot(pilot.status))
        }
        ResourceRef::Drone(id) => {
            let drone = snapshot.drone(id).ok_or_else(unknown)?;
            (drone.current_assignment.clone(), ResourceStatus::Drone(drone.status))
        }
    };
    Ok(PriorState {
        slot_holder: mission.assigned(resource.kind()).map(str::to_string),
        current_assignment,
        status,
    })
}

fn check_prior(snapshot: &Snapshot, delta: &AssignmentDelta) -> Result<(), StoreError> {
    let now = prior_state(snapshot, &delta.resource, &delta.mission_id)?;
    let expected = &delta.prior;
    let shown = |v: &Option<String>| v.clone().unwrap_or_else(|| "nothing".to_string());

    let reason = if now.slot_holder != expected.slot_holder {
        format!(
            "{} slot holds {}, expected {}",
            delta.resource.kind(),
            shown(&now.slot_holder),
            shown(&expected.slot_holder)
        )
    } else if now.current_assignment != expected.current_assignment {
        format!(
            "booked on {}, expected {}",
            shown(&now.current_assignment),
            shown(&expected.current_assignment)
        )
    } else if now.status != expected.status {
        format!("status is {:?}, expected {:?}", now.status, expected.status)
    } else {
        return Ok(());
    };
    Err(StoreError::Stale {
        resource: delta.resource.clone(),
        mission_id: delta.mission_id.clone(),
        reason,
    })
}

/// Apply one delta to a snapshot in place.
///
/// The snapshot must still match the delta's prior state, otherwise nothing
/// changes and [`StoreError::Stale`] is returned. Assign books the resource on
/// the mission from both sides. Release clears whichever side still points at
/// the pair. Either way the resource takes the delta's status.
pub fn apply_delta(snapshot: &mut Snapshot, delta: &AssignmentDelta) -> Result<(), StoreError> {
    check_prior(snapshot, delta)?;
    let mission = snapshot
        .mission_mut(&delta.mission_id)
        .ok_or_else(|| StoreError::UnknownRecord(format!("mission {}", delta.mission_id)))?;
    let resource_id = delta.resource.id().to_string();
    let slot = match delta.resource {
        ResourceRef::Pilot(_) => &mut mission.assigned_pilot,
        ResourceRef::Drone(_) => &mut mission.assigned_drone,
    };
    match delta.action {
        ChangeAction::Assign => *slot = Some(resource_id.clone()),
        ChangeAction::Release => {
            if slot.as_deref() == Some(resource_id.as_str()) {
                *slot = None;
            }
        }
    }

    let unknown = || StoreError::UnknownRecord(delta.resource.to_string());
    let mismatch = || StoreError::StatusKindMismatch {
        resource: delta.resource.clone(),
        status: delta.new_status,
    };
    match (&delta.resource, delta.new_status) {
        (ResourceRef::Pilot(id), ResourceStatus::Pilot(status)) => {
            let pilot = snapshot.pilot_mut(id).ok_or_else(unknown)?;
            pilot.status = status;
            update_current(&mut pilot.current_assignment, delta);
        }
        (ResourceRef::Drone(id), ResourceStatus::Drone(status)) => {
            let drone = snapshot.drone_mut(id).ok_or_else(unknown)?;
            drone.status = status;
            update_current(&mut drone.current_assignment, delta);
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

fn update_current(current: &mut Option<String>, delta: &AssignmentDelta) {
    match delta.action {
        ChangeAction::Assign => *current = Some(delta.mission_id.clone()),
        ChangeAction::Release => {
            if current.as_deref() == Some(delta.mission_id.as_str()) {
                *current = None;
            }
        }
    }
}

/// Snapshot held in memory; also acts as the persistence side for deltas
#[derive(Debug)]
pub struct InMemoryStore {
    inner: RwLock<Snapshot>,
}

impl InMemoryStore {
    /// Wrap a snapshot
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    /// Replace records wholesale, as an external edit would
    pub fn update<F: FnOnce(&mut Snapshot)>(&self, edit: F) -> Result<(), StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        edit(&mut *guard);
        Ok(())
    }
}

impl SnapshotSource for InMemoryStore {
    fn fetch(&self) -> Result<Snapshot, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }
}

impl AssignmentSink for InMemoryStore {
    fn persist(&self, deltas: &[AssignmentDelta]) -> Result<(), StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        // Stage on a copy so a bad delta leaves the store untouched.
        let mut staged = guard.clone();
        for delta in deltas {
            apply_delta(&mut staged, delta)?;
        }
        *guard = staged;
        info!(deltas = deltas.len(), "Deltas persisted to in-memory store");
        Ok(())
    }
}

/// Snapshot stored as a JSON file, re-read on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonFileStore {
    fn fetch(&self) -> Result<Snapshot, StoreError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        debug!(
            path = %self.path.display(),
            pilots = snapshot.pilots.len(),
            drones = snapshot.drones.len(),
            missions = snapshot.missions.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }
}

impl AssignmentSink for JsonFileStore {
    fn persist(&self, deltas: &[AssignmentDelta]) -> Result<(), StoreError> {
        let mut snapshot = self.fetch()?;
        for delta in deltas {
            apply_delta(&mut snapshot, delta)?;
        }
        let encoded = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.path, encoded)?;
        info!(path = %self.path.display(), deltas = deltas.len(), "Deltas persisted to snapshot file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dronops_domain::fixtures::{day, drone, mission, pilot, staff_pilot};
    use dronops_domain::{DroneStatus, PilotStatus};

    /// Delta computed against the current state of `snap`
    fn delta(
        snap: &Snapshot,
        resource: ResourceRef,
        mission_id: &str,
        action: ChangeAction,
        status: ResourceStatus,
    ) -> AssignmentDelta {
        let prior = prior_state(snap, &resource, mission_id).unwrap_or(PriorState {
            slot_holder: None,
            current_assignment: None,
            status,
        });
        AssignmentDelta {
            resource,
            mission_id: mission_id.to_string(),
            action,
            new_status: status,
            prior,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap(),
        }
    }

    fn snapshot() -> Snapshot {
        let mut snap = Snapshot::new(day(2026, 1, 10));
        let mut p = pilot("P001", "Pune");
        let mut m = mission("PRJ001", "Pune");
        staff_pilot(&mut p, &mut m);
        snap.pilots.push(p);
        snap.drones.push(drone("D001", "Pune"));
        snap.drones.push(drone("D002", "Pune"));
        snap.missions.push(m);
        snap.missions.push(mission("PRJ002", "Pune"));
        snap
    }

    fn drone_ref(id: &str) -> ResourceRef {
        ResourceRef::Drone(id.to_string())
    }

    #[test]
    fn test_release_then_assign() {
        let mut snap = snapshot();
        let pilot_ref = ResourceRef::Pilot("P001".to_string());
        let release = delta(
            &snap,
            pilot_ref.clone(),
            "PRJ001",
            ChangeAction::Release,
            ResourceStatus::Pilot(PilotStatus::Available),
        );
        apply_delta(&mut snap, &release).unwrap();
        assert_eq!(snap.mission("PRJ001").unwrap().assigned_pilot, None);
        assert_eq!(snap.pilot("P001").unwrap().current_assignment, None);

        let assign = delta(
            &snap,
            pilot_ref,
            "PRJ002",
            ChangeAction::Assign,
            ResourceStatus::Pilot(PilotStatus::Assigned),
        );
        apply_delta(&mut snap, &assign).unwrap();
        let p = snap.pilot("P001").unwrap();
        assert_eq!(p.status, PilotStatus::Assigned);
        assert_eq!(p.current_assignment.as_deref(), Some("PRJ002"));
        assert_eq!(snap.mission("PRJ002").unwrap().assigned_pilot.as_deref(), Some("P001"));
    }

    #[test]
    fn test_status_kind_mismatch_rejected() {
        let mut snap = snapshot();
        let mut bad = delta(
            &snap,
            drone_ref("D001"),
            "PRJ002",
            ChangeAction::Assign,
            ResourceStatus::Drone(DroneStatus::InUse),
        );
        bad.new_status = ResourceStatus::Pilot(PilotStatus::Assigned);
        let result = apply_delta(&mut snap, &bad);
        assert!(matches!(result, Err(StoreError::StatusKindMismatch { .. })));
    }

    #[test]
    fn test_filled_slot_is_not_overwritten() {
        let mut snap = snapshot();
        let first = delta(&snap, drone_ref("D001"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse));
        let second = delta(&snap, drone_ref("D002"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse));
        apply_delta(&mut snap, &first).unwrap();
        let before = snap.clone();

        let err = apply_delta(&mut snap, &second).unwrap_err();
        assert!(matches!(err, StoreError::Stale { ref reason, .. } if reason.contains("D001")), "{err}");
        assert_eq!(snap, before);
    }

    #[test]
    fn test_changed_status_is_stale() {
        let mut snap = snapshot();
        let assign = delta(&snap, drone_ref("D001"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse));
        if let Some(d) = snap.drone_mut("D001") {
            d.status = DroneStatus::Maintenance;
        }
        assert!(matches!(apply_delta(&mut snap, &assign), Err(StoreError::Stale { .. })));
    }

    #[test]
    fn test_in_memory_persist_is_all_or_nothing() {
        let store = InMemoryStore::new(snapshot());
        let before = store.fetch().unwrap();
        let deltas = vec![
            delta(&before, drone_ref("D001"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse)),
            delta(&before, drone_ref("D404"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse)),
        ];

        assert!(matches!(store.persist(&deltas), Err(StoreError::UnknownRecord(_))));
        assert_eq!(store.fetch().unwrap(), before);
    }

    #[test]
    fn test_in_memory_second_writer_fails_closed() {
        let store = InMemoryStore::new(snapshot());
        let base = store.fetch().unwrap();
        let first = delta(&base, drone_ref("D001"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse));
        let second = delta(&base, drone_ref("D002"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse));

        store.persist(&[first]).unwrap();
        let after_first = store.fetch().unwrap();
        assert!(matches!(store.persist(&[second]), Err(StoreError::Stale { .. })));
        assert_eq!(store.fetch().unwrap(), after_first);
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let snap = snapshot();
        std::fs::write(&path, serde_json::to_string(&snap).unwrap()).unwrap();

        let store = JsonFileStore::new(&path);
        store
            .persist(&[delta(
                &snap,
                drone_ref("D001"),
                "PRJ001",
                ChangeAction::Assign,
                ResourceStatus::Drone(DroneStatus::InUse),
            )])
            .unwrap();

        let reloaded = store.fetch().unwrap();
        assert_eq!(reloaded.mission("PRJ001").unwrap().assigned_drone.as_deref(), Some("D001"));
        assert_eq!(reloaded.drone("D001").unwrap().status, DroneStatus::InUse);
    }

    #[test]
    fn test_json_file_store_stale_delta_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let snap = snapshot();
        std::fs::write(&path, serde_json::to_string(&snap).unwrap()).unwrap();
        let store = JsonFileStore::new(&path);

        let first = delta(&snap, drone_ref("D001"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse));
        let second = delta(&snap, drone_ref("D002"), "PRJ002", ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse));
        store.persist(&[first]).unwrap();
        let bytes = std::fs::read(&path).unwrap();

        assert!(matches!(store.persist(&[second]), Err(StoreError::Stale { .. })));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_json_file_store_missing_file() {
        let store = JsonFileStore::new("/no/such/snapshot.json");
        assert!(matches!(store.fetch(), Err(StoreError::Io(_))));
    }
}
