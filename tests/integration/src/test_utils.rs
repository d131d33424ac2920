//! Roster builders shared by the scenario tests

use chrono::NaiveDate;
use dronops_assignment::{Coordinator, InMemoryStore, JsonFileStore, PlanOutcome, ReassignmentPlan};
use dronops_domain::fixtures::{day, drone, mission, pilot, set, staff_drone, staff_pilot};
use dronops_domain::{Mission, Pilot, Priority, Snapshot};

/// Planning date used by every scenario
pub fn as_of() -> NaiveDate {
    day(2026, 1, 10)
}

/// Incrementally built roster
#[derive(Debug, Clone)]
pub struct RosterBuilder {
    snapshot: Snapshot,
}

impl Default for RosterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterBuilder {
    /// Empty roster as of [`as_of`]
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::new(as_of()),
        }
    }

    /// Available pilot with the given skills
    pub fn pilot(mut self, id: &str, location: &str, skills: &[&str]) -> Self {
        let mut p = pilot(id, location);
        p.skills = set(skills);
        self.snapshot.pilots.push(p);
        self
    }

    /// Available drone with the given capabilities
    pub fn drone(mut self, id: &str, location: &str, capabilities: &[&str]) -> Self {
        let mut d = drone(id, location);
        d.capabilities = set(capabilities);
        self.snapshot.drones.push(d);
        self
    }

    /// Mission over an inclusive date range
    pub fn mission(mut self, id: &str, location: &str, priority: Priority, start: NaiveDate, end: NaiveDate) -> Self {
        let mut m = mission(id, location);
        m.priority = priority;
        m.start_date = start;
        m.end_date = end;
        self.snapshot.missions.push(m);
        self
    }

    /// Edit the last mission added
    pub fn requiring(mut self, edit: impl FnOnce(&mut Mission)) -> Self {
        if let Some(m) = self.snapshot.missions.last_mut() {
            edit(m);
        }
        self
    }

    /// Edit a pilot in place
    pub fn with_pilot(mut self, id: &str, edit: impl FnOnce(&mut Pilot)) -> Self {
        if let Some(p) = self.snapshot.pilot_mut(id) {
            edit(p);
        }
        self
    }

    /// Book a pilot on a mission from both sides
    pub fn staff_pilot(mut self, pilot_id: &str, mission_id: &str) -> Self {
        let snap = &mut self.snapshot;
        let (Some(pi), Some(mi)) = (
            snap.pilots.iter().position(|p| p.id == pilot_id),
            snap.missions.iter().position(|m| m.id == mission_id),
        ) else {
            return self;
        };
        staff_pilot(&mut snap.pilots[pi], &mut snap.missions[mi]);
        self
    }

    /// Book a drone on a mission from both sides
    pub fn staff_drone(mut self, drone_id: &str, mission_id: &str) -> Self {
        let snap = &mut self.snapshot;
        let (Some(di), Some(mi)) = (
            snap.drones.iter().position(|d| d.id == drone_id),
            snap.missions.iter().position(|m| m.id == mission_id),
        ) else {
            return self;
        };
        staff_drone(&mut snap.drones[di], &mut snap.missions[mi]);
        self
    }

    /// Finished snapshot
    pub fn build(self) -> Snapshot {
        self.snapshot
    }

    /// Coordinator over an in-memory copy of the roster
    pub fn coordinator(self) -> Coordinator<InMemoryStore> {
        Coordinator::new(InMemoryStore::new(self.snapshot))
    }
}

/// Write a snapshot to a temp file and open it as a store
pub fn json_store(snapshot: &Snapshot) -> (tempfile::TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("snapshot.json");
    let json = serde_json::to_string_pretty(snapshot).expect("snapshot serializes");
    std::fs::write(&path, json).expect("snapshot written");
    (dir, JsonFileStore::new(path))
}

/// Unwrap a proposal, failing the test on `NoPlanAvailable`
pub fn expect_plan(outcome: PlanOutcome) -> ReassignmentPlan {
    match outcome {
        PlanOutcome::Plan(plan) => plan,
        PlanOutcome::NoPlanAvailable { mission_id, reason } => {
            panic!("expected a plan for {mission_id}, got none: {reason}")
        }
    }
}
