//! Two-phase commit scenarios against real stores
//!
//! Every commit re-validates against a freshly fetched snapshot, and the
//! store re-checks each delta's prior state when it persists. A failed
//! commit or persist must leave the store exactly as it was.

use crate::test_utils::{expect_plan, json_store, RosterBuilder};
use dronops_assignment::{
    AssignmentChange, ChangeAction, Coordinator, EngineError, JsonFileStore, Request, Response, ResourceStatus,
    SnapshotSource,
};
use dronops_domain::fixtures::day;
use dronops_domain::{DroneStatus, PilotStatus, Priority, ResourceRef};

fn urgent_roster() -> RosterBuilder {
    RosterBuilder::new()
        .pilot("P001", "Pune", &["Mapping"])
        .drone("D001", "Pune", &["RGB"])
        .drone("D002", "Pune", &["RGB"])
        .mission("PRJ-STD", "Pune", Priority::Standard, day(2026, 3, 1), day(2026, 3, 5))
        .staff_pilot("P001", "PRJ-STD")
        .mission("PRJ-U1", "Pune", Priority::Urgent, day(2026, 3, 2), day(2026, 3, 3))
        .requiring(|m| m.required_skills = ["Mapping".to_string()].into())
        .mission("PRJ-U2", "Pune", Priority::Urgent, day(2026, 4, 2), day(2026, 4, 3))
        .requiring(|m| m.required_skills = ["Mapping".to_string()].into())
}

#[test]
fn test_confirmed_plan_round_trips_through_snapshot_file() {
    let (_dir, store) = json_store(&urgent_roster().build());
    let coordinator = Coordinator::new(store);

    let plan = expect_plan(coordinator.plan_reassignment("PRJ-U1").unwrap());
    let result = coordinator.apply_plan(&plan, &plan.plan_hash).unwrap();
    coordinator.emit(coordinator.source(), &result).unwrap();

    let after = coordinator.source().fetch().unwrap();
    let target = after.mission("PRJ-U1").unwrap();
    assert_eq!(target.assigned_pilot.as_deref(), Some("P001"));
    assert_eq!(target.assigned_drone.as_deref(), Some("D001"));
    assert_eq!(after.mission("PRJ-STD").unwrap().assigned_pilot, None);
    assert_eq!(after.pilot("P001").unwrap().current_assignment.as_deref(), Some("PRJ-U1"));
    assert_eq!(after.drone("D001").unwrap().status, DroneStatus::InUse);

    assert!(coordinator.detect_conflicts().unwrap().is_clean());
}

#[test]
fn test_on_leave_between_plan_and_commit_is_stale() {
    let (dir, store) = json_store(&urgent_roster().build());
    let coordinator = Coordinator::new(store);
    let plan = expect_plan(coordinator.plan_reassignment("PRJ-U1").unwrap());

    let mut edited = coordinator.source().fetch().unwrap();
    if let Some(p) = edited.pilot_mut("P001") {
        p.status = PilotStatus::OnLeave;
    }
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, serde_json::to_string_pretty(&edited).unwrap()).unwrap();
    let bytes_before = std::fs::read(&path).unwrap();

    let err = coordinator.apply_plan(&plan, &plan.plan_hash).unwrap_err();
    assert!(
        matches!(err, EngineError::StaleState { ref resource, .. } if resource == &ResourceRef::Pilot("P001".to_string())),
        "{err}"
    );
    assert_eq!(std::fs::read(&path).unwrap(), bytes_before);
}

#[test]
fn test_second_of_two_racing_commits_is_stale() {
    let (dir, store) = json_store(&urgent_roster().build());
    let first = Coordinator::new(store);
    let second = Coordinator::new(JsonFileStore::new(dir.path().join("snapshot.json")));

    // Planned independently, both proposals pull P001 off PRJ-STD.
    let plan_u1 = expect_plan(first.plan_reassignment("PRJ-U1").unwrap());
    let plan_u2 = expect_plan(second.plan_reassignment("PRJ-U2").unwrap());

    let committed = first.apply_plan(&plan_u1, &plan_u1.plan_hash).unwrap();
    first.emit(first.source(), &committed).unwrap();

    let err = second.apply_plan(&plan_u2, &plan_u2.plan_hash).unwrap_err();
    assert!(matches!(err, EngineError::StaleState { .. }), "{err}");
}

#[test]
fn test_interleaved_commits_on_one_slot_keep_first_writer() {
    let roster = urgent_roster()
        .mission("PRJ-X", "Pune", Priority::Standard, day(2026, 5, 4), day(2026, 5, 6))
        .build();
    let (dir, store) = json_store(&roster);
    let first = Coordinator::new(store);
    let second = Coordinator::new(JsonFileStore::new(dir.path().join("snapshot.json")));

    // Both commits validate against the same file before either is persisted.
    let d001 = first
        .apply_assignment(&AssignmentChange::assign(ResourceRef::Drone("D001".to_string()), "PRJ-X"))
        .unwrap();
    let d002 = second
        .apply_assignment(&AssignmentChange::assign(ResourceRef::Drone("D002".to_string()), "PRJ-X"))
        .unwrap();

    first.emit(first.source(), &d001).unwrap();
    let bytes_after_first = std::fs::read(dir.path().join("snapshot.json")).unwrap();

    let err = second.emit(second.source(), &d002).unwrap_err();
    assert!(
        matches!(err, EngineError::StaleState { ref resource, ref mission_id, .. }
            if resource == &ResourceRef::Drone("D002".to_string()) && mission_id == "PRJ-X"),
        "{err}"
    );
    assert_eq!(std::fs::read(dir.path().join("snapshot.json")).unwrap(), bytes_after_first);

    let after = second.source().fetch().unwrap();
    assert_eq!(after.mission("PRJ-X").unwrap().assigned_drone.as_deref(), Some("D001"));
    assert_eq!(after.drone("D001").unwrap().current_assignment.as_deref(), Some("PRJ-X"));
    let d002 = after.drone("D002").unwrap();
    assert_eq!(d002.status, DroneStatus::Available);
    assert_eq!(d002.current_assignment, None);
    assert!(second.detect_conflicts().unwrap().is_clean());
}

#[test]
fn test_plan_survives_request_serialization() {
    let coordinator = urgent_roster().coordinator();
    let Response::Plan(outcome) = coordinator
        .handle(Request::PlanReassignment {
            mission_id: "PRJ-U1".to_string(),
        })
        .unwrap()
    else {
        panic!("expected a plan response");
    };
    let plan = expect_plan(outcome);

    let wire = serde_json::to_string(&Request::ApplyPlan {
        confirmation: plan.plan_hash.clone(),
        plan,
    })
    .unwrap();
    let request: Request = serde_json::from_str(&wire).unwrap();

    let Response::Committed(result) = coordinator.handle(request).unwrap() else {
        panic!("expected a commit");
    };
    let statuses: Vec<_> = result.deltas.iter().map(|d| (d.action, d.new_status)).collect();
    assert_eq!(
        statuses,
        vec![
            (ChangeAction::Release, ResourceStatus::Pilot(PilotStatus::Available)),
            (ChangeAction::Assign, ResourceStatus::Pilot(PilotStatus::Assigned)),
            (ChangeAction::Assign, ResourceStatus::Drone(DroneStatus::InUse)),
        ]
    );
}

#[test]
fn test_operator_release_then_direct_assign() {
    let (_dir, store) = json_store(&urgent_roster().build());
    let coordinator = Coordinator::new(store);
    let p001 = ResourceRef::Pilot("P001".to_string());

    let released = coordinator
        .apply_assignment(&AssignmentChange::release(p001.clone(), "PRJ-STD"))
        .unwrap();
    coordinator.emit(coordinator.source(), &released).unwrap();

    let assigned = coordinator
        .apply_assignment(&AssignmentChange::assign(p001.clone(), "PRJ-U2"))
        .unwrap();
    coordinator.emit(coordinator.source(), &assigned).unwrap();

    let snapshot = coordinator.source().fetch().unwrap();
    assert_eq!(snapshot.pilot("P001").unwrap().status, PilotStatus::Assigned);
    assert_eq!(snapshot.mission("PRJ-U2").unwrap().assigned_pilot.as_deref(), Some("P001"));

    let err = coordinator
        .apply_assignment(&AssignmentChange::assign(p001, "PRJ-U1"))
        .unwrap_err();
    assert!(matches!(err, EngineError::StaleState { .. }));
}
