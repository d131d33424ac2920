//! Read-only scenarios: eligibility, conflicts and planning
//!
//! # Test Scenarios
//!
//! 1. **Double booking**: one pilot on two overlapping missions is reported once for the pair
//! 2. **Donor ranking**: the donor mission starting later is pulled first
//! 3. **Nothing to pull**: an Urgent mission with no candidate gets `NoPlanAvailable`
//! 4. **Partial failure**: a malformed record is skipped, the rest of the scan proceeds
//! 5. **Contested batch**: the sooner Urgent mission wins a shared candidate

use crate::test_utils::{expect_plan, RosterBuilder};
use dronops_assignment::{
    ConflictReason, EngineError, PlanKind, PlanOutcome, PlanStep, Request, Response, Severity,
};
use dronops_domain::fixtures::day;
use dronops_domain::{EntityKind, Priority, ResourceKind, ResourceRef};

fn pilot(id: &str) -> ResourceRef {
    ResourceRef::Pilot(id.to_string())
}

#[test]
fn test_double_booking_reported_for_pair() {
    let coordinator = RosterBuilder::new()
        .pilot("P001", "Pune", &["Mapping"])
        .mission("PRJ-A", "Pune", Priority::Standard, day(2026, 1, 1), day(2026, 1, 5))
        .mission("PRJ-B", "Pune", Priority::Standard, day(2026, 1, 3), day(2026, 1, 10))
        .staff_pilot("P001", "PRJ-A")
        .requiring(|m| m.assigned_pilot = Some("P001".to_string()))
        .coordinator();

    let report = coordinator.detect_conflicts().unwrap();
    assert_eq!(report.double_bookings.len(), 1);
    let conflict = &report.double_bookings[0];
    assert_eq!(conflict.reason, ConflictReason::DoubleBooking);
    assert_eq!(conflict.severity, Severity::High);
    assert_eq!(conflict.resources, vec![pilot("P001")]);
    assert_eq!(conflict.mission_ids, vec!["PRJ-A".to_string(), "PRJ-B".to_string()]);

    assert_eq!(report, coordinator.detect_conflicts().unwrap());
}

#[test]
fn test_touching_ranges_overlap_inclusively() {
    let coordinator = RosterBuilder::new()
        .pilot("P001", "Pune", &[])
        .mission("PRJ-A", "Pune", Priority::Standard, day(2026, 1, 1), day(2026, 1, 5))
        .staff_pilot("P001", "PRJ-A")
        .mission("PRJ-B", "Pune", Priority::Standard, day(2026, 1, 5), day(2026, 1, 6))
        .requiring(|m| m.assigned_pilot = Some("P001".to_string()))
        .mission("PRJ-C", "Pune", Priority::Standard, day(2026, 1, 7), day(2026, 1, 9))
        .requiring(|m| m.assigned_pilot = Some("P001".to_string()))
        .coordinator();

    // A and B share Jan 5; C starts the day after B ends.
    let report = coordinator.detect_conflicts().unwrap();
    let pairs: Vec<_> = report.double_bookings.iter().map(|c| c.mission_ids.clone()).collect();
    assert_eq!(pairs, vec![vec!["PRJ-A".to_string(), "PRJ-B".to_string()]]);
}

#[test]
fn test_later_donor_pulled_first() {
    let coordinator = RosterBuilder::new()
        .pilot("P001", "Pune", &["Thermal"])
        .pilot("P002", "Pune", &["Thermal"])
        .drone("D001", "Pune", &[])
        .mission("PRJ-D1", "Pune", Priority::Standard, day(2026, 3, 1), day(2026, 3, 4))
        .staff_pilot("P001", "PRJ-D1")
        .mission("PRJ-D2", "Pune", Priority::Standard, day(2026, 2, 1), day(2026, 2, 4))
        .staff_pilot("P002", "PRJ-D2")
        .mission("PRJ-U", "Pune", Priority::Urgent, day(2026, 2, 10), day(2026, 2, 12))
        .requiring(|m| m.required_skills = ["Thermal".to_string()].into())
        .staff_drone("D001", "PRJ-U")
        .coordinator();

    let plan = expect_plan(coordinator.plan_reassignment("PRJ-U").unwrap());
    assert_eq!(plan.kind, PlanKind::Reassignment);
    assert_eq!(
        plan.steps,
        vec![
            PlanStep::Release {
                resource: pilot("P001"),
                mission_id: "PRJ-D1".to_string(),
            },
            PlanStep::Assign {
                resource: pilot("P001"),
                mission_id: "PRJ-U".to_string(),
            },
        ]
    );
    assert_eq!(plan.impacts.len(), 1);
    assert_eq!(plan.impacts[0].mission_id, "PRJ-D1");
    assert_eq!(plan.alternatives.len(), 1);
    assert_eq!(plan.alternatives[0].resource, pilot("P002"));
}

#[test]
fn test_no_candidate_at_any_priority() {
    let coordinator = RosterBuilder::new()
        .pilot("P001", "Goa", &["Mapping"])
        .mission("PRJ-U", "Pune", Priority::Urgent, day(2026, 2, 10), day(2026, 2, 12))
        .requiring(|m| m.required_skills = ["Mapping".to_string()].into())
        .coordinator();

    match coordinator.plan_reassignment("PRJ-U").unwrap() {
        PlanOutcome::NoPlanAvailable { mission_id, reason } => {
            assert_eq!(mission_id, "PRJ-U");
            assert!(reason.contains("at any priority level"), "{reason}");
        }
        PlanOutcome::Plan(plan) => panic!("expected no plan, got {plan:?}"),
    }
}

#[test]
fn test_malformed_mission_is_skipped_not_fatal() {
    let coordinator = RosterBuilder::new()
        .pilot("P001", "Pune", &[])
        .mission("PRJ-A", "Pune", Priority::Standard, day(2026, 1, 1), day(2026, 1, 5))
        .staff_pilot("P001", "PRJ-A")
        .with_pilot("P001", |p| p.location = "Goa".to_string())
        .mission("PRJ-BAD", "", Priority::High, day(2026, 1, 1), day(2026, 1, 5))
        .coordinator();

    let report = coordinator.detect_conflicts().unwrap();
    assert_eq!(report.location_mismatches.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].entity, EntityKind::Mission);
    assert_eq!(report.skipped[0].id, "PRJ-BAD");

    let err = coordinator.find_eligible("PRJ-BAD", ResourceKind::Pilot).unwrap_err();
    assert!(matches!(err, EngineError::Validation(ref issue) if issue.field == "location"));
}

#[test]
fn test_dangling_reference_is_a_contract_violation() {
    let coordinator = RosterBuilder::new()
        .mission("PRJ-A", "Pune", Priority::Standard, day(2026, 1, 1), day(2026, 1, 5))
        .requiring(|m| m.assigned_drone = Some("D404".to_string()))
        .coordinator();

    let err = coordinator.detect_conflicts().unwrap_err();
    assert!(matches!(err, EngineError::Domain(_)), "{err}");
}

#[test]
fn test_sooner_urgent_mission_wins_contested_pilot() {
    let coordinator = RosterBuilder::new()
        .pilot("P001", "Pune", &["Mapping"])
        .drone("D001", "Pune", &[])
        .drone("D002", "Pune", &[])
        .mission("PRJ-LATE", "Pune", Priority::Urgent, day(2026, 2, 10), day(2026, 2, 12))
        .mission("PRJ-SOON", "Pune", Priority::Urgent, day(2026, 2, 1), day(2026, 2, 3))
        .coordinator();

    let Response::Plans(outcomes) = coordinator.handle(Request::PlanUrgentBatch).unwrap() else {
        panic!("expected batch plans");
    };
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].mission_id(), "PRJ-SOON");
    let soon = outcomes[0].plan().expect("sooner mission is staffed");
    assert!(soon.claimed().any(|r| r == &pilot("P001")));
    assert!(matches!(outcomes[1], PlanOutcome::NoPlanAvailable { .. }));
}

#[test]
fn test_suitability_lists_near_misses() {
    let coordinator = RosterBuilder::new()
        .pilot("P001", "Pune", &["Mapping"])
        .pilot("P002", "Goa", &["Mapping"])
        .mission("PRJ-A", "Pune", Priority::High, day(2026, 2, 1), day(2026, 2, 3))
        .requiring(|m| m.required_skills = ["Mapping".to_string()].into())
        .coordinator();

    let eligible = coordinator.find_eligible("PRJ-A", ResourceKind::Pilot).unwrap();
    assert_eq!(eligible.len(), 1);

    let ranked = coordinator.rank_suitability("PRJ-A", ResourceKind::Pilot).unwrap();
    let verdicts: Vec<_> = ranked.iter().map(|e| e.recommendation.as_str()).collect();
    assert_eq!(
        verdicts,
        vec!["Excellent match - Ready to deploy", "Good match - Different location"]
    );
}
