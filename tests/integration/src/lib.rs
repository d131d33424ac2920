//! End-to-end scenarios for the assignment engine
//!
//! This test suite drives the coordinator the way an operator would:
//! - Eligibility, conflict and planning scenarios over a shared roster
//! - Two-phase plan confirmation and stale commits
//! - Competing commits against one store
//! - Round trips through the JSON snapshot file

pub mod test_utils;

#[cfg(test)]
mod roster_scenarios;

#[cfg(test)]
mod commit_scenarios;
