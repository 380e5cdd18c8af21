// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome precedence: which of two outcomes is more significant.
//!
//! Every consumer that needs a single outcome out of several (merging reruns,
//! rolling up a group of tests into one icon) goes through [`rank`] and
//! [`max`], so that per-test and grouped views can never disagree.
//!
//! The order, from most to least significant:
//!
//! | Rank | Outcome                          |
//! |------|----------------------------------|
//! | 5    | `Failed`                         |
//! | 4    | `Warning`                        |
//! | 3    | `Skipped` labeled `Ignored`      |
//! | 2    | `Passed`                         |
//! | 1    | `Inconclusive`                   |
//! | 0    | `Skipped` with any other label   |
//!
//! `Inconclusive` sits below `Passed`: a suite with one passing and one
//! inconclusive child reads as passed. Plain `Skipped` sits at the bottom
//! because it means "no information", and must not hide anything.

use crate::outcome::{Label, Outcome, Status};

/// The rank of a failed outcome.
pub const FAILED_RANK: u8 = 5;

/// The rank of a warning.
pub const WARNING_RANK: u8 = 4;

/// The rank of a skipped outcome labeled `Ignored`.
pub const IGNORED_RANK: u8 = 3;

/// The rank of a passed outcome.
pub const PASSED_RANK: u8 = 2;

/// The rank of an inconclusive outcome.
pub const INCONCLUSIVE_RANK: u8 = 1;

/// The rank of any other skipped outcome.
pub const SKIPPED_RANK: u8 = 0;

/// Returns the precedence rank of an outcome. Higher is more significant.
///
/// Labels only matter for `Skipped`.
pub fn rank(outcome: &Outcome) -> u8 {
    match (outcome.status(), outcome.label()) {
        (Status::Failed, _) => FAILED_RANK,
        (Status::Warning, _) => WARNING_RANK,
        (Status::Skipped, Some(Label::Ignored)) => IGNORED_RANK,
        (Status::Passed, _) => PASSED_RANK,
        (Status::Inconclusive, _) => INCONCLUSIVE_RANK,
        (Status::Skipped, _) => SKIPPED_RANK,
    }
}

/// Returns whichever outcome has the higher rank.
///
/// On a tie, `b` is returned. Merging passes the incoming result as `b`, so a
/// tie keeps the newer label.
pub fn max<'a>(a: &'a Outcome, b: &'a Outcome) -> &'a Outcome {
    if rank(a) > rank(b) { a } else { b }
}

/// Returns the most significant outcome in `outcomes`, or `None` if there are
/// none.
///
/// Among outcomes of equal rank, the last one wins.
pub fn worst_of<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Option<&'a Outcome> {
    outcomes.into_iter().reduce(max)
}
