// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summaries over stored results: per-category counts and group rollups.
//!
//! Group rollups go through [`ranking::worst_of`], the same precedence the
//! merge engine uses, so a group can never show a different outcome than the
//! worst of its members.

use crate::{
    manager::ResultManager,
    outcome::{Label, Outcome, Status},
    ranking,
    record::{ResultRecord, TestId},
};

/// Counts of stored records by outcome category.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ResultCounts {
    /// The number of failed records.
    pub failed: usize,

    /// The number of records with warnings.
    pub warning: usize,

    /// The number of records skipped with the `Ignored` label.
    pub ignored: usize,

    /// The number of passed records.
    pub passed: usize,

    /// The number of inconclusive records.
    pub inconclusive: usize,

    /// The number of records skipped with the `Explicit` label.
    pub explicit: usize,

    /// The number of records skipped for any other reason.
    pub skipped: usize,

    /// The number of records not refreshed in the latest run. Each of these
    /// is also counted in one of the categories above.
    pub stale: usize,
}

impl ResultCounts {
    /// Tallies `records`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ResultRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.on_record(record);
        }
        counts
    }

    /// Tallies every record in `manager`.
    pub fn from_manager(manager: &ResultManager) -> Self {
        Self::from_records(manager.iter())
    }

    /// The total number of records counted.
    pub fn total(&self) -> usize {
        self.failed
            + self.warning
            + self.ignored
            + self.passed
            + self.inconclusive
            + self.explicit
            + self.skipped
    }

    /// Returns true if any record failed.
    #[inline]
    pub fn any_failed(&self) -> bool {
        self.failed > 0
    }

    fn on_record(&mut self, record: &ResultRecord) {
        let outcome = record.outcome();
        match (outcome.status(), outcome.label()) {
            (Status::Failed, _) => self.failed += 1,
            (Status::Warning, _) => self.warning += 1,
            (Status::Passed, _) => self.passed += 1,
            (Status::Inconclusive, _) => self.inconclusive += 1,
            (Status::Skipped, Some(Label::Ignored)) => self.ignored += 1,
            (Status::Skipped, Some(Label::Explicit)) => self.explicit += 1,
            (Status::Skipped, _) => self.skipped += 1,
        }
        if !record.is_latest_run() {
            self.stale += 1;
        }
    }
}

/// Returns the outcome a group of tests should show: the most significant
/// outcome among the members' current records.
///
/// Members without a record are left out. Returns `None` if no member has a
/// record.
pub fn group_outcome<'a>(
    manager: &ResultManager,
    members: impl IntoIterator<Item = &'a TestId>,
) -> Option<Outcome> {
    let outcomes = members
        .into_iter()
        .filter_map(|id| manager.get_result_for_test(id.as_str()))
        .map(ResultRecord::outcome);
    ranking::worst_of(outcomes).cloned()
}
