// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The result manager: the store of result records and the merge engine.
//!
//! A run goes through this lifecycle:
//!
//! 1. [`ResultManager::test_run_starting`] marks every stored record stale.
//! 2. Results arrive one at a time through [`ResultManager::add_result`].
//! 3. A stale record that receives a new result is merged with it (see
//!    [`MergeRule`]), so that running a subset of tests never hides an earlier,
//!    more significant outcome.
//!
//! When the test tree is rebuilt, [`ResultManager::reload_test_results`] moves
//! every record to the new id of the test with the same full name.

use crate::{
    config::ResultsConfig,
    outcome::Status,
    ranking,
    record::{ResultRecord, TestId},
    tree::TestLookup,
};
use std::{
    collections::{BTreeMap, btree_map::Entry},
    fmt,
};
use tracing::{debug, warn};

/// How [`ResultManager::add_result`] combined an incoming result with the
/// stored one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeRule {
    /// No record existed. The incoming result was stored as is.
    New,

    /// The stored record was already refreshed in this run. The incoming
    /// result replaced it.
    Overwrite,

    /// The stored record was stale and the incoming result only says the test
    /// requires explicit selection. The stored outcome was kept.
    KeepForExplicit,

    /// The stored record was stale. The more significant of the two outcomes
    /// was kept, everything else was taken from the incoming result.
    Merge,
}

impl fmt::Display for MergeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Overwrite => "overwrite",
            Self::KeepForExplicit => "keep-for-explicit",
            Self::Merge => "merge",
        };
        f.write_str(s)
    }
}

/// Owns the current result record for every test identity.
///
/// All operations are total: unknown, empty or repeated ids are never an
/// error.
#[derive(Clone, Debug, Default)]
pub struct ResultManager {
    results: BTreeMap<TestId, ResultRecord>,
    clear_on_reload: bool,
    run_in_progress: bool,
    results_in_run: usize,
}

impl ResultManager {
    /// Creates an empty manager with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty manager with the given settings.
    pub fn with_config(config: &ResultsConfig) -> Self {
        Self {
            clear_on_reload: config.clear_on_reload,
            ..Self::default()
        }
    }

    /// Returns true if tree reloads discard results instead of remapping
    /// them.
    pub fn clear_on_reload(&self) -> bool {
        self.clear_on_reload
    }

    /// Marks every stored record as stale, in preparation for a new run.
    pub fn test_run_starting(&mut self) {
        for record in self.results.values_mut() {
            record.mark_stale();
        }
        self.run_in_progress = true;
        self.results_in_run = 0;
        debug!(
            "run starting: {} existing results marked stale",
            self.results.len()
        );
    }

    /// Records the end of a run.
    ///
    /// Stored records are left as they are.
    pub fn test_run_finished(&mut self) {
        let stale = self
            .results
            .values()
            .filter(|record| !record.is_latest_run())
            .count();
        debug!(
            "run finished: {} results received, {} of {} records stale",
            self.results_in_run,
            stale,
            self.results.len(),
        );
        self.run_in_progress = false;
    }

    /// Returns true between [`test_run_starting`](Self::test_run_starting)
    /// and [`test_run_finished`](Self::test_run_finished).
    pub fn is_run_in_progress(&self) -> bool {
        self.run_in_progress
    }

    /// The number of results added while the current (or most recent) run
    /// was in progress.
    ///
    /// Results added outside a run, such as those loaded from a results file,
    /// are not counted.
    pub fn results_in_run(&self) -> usize {
        self.results_in_run
    }

    /// Records a result for `incoming.id()` and returns the stored record.
    pub fn add_result(&mut self, incoming: ResultRecord) -> &ResultRecord {
        self.add_result_with_rule(incoming).0
    }

    /// Like [`add_result`](Self::add_result), also returning the rule that
    /// was applied.
    pub fn add_result_with_rule(&mut self, incoming: ResultRecord) -> (&ResultRecord, MergeRule) {
        if self.run_in_progress {
            self.results_in_run += 1;
        }

        match self.results.entry(incoming.id().clone()) {
            Entry::Vacant(entry) => {
                debug!(
                    "{}: {} ({}) stored as first result",
                    incoming.id(),
                    incoming.outcome(),
                    MergeRule::New,
                );
                (&*entry.insert(incoming.into_latest()), MergeRule::New)
            }
            Entry::Occupied(entry) => {
                let stored = entry.into_mut();
                let rule = if stored.is_latest_run() {
                    debug!(
                        "{}: {} replaced by {} ({})",
                        stored.id(),
                        stored.outcome(),
                        incoming.outcome(),
                        MergeRule::Overwrite,
                    );
                    stored.overwrite(incoming);
                    MergeRule::Overwrite
                } else if incoming.outcome().is_explicit_exclusion() {
                    debug!(
                        "{}: keeping {} over {} ({})",
                        stored.id(),
                        stored.outcome(),
                        incoming.outcome(),
                        MergeRule::KeepForExplicit,
                    );
                    stored.refresh_keeping_outcome(incoming.id().clone());
                    MergeRule::KeepForExplicit
                } else {
                    let merged = ranking::max(stored.outcome(), incoming.outcome()).clone();
                    debug!(
                        "{}: stale {} merged with {} into {} ({})",
                        stored.id(),
                        stored.outcome(),
                        incoming.outcome(),
                        merged,
                        MergeRule::Merge,
                    );
                    stored.absorb(incoming, merged);
                    MergeRule::Merge
                };
                (&*stored, rule)
            }
        }
    }

    /// Returns the current record for `id`.
    ///
    /// Returns `None` for an empty or unknown id.
    pub fn get_result_for_test(&self, id: &str) -> Option<&ResultRecord> {
        if id.is_empty() {
            return None;
        }
        self.results.get(id)
    }

    /// Discards every stored record.
    pub fn clear_results(&mut self) {
        debug!("clearing {} results", self.results.len());
        self.results.clear();
    }

    /// Moves every record to the id that `tree` now assigns to the test with
    /// the same full name.
    ///
    /// Remapped records are stale. Records whose full name no longer appears
    /// in `tree` are dropped. Outcomes are never merged here.
    ///
    /// If a full name matches several nodes, the first one in tree order is
    /// used. If several old records end up on the same new id, the one with
    /// the smallest old id is kept.
    pub fn reload_test_results(&mut self, tree: &dyn TestLookup) {
        let old = std::mem::take(&mut self.results);
        let total = old.len();

        for (old_id, record) in old {
            let Some(node) = tree.find_by_full_name(record.full_name()) else {
                warn!(
                    "dropping result for `{}` (was id {old_id}): \
                     no test with this name after reload",
                    record.full_name(),
                );
                continue;
            };
            if tree.is_full_name_ambiguous(record.full_name()) {
                warn!(
                    "several tests are named `{}` after reload, \
                     moving result for id {old_id} to the first one (id {})",
                    record.full_name(),
                    node.id(),
                );
            }

            match self.results.entry(node.id().clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(record.clone_with_id(node.id().clone()));
                }
                Entry::Occupied(entry) => {
                    warn!(
                        "dropping result for `{}` (was id {old_id}): \
                         id {} already holds the result for `{}`",
                        record.full_name(),
                        node.id(),
                        entry.get().full_name(),
                    );
                }
            }
        }

        debug!(
            "reload: {} of {total} results remapped",
            self.results.len()
        );
    }

    /// Iterates over records that failed, in id order.
    pub fn failed_tests(&self) -> impl Iterator<Item = &ResultRecord> + '_ {
        self.results
            .values()
            .filter(|record| record.outcome().status() == Status::Failed)
    }

    /// Iterates over all records, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> + '_ {
        self.results.values()
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
