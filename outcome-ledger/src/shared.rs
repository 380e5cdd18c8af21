// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A result manager that can be shared across threads.

use crate::{events::RunEvent, manager::ResultManager, record::ResultRecord, tree::TestLookup};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A [`ResultManager`] behind a single lock.
///
/// Each operation holds the lock for its whole read-modify-write sequence.
/// Reads return owned copies taken under the lock, so they are consistent
/// snapshots.
#[derive(Clone, Debug, Default)]
pub struct SharedResultManager {
    inner: Arc<Mutex<ResultManager>>,
}

impl SharedResultManager {
    /// Wraps `manager`.
    pub fn new(manager: ResultManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Runs `f` with exclusive access to the manager.
    pub fn with_lock<T>(&self, f: impl FnOnce(&mut ResultManager) -> T) -> T {
        f(&mut self.lock())
    }

    /// See [`ResultManager::handle_event`].
    pub fn handle_event(&self, event: RunEvent<'_>) -> Option<ResultRecord> {
        self.lock().handle_event(event).cloned()
    }

    /// See [`ResultManager::test_run_starting`].
    pub fn test_run_starting(&self) {
        self.lock().test_run_starting();
    }

    /// See [`ResultManager::add_result`].
    pub fn add_result(&self, incoming: ResultRecord) -> ResultRecord {
        self.lock().add_result(incoming).clone()
    }

    /// See [`ResultManager::get_result_for_test`].
    pub fn get_result_for_test(&self, id: &str) -> Option<ResultRecord> {
        self.lock().get_result_for_test(id).cloned()
    }

    /// See [`ResultManager::clear_results`].
    pub fn clear_results(&self) {
        self.lock().clear_results();
    }

    /// See [`ResultManager::reload_test_results`].
    pub fn reload_test_results(&self, tree: &dyn TestLookup) {
        self.lock().reload_test_results(tree);
    }

    /// Returns a copy of every record, in id order.
    pub fn snapshot(&self) -> Vec<ResultRecord> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, ResultManager> {
        // No operation can panic halfway through an update.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
