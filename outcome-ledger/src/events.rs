// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run lifecycle events.
//!
//! Whatever drives test runs reports what happens as a stream of
//! [`RunEvent`]s. [`ResultManager::handle_event`] turns each one into the
//! matching store operation.

use crate::{manager::ResultManager, record::ResultRecord, tree::TestLookup};
use std::fmt;
use tracing::debug;

/// Something that happened to the test tree or to a run.
pub enum RunEvent<'a> {
    /// A test tree was loaded for the first time. Earlier results belong to a
    /// different set of tests and are discarded.
    TreeLoaded,

    /// The test tree was rebuilt, possibly assigning new ids.
    TreeReloaded {
        /// The rebuilt tree.
        tree: &'a dyn TestLookup,
    },

    /// A run is starting.
    RunStarting,

    /// A test case finished.
    TestFinished {
        /// The reported result.
        record: ResultRecord,
    },

    /// A suite finished.
    SuiteFinished {
        /// The reported result.
        record: ResultRecord,
    },

    /// The run finished or was stopped.
    RunFinished,

    /// The user discarded all results.
    ResultsCleared,
}

impl RunEvent<'_> {
    /// A short name for the event, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TreeLoaded => "tree-loaded",
            Self::TreeReloaded { .. } => "tree-reloaded",
            Self::RunStarting => "run-starting",
            Self::TestFinished { .. } => "test-finished",
            Self::SuiteFinished { .. } => "suite-finished",
            Self::RunFinished => "run-finished",
            Self::ResultsCleared => "results-cleared",
        }
    }
}

impl fmt::Debug for RunEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestFinished { record } | Self::SuiteFinished { record } => f
                .debug_struct(self.name())
                .field("record", record)
                .finish(),
            _ => f.write_str(self.name()),
        }
    }
}

impl ResultManager {
    /// Applies one run event.
    ///
    /// Returns the stored record for `TestFinished` and `SuiteFinished`, and
    /// `None` for every other event.
    pub fn handle_event(&mut self, event: RunEvent<'_>) -> Option<&ResultRecord> {
        debug!("event: {}", event.name());
        match event {
            RunEvent::TreeLoaded | RunEvent::ResultsCleared => {
                self.clear_results();
                None
            }
            RunEvent::TreeReloaded { tree } => {
                if self.clear_on_reload() {
                    self.clear_results();
                } else {
                    self.reload_test_results(tree);
                }
                None
            }
            RunEvent::RunStarting => {
                self.test_run_starting();
                None
            }
            RunEvent::TestFinished { record } | RunEvent::SuiteFinished { record } => {
                Some(self.add_result(record))
            }
            RunEvent::RunFinished => {
                self.test_run_finished();
                None
            }
        }
    }
}
