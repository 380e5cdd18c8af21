// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result records: the most recently known result for one test node.

use crate::outcome::{Outcome, Status};
use serde::{Serialize, Serializer};
use smol_str::SmolStr;
use std::{borrow::Borrow, fmt, time::Duration};

/// The identity of a node in the test tree.
///
/// Ids are only stable within a single load of the test tree. Reloading the
/// tree may assign different ids to the same tests; use
/// [`ResultRecord::full_name`] to correlate across reloads.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TestId(SmolStr);

impl TestId {
    /// Creates a new test id.
    pub fn new(id: &str) -> Self {
        Self(SmolStr::new(id))
    }

    /// Returns the id as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for TestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TestId {
    fn from(id: String) -> Self {
        Self(SmolStr::from(id))
    }
}

impl Borrow<str> for TestId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a node or result describes a single test or a suite of tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A single test case.
    Case,

    /// A suite: an assembly, namespace, fixture, or parameterized group.
    Suite,
}

impl NodeKind {
    /// The element name used for this kind in result reports.
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Case => "test-case",
            Self::Suite => "test-suite",
        }
    }
}

/// The most recently known result for one test identity.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResultRecord {
    id: TestId,
    full_name: String,
    kind: NodeKind,
    outcome: Outcome,
    #[serde(rename = "duration-secs", serialize_with = "serialize_secs")]
    duration: Option<Duration>,
    is_latest_run: bool,
}

impl ResultRecord {
    /// Creates a record for a test case that was just reported.
    ///
    /// A fresh record counts as part of the latest run.
    pub fn new(id: impl Into<TestId>, full_name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            kind: NodeKind::Case,
            outcome,
            duration: None,
            is_latest_run: true,
        }
    }

    /// Sets the kind of node this record describes.
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the elapsed time of the run that produced this record.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Returns a copy of this record under a different identity.
    ///
    /// Used when the test tree is reloaded. The copy is stale.
    pub fn clone_with_id(&self, id: TestId) -> Self {
        Self {
            id,
            is_latest_run: false,
            ..self.clone()
        }
    }

    /// Returns a copy of this record with its status replaced.
    ///
    /// The label, full name and duration are kept. The copy is stale.
    pub fn clone_with_status(&self, status: Status) -> Self {
        Self {
            outcome: self.outcome.replace_status(status),
            is_latest_run: false,
            ..self.clone()
        }
    }

    /// The id of the test node this record describes.
    pub fn id(&self) -> &TestId {
        &self.id
    }

    /// The fully qualified name of the test. Stable across reloads.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Whether this is a test case or a suite result.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The current outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Elapsed time of the run that produced this record. For display only.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// True if this record was produced during the most recently started run.
    pub fn is_latest_run(&self) -> bool {
        self.is_latest_run
    }

    /// Returns this record as part of the current run.
    pub(crate) fn into_latest(self) -> Self {
        Self {
            is_latest_run: true,
            ..self
        }
    }

    pub(crate) fn mark_stale(&mut self) {
        self.is_latest_run = false;
    }

    /// Keeps the current outcome but moves the record into the current run
    /// under `id`.
    pub(crate) fn refresh_keeping_outcome(&mut self, id: TestId) {
        self.id = id;
        self.is_latest_run = true;
    }

    /// Takes everything from `incoming` except the outcome, which is replaced
    /// by `outcome`.
    pub(crate) fn absorb(&mut self, incoming: ResultRecord, outcome: Outcome) {
        *self = Self {
            outcome,
            is_latest_run: true,
            ..incoming
        };
    }

    /// Replaces this record with `incoming`, as part of the current run.
    pub(crate) fn overwrite(&mut self, incoming: ResultRecord) {
        *self = incoming.into_latest();
    }
}

// serde's serialize_with hands fields over by reference.
#[allow(clippy::ref_option)]
fn serialize_secs<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(duration) => serializer.serialize_some(&duration.as_secs_f64()),
        None => serializer.serialize_none(),
    }
}
