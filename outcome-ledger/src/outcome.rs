// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The status model: what happened to a test or suite.
//!
//! An [`Outcome`] is a [`Status`] plus an optional [`Label`]. Outcomes are
//! deliberately not ordered: the only way to compare two of them is through
//! [`ranking`](crate::ranking).

use crate::errors::StatusParseError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{fmt, str::FromStr};

/// The kind of outcome a test or suite produced, independent of why.
///
/// This type intentionally does not implement `Ord`: see
/// [`ranking::rank`](crate::ranking::rank).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Status {
    /// The test or suite failed.
    Failed,

    /// A non-fatal issue was reported.
    Warning,

    /// The test or suite succeeded.
    Passed,

    /// No definitive outcome was reached.
    Inconclusive,

    /// The test was not run.
    Skipped,
}

impl Status {
    /// Returns the names of all statuses, as they appear in result reports.
    pub fn variants() -> &'static [&'static str] {
        &["Failed", "Warning", "Passed", "Inconclusive", "Skipped"]
    }

    /// Returns the name of this status as it appears in result reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Failed => "Failed",
            Self::Warning => "Warning",
            Self::Passed => "Passed",
            Self::Inconclusive => "Inconclusive",
            Self::Skipped => "Skipped",
        }
    }
}

impl FromStr for Status {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "Failed" => Self::Failed,
            "Warning" => Self::Warning,
            "Passed" => Self::Passed,
            "Inconclusive" => Self::Inconclusive,
            "Skipped" => Self::Skipped,
            other => return Err(StatusParseError::new(other)),
        };
        Ok(status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A qualifier attached to a result.
///
/// Two labels change how results are merged:
///
/// * [`Ignored`](Self::Ignored): the test was deliberately excluded. This is a
///   genuine, reportable outcome.
/// * [`Explicit`](Self::Explicit): the test only runs when selected
///   explicitly, and was not part of this run. This is not an outcome at all
///   and never overwrites a previously recorded one.
///
/// Every other label is carried through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "SmolStr", into = "SmolStr")]
pub enum Label {
    /// `Ignored`.
    Ignored,

    /// `Explicit`.
    Explicit,

    /// Any other label, e.g. `Error` or `Cancelled`.
    Other(SmolStr),
}

impl Label {
    /// Parses a label as it appears in a result report.
    ///
    /// Returns `None` for an empty label.
    pub fn from_report_value(s: &str) -> Option<Self> {
        if s.is_empty() {
            None
        } else {
            Some(Self::from(SmolStr::new(s)))
        }
    }

    /// Returns the label as it appears in result reports.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ignored => "Ignored",
            Self::Explicit => "Explicit",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl From<SmolStr> for Label {
    fn from(s: SmolStr) -> Self {
        match s.as_str() {
            "Ignored" => Self::Ignored,
            "Explicit" => Self::Explicit,
            _ => Self::Other(s),
        }
    }
}

impl From<Label> for SmolStr {
    fn from(label: Label) -> Self {
        match label {
            Label::Ignored => SmolStr::new_static("Ignored"),
            Label::Explicit => SmolStr::new_static("Explicit"),
            Label::Other(label) => label,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status together with its optional label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Outcome {
    status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<Label>,
}

impl Outcome {
    /// Creates an outcome with no label.
    pub const fn new(status: Status) -> Self {
        Self {
            status,
            label: None,
        }
    }

    /// Creates an outcome with an optional label.
    pub fn with_label(status: Status, label: Option<Label>) -> Self {
        Self { status, label }
    }

    /// A passed outcome.
    pub const fn passed() -> Self {
        Self::new(Status::Passed)
    }

    /// A failed outcome.
    pub const fn failed() -> Self {
        Self::new(Status::Failed)
    }

    /// A skipped outcome with no label.
    pub const fn skipped() -> Self {
        Self::new(Status::Skipped)
    }

    /// A test that was deliberately ignored.
    pub const fn ignored() -> Self {
        Self {
            status: Status::Skipped,
            label: Some(Label::Ignored),
        }
    }

    /// A test that was excluded because it only runs when explicitly selected.
    pub const fn explicit() -> Self {
        Self {
            status: Status::Skipped,
            label: Some(Label::Explicit),
        }
    }

    /// Returns the status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the label, if any.
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Returns a copy of this outcome with the status replaced.
    ///
    /// The label is kept.
    pub fn replace_status(&self, status: Status) -> Self {
        Self {
            status,
            label: self.label.clone(),
        }
    }

    /// Returns true if this outcome only records that the test was left out
    /// because it requires explicit selection.
    ///
    /// Such an outcome says nothing about how the test behaves.
    pub fn is_explicit_exclusion(&self) -> bool {
        matches!(self.label, Some(Label::Explicit))
    }
}

impl From<Status> for Outcome {
    fn from(status: Status) -> Self {
        Self::new(status)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}:{}", self.status, label),
            None => write!(f, "{}", self.status),
        }
    }
}
