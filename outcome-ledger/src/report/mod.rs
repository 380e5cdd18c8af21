// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading and writing the result report format.
//!
//! A running engine reports each finished test case or suite as an element:
//!
//! ```xml
//! <test-case id="3" fullname="Assembly.Folder1.TestB" result="Failed" label="Error" duration="0.125" />
//! ```
//!
//! Whole result documents nest these elements; [`parse_document`] returns them
//! in the order an engine would have reported them.

mod parse;
mod serialize;

pub use parse::{parse_document, parse_fragment};
pub use serialize::{records_to_string, serialize_records};

use crate::{
    config::FullNameFallback,
    errors::DurationParseError,
    outcome::Outcome,
    record::{NodeKind, ResultRecord, TestId},
    tree::TestLookup,
};
use std::time::Duration;

/// One reported result, as read from a result report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportFragment {
    kind: NodeKind,
    identity: TestId,
    has_id: bool,
    name: Option<String>,
    full_name: Option<String>,
    outcome: Outcome,
    duration: Option<Duration>,
}

impl ReportFragment {
    /// Whether this fragment reports a test case or a suite.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The identity results are stored under.
    ///
    /// This is the `id` attribute, or the full name for fragments that carry
    /// no id.
    pub fn identity(&self) -> &TestId {
        &self.identity
    }

    /// Returns true if the fragment carried an `id` attribute.
    pub fn has_id(&self) -> bool {
        self.has_id
    }

    /// The short name, if reported.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The full name, if reported.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// The reported outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The reported duration.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Converts this fragment into a record ready to be added to a result
    /// manager.
    ///
    /// If the fragment has no full name, one is taken according to
    /// `fallback`: from the node in `tree` with the same id, or from the id
    /// itself.
    pub fn into_record(
        self,
        tree: Option<&dyn TestLookup>,
        fallback: FullNameFallback,
    ) -> ResultRecord {
        let full_name = match self.full_name {
            Some(full_name) => full_name,
            None => {
                let from_tree = match (fallback, tree) {
                    (FullNameFallback::Tree, Some(tree)) => tree
                        .get_test_by_id(&self.identity)
                        .map(|node| node.full_name().to_owned()),
                    _ => None,
                };
                from_tree.unwrap_or_else(|| self.identity.as_str().to_owned())
            }
        };

        let record = ResultRecord::new(self.identity, full_name, self.outcome).with_kind(self.kind);
        match self.duration {
            Some(duration) => record.with_duration(duration),
            None => record,
        }
    }
}

/// Parses a duration in seconds, as written in result reports.
///
/// The only accepted decimal separator is `.`, whatever the current locale.
/// The value must be finite and non-negative.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    if input.contains(',') {
        return Err(DurationParseError::LocaleSeparator {
            input: input.to_owned(),
        });
    }
    let secs: f64 = input
        .parse()
        .map_err(|error| DurationParseError::NotANumber {
            input: input.to_owned(),
            error,
        })?;
    Duration::try_from_secs_f64(secs).map_err(|error| DurationParseError::OutOfRange {
        input: input.to_owned(),
        error,
    })
}
