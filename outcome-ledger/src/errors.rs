// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by outcome-ledger.
//!
//! Lookups that miss are never errors: they return `None`. The types here
//! cover malformed input (result reports, test trees, config files) and
//! output failures.

use crate::outcome::Status;
use camino::Utf8PathBuf;
use itertools::Itertools;
use quick_xml::events::attributes::AttrError;
use std::{num::ParseFloatError, time::TryFromFloatSecsError};
use thiserror::Error;

/// Error returned while parsing a [`Status`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized result status: {input}\n(known values: {})",
    Status::variants().iter().join(", "),
)]
pub struct StatusParseError {
    input: String,
}

impl StatusParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Error returned while parsing a duration from a result report.
///
/// Durations are always written with `.` as the decimal separator, whatever
/// the locale of the machine that produced or reads the report.
#[derive(Clone, Debug, Error)]
pub enum DurationParseError {
    /// The value uses `,` as a decimal separator.
    #[error("duration `{input}` uses `,` as a decimal separator (only `.` is accepted)")]
    LocaleSeparator {
        /// The input that failed to parse.
        input: String,
    },

    /// The value is not a number.
    #[error("duration `{input}` is not a number")]
    NotANumber {
        /// The input that failed to parse.
        input: String,

        /// The underlying error.
        #[source]
        error: ParseFloatError,
    },

    /// The value is negative, not finite, or too large.
    #[error("duration `{input}` is out of range")]
    OutOfRange {
        /// The input that failed to parse.
        input: String,

        /// The underlying error.
        #[source]
        error: TryFromFloatSecsError,
    },
}

/// An error that occurred while parsing a result report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportParseError {
    /// The document is not well-formed XML.
    #[error("malformed result report at byte {position}")]
    Xml {
        /// The byte offset at which the error was detected.
        position: usize,

        /// The underlying error.
        #[source]
        error: quick_xml::Error,
    },

    /// An element carries a malformed attribute.
    #[error("malformed attribute on `<{element}>`")]
    Attribute {
        /// The element name.
        element: String,

        /// The underlying error.
        #[source]
        error: AttrError,
    },

    /// An element has neither an `id` nor a `fullname`.
    #[error("`<{element}>` has neither an `id` nor a `fullname` attribute")]
    MissingIdentity {
        /// The element name.
        element: String,
    },

    /// An element has no `result` attribute.
    #[error("`<{element}>` with id `{id}` is missing the `result` attribute")]
    MissingResult {
        /// The element name.
        element: String,

        /// The identity of the element.
        id: String,
    },

    /// An element has an unknown `result` value.
    #[error("`<{element}>` with id `{id}` has an invalid result")]
    Status {
        /// The element name.
        element: String,

        /// The identity of the element.
        id: String,

        /// The underlying error.
        #[source]
        error: StatusParseError,
    },

    /// An element has an unparseable `duration` value.
    #[error("`<{element}>` with id `{id}` has an invalid duration")]
    Duration {
        /// The element name.
        element: String,

        /// The identity of the element.
        id: String,

        /// The underlying error.
        #[source]
        error: DurationParseError,
    },

    /// The document ended before an element was closed, as happens when the
    /// engine writing it stopped partway.
    #[error("result report ended before `<{element}>` with id `{id}` was closed")]
    UnclosedElement {
        /// The element name.
        element: String,

        /// The identity of the innermost unclosed element.
        id: String,
    },

    /// The input contains no `test-case` or `test-suite` element.
    #[error("no `test-case` or `test-suite` element found in result report")]
    NoFragment,
}

/// An error that occurs while writing records as a result report.
#[derive(Debug, Error)]
#[error("error writing result report")]
pub struct ReportWriteError {
    #[from]
    inner: quick_xml::Error,
}

/// An error that occurred while loading a test tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TreeLoadError {
    /// The document is not well-formed XML.
    #[error("malformed test tree document at byte {position}")]
    Xml {
        /// The byte offset at which the error was detected.
        position: usize,

        /// The underlying error.
        #[source]
        error: quick_xml::Error,
    },

    /// An element carries a malformed attribute.
    #[error("malformed attribute on `<{element}>`")]
    Attribute {
        /// The element name.
        element: String,

        /// The underlying error.
        #[source]
        error: AttrError,
    },

    /// A node has no `id` attribute.
    #[error("`<{element}>` named `{name}` has no `id` attribute")]
    MissingId {
        /// The element name.
        element: String,

        /// The node's name, or an empty string if it has none.
        name: String,
    },

    /// Two nodes share the same id.
    #[error("test id `{id}` appears more than once in the test tree")]
    DuplicateId {
        /// The duplicated id.
        id: String,
    },

    /// The document ended before a node was closed.
    #[error("test tree document ended before `<{element}>` with id `{id}` was closed")]
    UnclosedElement {
        /// The element name.
        element: String,

        /// The id of the innermost unclosed node.
        id: String,
    },

    /// The document has no test nodes at all.
    #[error("test tree document contains no `test-suite` or `test-case` elements")]
    Empty,
}

/// An error that occurred while loading the configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file at `{path}`")]
    Read {
        /// The path that failed to be read.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// The config file could not be parsed.
    #[error("failed to parse config file at `{path}`")]
    Parse {
        /// The path that failed to be parsed.
        path: Utf8PathBuf,

        /// The underlying TOML error.
        #[source]
        error: toml::de::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file not found at `{path}`")]
    FileNotFound {
        /// The path that was requested.
        path: Utf8PathBuf,
    },
}
