// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    exit_codes::LedgerExitCode,
    output::{NO_HEADING_TARGET, StderrStyles},
};
use camino::{FromPathBufError, Utf8PathBuf};
use outcome_ledger::errors::{ConfigError, ReportParseError, ReportWriteError, TreeLoadError};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholder messages: errors are meant to be
// printed with display_to_stderr, which colorizes them.

/// An expected failure: bad input or an unwritable output, as opposed to a bug.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        err: FromPathBufError,
    },
    #[error("config error")]
    ConfigError {
        #[source]
        err: ConfigError,
    },
    #[error("error reading input file")]
    InputReadError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("error loading test tree")]
    TreeLoadError {
        path: Utf8PathBuf,
        #[source]
        err: TreeLoadError,
    },
    #[error("error parsing result document")]
    ReportParseError {
        path: Utf8PathBuf,
        #[source]
        err: ReportParseError,
    },
    #[error("error writing output")]
    WriteError {
        #[source]
        err: std::io::Error,
    },
    #[error("error writing JSON output")]
    JsonWriteError {
        #[source]
        err: serde_json::Error,
    },
    #[error("error writing XML output")]
    ReportWriteError {
        #[source]
        err: ReportWriteError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigError { .. }
            | Self::InputReadError { .. } => LedgerExitCode::SETUP_ERROR,
            Self::TreeLoadError { .. } | Self::ReportParseError { .. } => {
                LedgerExitCode::INPUT_PARSE_FAILED
            }
            Self::WriteError { .. } | Self::JsonWriteError { .. } | Self::ReportWriteError { .. } => {
                LedgerExitCode::WRITE_OUTPUT_ERROR
            }
        }
    }

    /// Displays this error to stderr, followed by its chain of causes.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { err } => {
                error!("could not determine current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { err } => {
                error!("current directory is not valid UTF-8");
                Some(err as &dyn Error)
            }
            Self::ConfigError { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputReadError { path, err } => {
                error!("failed to read `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::TreeLoadError { path, err } => {
                error!("failed to load test tree from `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::ReportParseError { path, err } => {
                error!(
                    "failed to parse result document `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::WriteError { err } => {
                error!("failed to write output");
                Some(err as &dyn Error)
            }
            Self::JsonWriteError { err } => {
                error!("failed to write JSON output");
                Some(err as &dyn Error)
            }
            Self::ReportWriteError { err } => {
                error!("failed to write XML output");
                err.source()
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
