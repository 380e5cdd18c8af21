// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `outcome-ledger`.
///
/// Unknown or unexpected failures always result in exit code 1.
pub enum LedgerExitCode {}

impl LedgerExitCode {
    /// No errors occurred and no merged result is a failure.
    pub const OK: i32 = 0;

    /// At least one merged result is `Failed`.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// A user issue happened while setting up: a bad config file, or an input
    /// file that could not be read.
    pub const SETUP_ERROR: i32 = 96;

    /// A result document or test tree could not be parsed.
    pub const INPUT_PARSE_FAILED: i32 = 97;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
