// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replay result documents through the outcome ledger and print the merged
//! view.
//!
//! ```text
//! outcome-ledger replay --tree explore.xml full-run.xml rerun.xml
//! ```
//!
//! Each run document is applied as one run: every result element becomes a
//! finished event, in the order a running engine would have reported it.

#![warn(missing_docs)]

mod dispatch;
mod display;
mod errors;
mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
pub use exit_codes::LedgerExitCode;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter};
