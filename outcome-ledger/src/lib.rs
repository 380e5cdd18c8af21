// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Result bookkeeping for interactive test runners.
//!
//! A front end that runs a test assembly over and over (full runs, partial
//! reruns, reloads after recompilation) needs one consistent answer to "what
//! happened to test X". This crate provides it:
//!
//! * [`outcome`] and [`ranking`]: the status model and the single precedence
//!   ranking used to pick the more significant of two outcomes.
//! * [`manager`]: the [`ResultManager`](manager::ResultManager), which merges
//!   results from successive runs and remaps them across reloads.
//! * [`report`] and [`tree`]: the result-report format and the test tree that
//!   the manager consults during reloads.
//!
//! For the run lifecycle expressed as a stream of events, see [`events`].

pub mod config;
pub mod errors;
pub mod events;
pub mod manager;
pub mod outcome;
pub mod ranking;
pub mod record;
pub mod report;
pub mod shared;
pub mod summary;
pub mod tree;
