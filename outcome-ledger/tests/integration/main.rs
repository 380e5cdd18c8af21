// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod fixtures;
mod reload;
mod rerun;
mod rollup;
