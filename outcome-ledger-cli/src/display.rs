// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable rendering of records and summaries.

use crate::output::{RecordStyles, StderrStyles};
use outcome_ledger::{
    outcome::{Label, Outcome, Status},
    record::ResultRecord,
    summary::ResultCounts,
};
use owo_colors::{OwoColorize, Style};
use std::time::Duration;
use swrite::{SWrite, swrite};

/// Width of the status column.
const STATUS_WIDTH: usize = 9;

/// Writes one line per record.
pub(crate) fn write_records<'a>(
    records: impl IntoIterator<Item = &'a ResultRecord>,
    styles: &RecordStyles,
    out: &mut String,
) {
    for record in records {
        write_record(record, styles, out);
    }
}

fn write_record(record: &ResultRecord, styles: &RecordStyles, out: &mut String) {
    let outcome = record.outcome();
    let (tag, style) = status_tag(outcome, styles);
    swrite!(out, "{:>STATUS_WIDTH$} ", tag.style(style));
    swrite!(
        out,
        "{} ",
        format_duration(record.duration()).style(styles.duration)
    );
    swrite!(out, "{}", record.full_name());
    if let Some(Label::Other(label)) = outcome.label() {
        swrite!(out, " ({label})");
    }
    swrite!(out, " {}", format!("[id {}]", record.id()).style(styles.id));
    if !record.is_latest_run() {
        swrite!(out, " {}", "(stale)".style(styles.stale));
    }
    out.push('\n');
}

fn status_tag(outcome: &Outcome, styles: &RecordStyles) -> (&'static str, Style) {
    match (outcome.status(), outcome.label()) {
        (Status::Failed, _) => ("FAIL", styles.failed),
        (Status::Warning, _) => ("WARN", styles.warning),
        (Status::Passed, _) => ("PASS", styles.passed),
        (Status::Inconclusive, _) => ("INCONCL", styles.inconclusive),
        (Status::Skipped, Some(Label::Ignored)) => ("IGNORED", styles.skipped),
        (Status::Skipped, Some(Label::Explicit)) => ("EXPLICIT", styles.skipped),
        (Status::Skipped, _) => ("SKIP", styles.skipped),
    }
}

fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(duration) => format!("[{:>8.3}s]", duration.as_secs_f64()),
        None => format!("[{:>9}]", ""),
    }
}

/// Writes the closing summary line.
pub(crate) fn write_summary(counts: &ResultCounts, styles: &StderrStyles, out: &mut String) {
    swrite!(
        out,
        "{:>STATUS_WIDTH$} {} {}",
        "Summary".style(styles.bold),
        counts.total().style(styles.count),
        if counts.total() == 1 { "result" } else { "results" },
    );

    let categories = [
        (counts.passed, "passed"),
        (counts.failed, "failed"),
        (counts.warning, "warning"),
        (counts.inconclusive, "inconclusive"),
        (counts.ignored, "ignored"),
        (counts.explicit, "explicit"),
        (counts.skipped, "skipped"),
    ];
    let mut first = true;
    for (count, name) in categories {
        if count == 0 {
            continue;
        }
        out.push_str(if first { ": " } else { ", " });
        first = false;
        if name == "failed" {
            swrite!(out, "{} {}", count.style(styles.failed), name.style(styles.failed));
        } else {
            swrite!(out, "{} {name}", count.style(styles.count));
        }
    }

    if counts.stale > 0 {
        swrite!(out, "; {} stale", counts.stale.style(styles.count));
    }
    out.push('\n');
}
