// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize result records as a result document.

use crate::{errors::ReportWriteError, record::ResultRecord};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};
use std::io;

static RESULTS_TAG: &str = "test-results";

/// Writes `records` as a `test-results` document.
///
/// Each record becomes an empty `test-case` or `test-suite` element with the
/// same attributes [`parse_document`](super::parse_document) reads, so the
/// output can be fed back in.
pub fn serialize_records<'a>(
    records: impl IntoIterator<Item = &'a ResultRecord>,
    writer: impl io::Write,
) -> Result<(), ReportWriteError> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    writer.write_event(Event::Start(BytesStart::new(RESULTS_TAG)))?;
    for record in records {
        serialize_record(record, &mut writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(RESULTS_TAG)))?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

/// Writes `records` as a `test-results` document into a string.
pub fn records_to_string<'a>(
    records: impl IntoIterator<Item = &'a ResultRecord>,
) -> Result<String, ReportWriteError> {
    let mut buf: Vec<u8> = Vec::new();
    serialize_records(records, &mut buf)?;
    let s = String::from_utf8(buf).expect("serialized XML is valid UTF-8");
    Ok(s)
}

fn serialize_record(
    record: &ResultRecord,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let outcome = record.outcome();

    let mut tag = BytesStart::new(record.kind().element_name());
    tag.push_attribute(("id", record.id().as_str()));
    tag.push_attribute(("fullname", record.full_name()));
    tag.push_attribute(("result", outcome.status().as_str()));
    if let Some(label) = outcome.label() {
        tag.push_attribute(("label", label.as_str()));
    }
    if let Some(duration) = record.duration() {
        tag.push_attribute(("duration", serialize_duration(duration).as_str()));
    }

    writer.write_event(Event::Empty(tag))
}

// Shortest representation that reads back to the same value.
fn serialize_duration(duration: std::time::Duration) -> String {
    duration.as_secs_f64().to_string()
}
