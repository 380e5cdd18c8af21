// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ReportFragment, parse_duration};
use crate::{
    errors::ReportParseError,
    outcome::{Label, Outcome, Status},
    record::{NodeKind, TestId},
};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

/// Parses the first `test-case` or `test-suite` element in `input`.
///
/// Anything after the start of that element is not read.
pub fn parse_fragment(input: &str) -> Result<ReportFragment, ReportParseError> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    loop {
        let event = reader.read_event().map_err(|error| ReportParseError::Xml {
            position: reader.buffer_position(),
            error,
        })?;
        match event {
            Event::Start(e) | Event::Empty(e) => {
                if let Some(kind) = node_kind(&e) {
                    return fragment_from_element(kind, &e, reader.buffer_position());
                }
            }
            Event::Eof => return Err(ReportParseError::NoFragment),
            _ => {}
        }
    }
}

/// Parses every `test-case` and `test-suite` element in a result document.
///
/// Fragments are returned in completion order: a suite comes after
/// everything nested inside it. A document with no result elements yields an
/// empty list. A document that ends while a result element is still open is
/// rejected.
pub fn parse_document(input: &str) -> Result<Vec<ReportFragment>, ReportParseError> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    let mut fragments = Vec::new();
    // Elements whose end tag hasn't been seen yet.
    let mut open: Vec<ReportFragment> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|error| ReportParseError::Xml {
            position: reader.buffer_position(),
            error,
        })?;
        match event {
            Event::Start(e) => {
                if let Some(kind) = node_kind(&e) {
                    open.push(fragment_from_element(kind, &e, reader.buffer_position())?);
                }
            }
            Event::Empty(e) => {
                if let Some(kind) = node_kind(&e) {
                    fragments.push(fragment_from_element(kind, &e, reader.buffer_position())?);
                }
            }
            Event::End(e) => {
                if matches!(e.local_name().as_ref(), b"test-case" | b"test-suite") {
                    // End names are checked against start names by the
                    // reader, so this always pops the matching element.
                    fragments.extend(open.pop());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(ReportParseError::UnclosedElement {
            element: unclosed.kind().element_name().to_owned(),
            id: unclosed.identity().as_str().to_owned(),
        });
    }

    Ok(fragments)
}

fn node_kind(element: &BytesStart<'_>) -> Option<NodeKind> {
    match element.local_name().as_ref() {
        b"test-case" => Some(NodeKind::Case),
        b"test-suite" => Some(NodeKind::Suite),
        _ => None,
    }
}

fn fragment_from_element(
    kind: NodeKind,
    element: &BytesStart<'_>,
    position: usize,
) -> Result<ReportFragment, ReportParseError> {
    let element_name = kind.element_name();

    let mut id = None;
    let mut name = None;
    let mut full_name = None;
    let mut result = None;
    let mut label = None;
    let mut duration = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|error| ReportParseError::Attribute {
            element: element_name.to_owned(),
            error,
        })?;
        let value = attr
            .unescape_value()
            .map_err(|error| ReportParseError::Xml { position, error })?
            .into_owned();
        // Empty attributes are treated as absent.
        if value.is_empty() {
            continue;
        }
        match attr.key.local_name().as_ref() {
            b"id" => id = Some(value),
            b"name" => name = Some(value),
            b"fullname" => full_name = Some(value),
            b"result" => result = Some(value),
            b"label" => label = Some(value),
            b"duration" => duration = Some(value),
            _ => {}
        }
    }

    let has_id = id.is_some();
    let identity = match id.as_deref().or(full_name.as_deref()) {
        Some(identity) => TestId::new(identity),
        None => {
            return Err(ReportParseError::MissingIdentity {
                element: element_name.to_owned(),
            });
        }
    };

    let Some(result) = result else {
        return Err(ReportParseError::MissingResult {
            element: element_name.to_owned(),
            id: identity.as_str().to_owned(),
        });
    };
    let status: Status = result.parse().map_err(|error| ReportParseError::Status {
        element: element_name.to_owned(),
        id: identity.as_str().to_owned(),
        error,
    })?;

    let duration = duration
        .map(|duration| parse_duration(&duration))
        .transpose()
        .map_err(|error| ReportParseError::Duration {
            element: element_name.to_owned(),
            id: identity.as_str().to_owned(),
            error,
        })?;

    let label = label.as_deref().and_then(Label::from_report_value);

    Ok(ReportFragment {
        kind,
        identity,
        has_id,
        name,
        full_name,
        outcome: Outcome::with_label(status, label),
        duration,
    })
}
