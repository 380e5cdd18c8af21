// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use outcome_ledger::{
    events::RunEvent,
    manager::ResultManager,
    outcome::{Label, Outcome, Status},
    summary::ResultCounts,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use test_case::test_case;

fn status_of(manager: &ResultManager, id: &str) -> Status {
    manager
        .get_result_for_test(id)
        .unwrap_or_else(|| panic!("result for {id} exists"))
        .outcome()
        .status()
}

#[test]
fn full_run_fills_in_names_from_tree() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    manager.handle_event(RunEvent::TreeLoaded);
    replay(&mut manager, &tree, FULL_RUN);

    assert_eq!(manager.len(), 6);
    assert!(!manager.is_run_in_progress());
    assert_eq!(manager.results_in_run(), 6);

    let test_b = manager.get_result_for_test("3").expect("TestB has a result");
    assert_eq!(test_b.full_name(), "Assembly.Folder1.TestB");
    assert_eq!(
        test_b.outcome(),
        &Outcome::with_label(Status::Failed, Some(Label::Other("Error".into())))
    );
    assert_eq!(test_b.duration(), Some(Duration::from_secs_f64(1.25)));
    assert!(test_b.is_latest_run());

    assert_eq!(
        manager.get_result_for_test("2").map(|r| r.full_name()),
        Some("Assembly.Folder1")
    );
    assert_eq!(
        manager.failed_tests().map(|r| r.id().as_str()).collect::<Vec<_>>(),
        vec!["1", "2", "3"]
    );
}

#[test_case(r#"<test-case id="3" result="Passed" duration="0.25" />"#, Status::Failed; "pass after failure keeps failure")]
#[test_case(r#"<test-case id="4" result="Passed" />"#, Status::Skipped; "pass after ignored keeps ignored")]
#[test_case(r#"<test-case id="5" result="Inconclusive" />"#, Status::Passed; "inconclusive after pass keeps pass")]
#[test_case(r#"<test-case id="5" result="Failed" />"#, Status::Failed; "failure after pass is taken")]
#[test_case(r#"<test-case id="6" result="Skipped" label="Ignored" />"#, Status::Warning; "ignored after warning keeps warning")]
#[test_case(r#"<test-case id="5" result="Skipped" label="Explicit" />"#, Status::Passed; "explicit skip keeps stored outcome")]
fn partial_rerun_merges(rerun: &str, expected: Status) {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);
    replay(&mut manager, &tree, rerun);

    let id = outcome_ledger::report::parse_fragment(rerun)
        .expect("fragment is valid")
        .identity()
        .clone();
    let record = manager.get_result_for_test(id.as_str()).expect("result exists");
    assert_eq!(record.outcome().status(), expected);
    assert!(record.is_latest_run(), "rerun result is part of the latest run");

    let counts = ResultCounts::from_manager(&manager);
    assert_eq!(counts.total(), 6);
    assert_eq!(counts.stale, 5, "everything not rerun is stale");
}

#[test]
fn second_result_in_same_run_overwrites() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);

    manager.handle_event(RunEvent::RunStarting);
    manager.handle_event(RunEvent::TestFinished {
        record: outcome_ledger::record::ResultRecord::new(
            "3",
            "Assembly.Folder1.TestB",
            Outcome::passed(),
        ),
    });
    assert_eq!(status_of(&manager, "3"), Status::Failed);

    // Now latest: a later report in the same run replaces it outright.
    manager.handle_event(RunEvent::TestFinished {
        record: outcome_ledger::record::ResultRecord::new(
            "3",
            "Assembly.Folder1.TestB",
            Outcome::passed(),
        ),
    });
    assert_eq!(status_of(&manager, "3"), Status::Passed);
    manager.handle_event(RunEvent::RunFinished);
}

#[test]
fn clearing_forgets_everything() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);

    manager.handle_event(RunEvent::ResultsCleared);
    assert!(manager.is_empty());
    for id in ["1", "2", "3", "4", "5", "6"] {
        assert_eq!(manager.get_result_for_test(id), None);
    }
}
