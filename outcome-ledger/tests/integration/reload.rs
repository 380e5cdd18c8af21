// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use outcome_ledger::{
    config::{LedgerConfig, ResultsConfig},
    events::RunEvent,
    manager::ResultManager,
    outcome::Status,
    report::{parse_document, records_to_string},
};
use pretty_assertions::assert_eq;

#[test]
fn reload_moves_results_to_new_ids() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);

    let reloaded = load_tree(EXPLORE_AFTER_REBUILD);
    manager.handle_event(RunEvent::TreeReloaded { tree: &reloaded });

    let by_id: Vec<_> = manager
        .iter()
        .map(|record| {
            (
                record.id().as_str(),
                record.full_name(),
                record.outcome().status(),
                record.is_latest_run(),
            )
        })
        .collect();
    assert_eq!(
        by_id,
        vec![
            ("1", "Assembly", Status::Failed, false),
            ("2", "Assembly.TestA", Status::Passed, false),
            ("3", "Assembly.Folder1", Status::Failed, false),
            ("4", "Assembly.Folder1.TestB", Status::Failed, false),
            ("5", "Assembly.Folder1.TestC", Status::Skipped, false),
        ],
        "Assembly.Slow is dropped and TestD has no result yet"
    );
}

#[test]
fn rerun_after_reload_merges_with_remapped_results() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);

    let reloaded = load_tree(EXPLORE_AFTER_REBUILD);
    manager.handle_event(RunEvent::TreeReloaded { tree: &reloaded });
    replay(
        &mut manager,
        &reloaded,
        r#"<test-case id="4" result="Passed" /><test-case id="6" result="Passed" />"#,
    );

    let test_b = manager.get_result_for_test("4").expect("TestB was remapped");
    assert_eq!(test_b.full_name(), "Assembly.Folder1.TestB");
    assert_eq!(test_b.outcome().status(), Status::Failed);
    assert!(test_b.is_latest_run());

    let test_d = manager.get_result_for_test("6").expect("TestD is new");
    assert_eq!(test_d.full_name(), "Assembly.Folder1.TestD");
    assert_eq!(test_d.outcome().status(), Status::Passed);
}

#[test]
fn clear_on_reload_discards_results() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::with_config(&ResultsConfig {
        clear_on_reload: true,
        ..LedgerConfig::defaults().results
    });
    replay(&mut manager, &tree, FULL_RUN);

    let reloaded = load_tree(EXPLORE_AFTER_REBUILD);
    manager.handle_event(RunEvent::TreeReloaded { tree: &reloaded });
    assert!(manager.is_empty());
}

#[test]
fn saved_results_replay_into_fresh_manager() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);

    let saved = records_to_string(manager.iter()).expect("records serialize");
    assert_eq!(parse_document(&saved).expect("saved document parses").len(), 6);

    let mut restored = ResultManager::new();
    replay(&mut restored, &tree, &saved);
    let original: Vec<_> = manager.iter().collect();
    let restored: Vec<_> = restored.iter().collect();
    assert_eq!(original, restored);
}
