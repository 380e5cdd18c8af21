// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use outcome_ledger::{
    manager::ResultManager,
    outcome::{Outcome, Status},
    record::TestId,
    shared::SharedResultManager,
    summary::{ResultCounts, group_outcome},
};
use pretty_assertions::assert_eq;

#[test]
fn group_rollup_uses_descendant_cases() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);

    let folder = tree.descendants(&TestId::new("2"));
    assert_eq!(folder, vec![TestId::new("3"), TestId::new("4")]);
    assert_eq!(
        group_outcome(&manager, &folder).map(|outcome| outcome.status()),
        Some(Status::Failed)
    );

    let passing = [TestId::new("5"), TestId::new("6")];
    assert_eq!(
        group_outcome(&manager, &passing).map(|outcome| outcome.status()),
        Some(Status::Warning)
    );

    assert_eq!(group_outcome(&manager, &[TestId::new("99")]), None);
}

#[test]
fn counts_after_full_run() {
    let tree = load_tree(EXPLORE);
    let mut manager = ResultManager::new();
    replay(&mut manager, &tree, FULL_RUN);

    assert_eq!(
        ResultCounts::from_manager(&manager),
        ResultCounts {
            failed: 3,
            warning: 1,
            ignored: 1,
            passed: 1,
            ..ResultCounts::default()
        }
    );
}

#[test]
fn shared_manager_across_threads() {
    let shared = SharedResultManager::default();
    shared.test_run_starting();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let shared = shared.clone();
            scope.spawn(move || {
                for n in 0..25 {
                    let id = format!("{worker}-{n}");
                    let outcome = if n % 5 == 0 {
                        Outcome::failed()
                    } else {
                        Outcome::passed()
                    };
                    shared.add_result(outcome_ledger::record::ResultRecord::new(
                        id.as_str(),
                        format!("Parallel.Test{id}"),
                        outcome,
                    ));
                }
            });
        }
    });

    let snapshot = shared.snapshot();
    let counts = ResultCounts::from_records(&snapshot);
    assert_eq!(counts.total(), 100);
    assert_eq!(counts.failed, 20);
    assert_eq!(counts.passed, 80);
}
