// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use indoc::indoc;
use outcome_ledger::{
    config::FullNameFallback,
    events::RunEvent,
    manager::ResultManager,
    record::NodeKind,
    report::parse_document,
    tree::{TestLookup, TestTree},
};

/// The explore document of a small assembly.
pub(crate) static EXPLORE: &str = indoc! {r#"
    <test-run id="0" testcasecount="4">
      <test-suite type="Assembly" id="1" name="Assembly.dll" fullname="Assembly">
        <test-suite type="TestFixture" id="2" name="Folder1" fullname="Assembly.Folder1">
          <test-case id="3" name="TestB" fullname="Assembly.Folder1.TestB" />
          <test-case id="4" name="TestC" fullname="Assembly.Folder1.TestC" />
        </test-suite>
        <test-case id="5" name="TestA" fullname="Assembly.TestA" />
        <test-case id="6" name="Slow" fullname="Assembly.Slow" />
      </test-suite>
    </test-run>
"#};

/// The same assembly after a rebuild: ids are reassigned and `Assembly.Slow`
/// is gone.
pub(crate) static EXPLORE_AFTER_REBUILD: &str = indoc! {r#"
    <test-suite type="Assembly" id="1" name="Assembly.dll" fullname="Assembly">
      <test-case id="2" name="TestA" fullname="Assembly.TestA" />
      <test-suite type="TestFixture" id="3" name="Folder1" fullname="Assembly.Folder1">
        <test-case id="4" name="TestB" fullname="Assembly.Folder1.TestB" />
        <test-case id="5" name="TestC" fullname="Assembly.Folder1.TestC" />
        <test-case id="6" name="TestD" fullname="Assembly.Folder1.TestD" />
      </test-suite>
    </test-suite>
"#};

/// A full run. Result elements carry no full names, which come from the tree.
pub(crate) static FULL_RUN: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <test-run id="0" result="Failed">
      <test-suite id="1" result="Failed" duration="2.5">
        <test-suite id="2" result="Failed" duration="1.5">
          <test-case id="3" result="Failed" label="Error" duration="1.25" />
          <test-case id="4" result="Skipped" label="Ignored" />
        </test-suite>
        <test-case id="5" result="Passed" duration="0.5" />
        <test-case id="6" result="Warning" duration="0.5" />
      </test-suite>
    </test-run>
"#};

pub(crate) fn load_tree(input: &str) -> TestTree {
    TestTree::parse_explore(input).expect("explore document is valid")
}

/// Replays one result document as a run.
pub(crate) fn replay(manager: &mut ResultManager, tree: &TestTree, document: &str) {
    let fragments = parse_document(document).expect("result document is valid");
    manager.handle_event(RunEvent::RunStarting);
    for fragment in fragments {
        let kind = fragment.kind();
        let record = fragment.into_record(Some(tree as &dyn TestLookup), FullNameFallback::Tree);
        let event = match kind {
            NodeKind::Case => RunEvent::TestFinished { record },
            NodeKind::Suite => RunEvent::SuiteFinished { record },
        };
        manager.handle_event(event);
    }
    manager.handle_event(RunEvent::RunFinished);
}
