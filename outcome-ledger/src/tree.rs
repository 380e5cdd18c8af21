// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The loaded test tree.
//!
//! The result manager never owns or mutates the tree. It only asks it two
//! questions, through [`TestLookup`]: what is the node with this id, and which
//! node has this full name.

use crate::{
    errors::TreeLoadError,
    record::{NodeKind, TestId},
};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::collections::{BTreeMap, btree_map::Entry};

/// Read access to a test tree, as needed by result bookkeeping.
pub trait TestLookup {
    /// Returns the node with the given id, if any.
    fn get_test_by_id(&self, id: &TestId) -> Option<&TestNode>;

    /// Returns the first node in tree order whose full name is `full_name`.
    fn find_by_full_name(&self, full_name: &str) -> Option<&TestNode>;

    /// Returns true if more than one node has the full name `full_name`.
    ///
    /// Used to warn when correlation by full name has to pick one of several
    /// candidates.
    fn is_full_name_ambiguous(&self, full_name: &str) -> bool {
        let _ = full_name;
        false
    }
}

/// A single test case or suite in a [`TestTree`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestNode {
    id: TestId,
    name: String,
    full_name: String,
    kind: NodeKind,
    parent: Option<TestId>,
    children: Vec<TestId>,
}

impl TestNode {
    /// The id assigned to this node by the current load.
    pub fn id(&self) -> &TestId {
        &self.id
    }

    /// The short name of the node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fully qualified name of the node.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Whether this node is a case or a suite.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The id of the enclosing suite, or `None` for a root.
    pub fn parent(&self) -> Option<&TestId> {
        self.parent.as_ref()
    }

    /// The ids of the direct children, in tree order.
    pub fn children(&self) -> &[TestId] {
        &self.children
    }
}

/// An in-memory test tree.
///
/// Nodes are kept in tree order (a pre-order walk of the document).
#[derive(Clone, Debug, Default)]
pub struct TestTree {
    nodes: Vec<TestNode>,
    by_id: BTreeMap<TestId, usize>,
    by_full_name: BTreeMap<String, Vec<usize>>,
}

impl TestTree {
    /// Builds a tree from an explore document: nested `test-suite` and
    /// `test-case` elements carrying `id`, `name` and `fullname`.
    ///
    /// Any other element, such as an enclosing `test-run`, is skipped.
    pub fn parse_explore(input: &str) -> Result<Self, TreeLoadError> {
        let mut reader = Reader::from_str(input);
        reader.trim_text(true);

        let mut tree = Self::default();
        // Indexes of the open suites (and cases with child elements).
        let mut open: Vec<usize> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|error| TreeLoadError::Xml {
                    position: reader.buffer_position(),
                    error,
                })?;
            match event {
                Event::Start(e) => {
                    if let Some(kind) = node_kind(&e) {
                        let node = NodeAttrs::from_element(kind, &e, reader.buffer_position())?;
                        let index = tree.push_node(node, open.last().copied())?;
                        open.push(index);
                    }
                }
                Event::Empty(e) => {
                    if let Some(kind) = node_kind(&e) {
                        let node = NodeAttrs::from_element(kind, &e, reader.buffer_position())?;
                        tree.push_node(node, open.last().copied())?;
                    }
                }
                Event::End(e) => {
                    if matches!(e.local_name().as_ref(), b"test-suite" | b"test-case") {
                        open.pop();
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&index) = open.last() {
            let node = &tree.nodes[index];
            return Err(TreeLoadError::UnclosedElement {
                element: node.kind.element_name().to_owned(),
                id: node.id.as_str().to_owned(),
            });
        }
        if tree.nodes.is_empty() {
            return Err(TreeLoadError::Empty);
        }
        Ok(tree)
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in tree order.
    pub fn iter(&self) -> impl Iterator<Item = &TestNode> + '_ {
        self.nodes.iter()
    }

    /// Returns the nodes that have no parent, in tree order.
    pub fn roots(&self) -> impl Iterator<Item = &TestNode> + '_ {
        self.nodes.iter().filter(|node| node.parent.is_none())
    }

    /// Returns the ids of all test cases at or below `id`, in tree order.
    ///
    /// Returns an empty list if `id` is not in the tree.
    pub fn descendants(&self, id: &TestId) -> Vec<TestId> {
        let Some(&start) = self.by_id.get(id) else {
            return Vec::new();
        };

        let mut cases = Vec::new();
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if node.kind == NodeKind::Case {
                cases.push(node.id.clone());
            }
            // Push in reverse so that children come off the stack in order.
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .filter_map(|child| self.by_id.get(child).copied()),
            );
        }
        cases
    }

    fn push_node(&mut self, attrs: NodeAttrs, parent: Option<usize>) -> Result<usize, TreeLoadError> {
        let index = self.nodes.len();
        match self.by_id.entry(attrs.id.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(index);
            }
            Entry::Occupied(_) => {
                return Err(TreeLoadError::DuplicateId {
                    id: attrs.id.as_str().to_owned(),
                });
            }
        }

        let parent_id = parent.map(|parent| {
            let parent = &mut self.nodes[parent];
            parent.children.push(attrs.id.clone());
            parent.id.clone()
        });

        self.by_full_name
            .entry(attrs.full_name.clone())
            .or_default()
            .push(index);
        self.nodes.push(TestNode {
            id: attrs.id,
            name: attrs.name,
            full_name: attrs.full_name,
            kind: attrs.kind,
            parent: parent_id,
            children: Vec::new(),
        });
        Ok(index)
    }
}

impl TestLookup for TestTree {
    fn get_test_by_id(&self, id: &TestId) -> Option<&TestNode> {
        self.by_id.get(id).map(|&index| &self.nodes[index])
    }

    fn find_by_full_name(&self, full_name: &str) -> Option<&TestNode> {
        self.by_full_name
            .get(full_name)
            .and_then(|indexes| indexes.first())
            .map(|&index| &self.nodes[index])
    }

    fn is_full_name_ambiguous(&self, full_name: &str) -> bool {
        self.by_full_name
            .get(full_name)
            .is_some_and(|indexes| indexes.len() > 1)
    }
}

/// Builds a [`TestTree`] in code.
///
/// Suites are opened with [`suite`](Self::suite) and closed with
/// [`end`](Self::end). Cases are added to the innermost open suite.
///
/// ```
/// use outcome_ledger::tree::{TestLookup, TestTreeBuilder};
///
/// let tree = TestTreeBuilder::new()
///     .suite("1", "Assembly", "Assembly")
///     .case("2", "TestA", "Assembly.TestA")
///     .end()
///     .build()
///     .unwrap();
/// assert_eq!(tree.find_by_full_name("Assembly.TestA").unwrap().id().as_str(), "2");
/// ```
#[derive(Debug, Default)]
pub struct TestTreeBuilder {
    tree: TestTree,
    open: Vec<usize>,
    error: Option<TreeLoadError>,
}

impl TestTreeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a suite.
    pub fn suite(mut self, id: &str, name: &str, full_name: &str) -> Self {
        if let Some(index) = self.add(NodeKind::Suite, id, name, full_name) {
            self.open.push(index);
        }
        self
    }

    /// Adds a test case to the innermost open suite.
    pub fn case(mut self, id: &str, name: &str, full_name: &str) -> Self {
        self.add(NodeKind::Case, id, name, full_name);
        self
    }

    /// Closes the innermost open suite.
    pub fn end(mut self) -> Self {
        self.open.pop();
        self
    }

    /// Finishes the tree. Suites still open are closed.
    ///
    /// Returns the first error encountered while adding nodes.
    pub fn build(self) -> Result<TestTree, TreeLoadError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.tree),
        }
    }

    fn add(&mut self, kind: NodeKind, id: &str, name: &str, full_name: &str) -> Option<usize> {
        if self.error.is_some() {
            return None;
        }
        let attrs = NodeAttrs {
            kind,
            id: TestId::new(id),
            name: name.to_owned(),
            full_name: full_name.to_owned(),
        };
        match self.tree.push_node(attrs, self.open.last().copied()) {
            Ok(index) => Some(index),
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }
}

struct NodeAttrs {
    kind: NodeKind,
    id: TestId,
    name: String,
    full_name: String,
}

impl NodeAttrs {
    fn from_element(
        kind: NodeKind,
        element: &BytesStart<'_>,
        position: usize,
    ) -> Result<Self, TreeLoadError> {
        let mut id = None;
        let mut name = None;
        let mut full_name = None;

        for attr in element.attributes() {
            let attr = attr.map_err(|error| TreeLoadError::Attribute {
                element: kind.element_name().to_owned(),
                error,
            })?;
            let value = attr
                .unescape_value()
                .map_err(|error| TreeLoadError::Xml { position, error })?;
            match attr.key.local_name().as_ref() {
                b"id" => id = Some(value.into_owned()),
                b"name" => name = Some(value.into_owned()),
                b"fullname" => full_name = Some(value.into_owned()),
                _ => {}
            }
        }

        let name = name.unwrap_or_default();
        let id = match id {
            Some(id) if !id.is_empty() => TestId::from(id),
            _ => {
                return Err(TreeLoadError::MissingId {
                    element: kind.element_name().to_owned(),
                    name,
                });
            }
        };
        // Nodes without a full name are identified by their short name.
        let full_name = full_name
            .filter(|full_name| !full_name.is_empty())
            .unwrap_or_else(|| name.clone());

        Ok(Self {
            kind,
            id,
            name,
            full_name,
        })
    }
}

fn node_kind(element: &BytesStart<'_>) -> Option<NodeKind> {
    match element.local_name().as_ref() {
        b"test-case" => Some(NodeKind::Case),
        b"test-suite" => Some(NodeKind::Suite),
        _ => None,
    }
}
