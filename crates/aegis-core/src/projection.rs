//! Linear projection of a framework tree.
//!
//! [`flatten`] walks the tree in pre-order (a clause's controls before its
//! sub-clauses, each in canonical order) and emits one item per leaf: every
//! control, plus every clause that has neither controls nor sub-clauses. The
//! function is pure, so the same tree always yields the same sequence and
//! "item 14 of 80" refers to the same item on every request.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::entities::Locator;
use crate::tree::{FrameworkTree, Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Control,
    EmptyClause,
}

/// Leaf totals below a clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubtreeCounts {
    pub total: usize,
    pub assessed: usize,
}

/// One ancestor clause on an item's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crumb {
    pub clause_id: String,
    pub number: String,
    pub title: String,
    pub total: usize,
    pub assessed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedItem {
    pub index: usize,
    pub kind: ItemKind,
    pub locator: Locator,
    pub number: String,
    pub title: String,
    pub assessed: bool,
    pub breadcrumb: Vec<Crumb>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub items: Vec<ProjectedItem>,
    pub clause_counts: BTreeMap<String, SubtreeCounts>,
}

impl Projection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ProjectedItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn position_of(&self, locator: &Locator) -> Option<usize> {
        self.items.iter().position(|item| &item.locator == locator)
    }

    #[must_use]
    pub fn assessed(&self) -> usize {
        self.items.iter().filter(|item| item.assessed).count()
    }
}

/// Flatten with nothing counted as assessed.
#[must_use]
pub fn flatten(tree: &FrameworkTree) -> Projection {
    flatten_with(tree, &HashSet::new())
}

/// Flatten, marking items whose locator is in `assessed`.
#[must_use]
pub fn flatten_with(tree: &FrameworkTree, assessed: &HashSet<Locator>) -> Projection {
    let counts = subtree_counts(tree, assessed);

    let mut items = Vec::new();
    for (id, node) in tree.iter() {
        let kind = match node {
            Node::Control(_) => ItemKind::Control,
            Node::Clause(_) if tree.children(id).is_empty() => ItemKind::EmptyClause,
            Node::Clause(_) => continue,
        };
        let locator = node.locator();
        let breadcrumb = tree
            .ancestors(id)
            .into_iter()
            .map(|ancestor| {
                let n = tree.node(ancestor);
                let c = counts.get(&ancestor).copied().unwrap_or_default();
                Crumb {
                    clause_id: n.id().to_string(),
                    number: n.number().to_string(),
                    title: n.title().to_string(),
                    total: c.total,
                    assessed: c.assessed,
                }
            })
            .collect();
        items.push(ProjectedItem {
            index: items.len(),
            kind,
            assessed: assessed.contains(&locator),
            locator,
            number: node.number().to_string(),
            title: node.title().to_string(),
            breadcrumb,
        });
    }

    let clause_counts = counts
        .into_iter()
        .map(|(id, c)| (tree.node(id).id().to_string(), c))
        .collect();

    Projection {
        items,
        clause_counts,
    }
}

/// Leaf counts for every clause.
///
/// Children always have larger ids than their parent (pre-order), so one
/// reverse pass accumulates every subtree.
fn subtree_counts(
    tree: &FrameworkTree,
    assessed: &HashSet<Locator>,
) -> BTreeMap<NodeId, SubtreeCounts> {
    let mut counts: BTreeMap<NodeId, SubtreeCounts> = BTreeMap::new();
    let ids: Vec<NodeId> = tree.iter().map(|(id, _)| id).collect();

    for &id in ids.iter().rev() {
        let node = tree.node(id);
        let own = if node.is_control() || tree.children(id).is_empty() {
            SubtreeCounts {
                total: 1,
                assessed: usize::from(assessed.contains(&node.locator())),
            }
        } else {
            tree.children(id)
                .iter()
                .map(|child| counts.get(child).copied().unwrap_or_default())
                .fold(SubtreeCounts::default(), |acc, c| SubtreeCounts {
                    total: acc.total + c.total,
                    assessed: acc.assessed + c.assessed,
                })
        };
        counts.insert(id, own);
    }

    counts.retain(|id, _| !tree.node(*id).is_control());
    counts
}
