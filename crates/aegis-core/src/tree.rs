//! Arena representation of a framework's clause/control tree.
//!
//! Nodes live in a flat `Vec` addressed by [`NodeId`]; parent links and the
//! ordered child lists are side tables keyed by `NodeId`. There are no
//! references between nodes, so a tree is plain owned data that can be shared
//! behind an `Arc` across requests and threads.
//!
//! Node ids are assigned in pre-order: a clause, then its controls (by
//! number), then its child clauses (by sort order), recursively. Two trees
//! built from equal documents are therefore equal arena-for-arena.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::entities::Locator;
use crate::enums::FrameworkStatus;
use crate::snapshot::{ClauseDocument, ControlDocument, FrameworkDocument};

/// Index of a node inside a [`FrameworkTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseNode {
    pub id: String,
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub is_annex: bool,
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlNode {
    pub id: String,
    pub number: String,
    pub title: String,
    pub category: Option<String>,
    pub objective: Option<String>,
    pub guidance: Option<String>,
}

/// A tree node: either a clause or a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Clause(ClauseNode),
    Control(ControlNode),
}

impl Node {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Clause(c) => &c.id,
            Self::Control(c) => &c.id,
        }
    }

    #[must_use]
    pub fn number(&self) -> &str {
        match self {
            Self::Clause(c) => &c.number,
            Self::Control(c) => &c.number,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Clause(c) => &c.title,
            Self::Control(c) => &c.title,
        }
    }

    #[must_use]
    pub const fn as_clause(&self) -> Option<&ClauseNode> {
        match self {
            Self::Clause(c) => Some(c),
            Self::Control(_) => None,
        }
    }

    #[must_use]
    pub const fn is_control(&self) -> bool {
        matches!(self, Self::Control(_))
    }

    /// The response locator addressing this node.
    #[must_use]
    pub fn locator(&self) -> Locator {
        match self {
            Self::Clause(c) => Locator::Clause(c.id.clone()),
            Self::Control(c) => Locator::Control(c.id.clone()),
        }
    }
}

/// Framework-level fields carried alongside the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkHeader {
    pub id: String,
    pub code: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub status: FrameworkStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkTree {
    header: FrameworkHeader,
    nodes: Vec<Node>,
    parents: Vec<Option<NodeId>>,
    roots: Vec<NodeId>,
    /// Ordered children per clause: controls first, then sub-clauses.
    children: BTreeMap<NodeId, Vec<NodeId>>,
    clause_index: HashMap<String, NodeId>,
    control_index: HashMap<String, NodeId>,
}

impl FrameworkTree {
    /// Build the arena from a snapshot document.
    #[must_use]
    pub fn from_document(doc: &FrameworkDocument) -> Self {
        let mut tree = Self {
            header: FrameworkHeader {
                id: doc.id.clone(),
                code: doc.code.clone(),
                name: doc.name.clone(),
                version: doc.version.clone(),
                description: doc.description.clone(),
                status: doc.status,
            },
            nodes: Vec::new(),
            parents: Vec::new(),
            roots: Vec::new(),
            children: BTreeMap::new(),
            clause_index: HashMap::new(),
            control_index: HashMap::new(),
        };
        for clause in &doc.clauses {
            let id = tree.insert_clause(clause, None);
            tree.roots.push(id);
        }
        tree
    }

    fn push(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        match &node {
            Node::Clause(c) => self.clause_index.insert(c.id.clone(), id),
            Node::Control(c) => self.control_index.insert(c.id.clone(), id),
        };
        self.nodes.push(node);
        self.parents.push(parent);
        if let Some(parent) = parent {
            self.children.entry(parent).or_default().push(id);
        }
        id
    }

    fn insert_clause(&mut self, doc: &ClauseDocument, parent: Option<NodeId>) -> NodeId {
        let id = self.push(
            Node::Clause(ClauseNode {
                id: doc.id.clone(),
                number: doc.number.clone(),
                title: doc.title.clone(),
                description: doc.description.clone(),
                is_annex: doc.is_annex,
                sort_order: doc.sort_order,
            }),
            parent,
        );
        for control in &doc.controls {
            self.push(
                Node::Control(ControlNode {
                    id: control.id.clone(),
                    number: control.number.clone(),
                    title: control.title.clone(),
                    category: control.category.clone(),
                    objective: control.objective.clone(),
                    guidance: control.guidance.clone(),
                }),
                Some(id),
            );
        }
        for child in &doc.children {
            self.insert_clause(child, Some(id));
        }
        id
    }

    /// Convert back into the nested wire document.
    #[must_use]
    pub fn to_document(&self) -> FrameworkDocument {
        FrameworkDocument {
            id: self.header.id.clone(),
            code: self.header.code.clone(),
            name: self.header.name.clone(),
            version: self.header.version.clone(),
            description: self.header.description.clone(),
            status: self.header.status,
            clauses: self
                .roots
                .iter()
                .filter_map(|&id| self.clause_document(id))
                .collect(),
        }
    }

    fn clause_document(&self, id: NodeId) -> Option<ClauseDocument> {
        let clause = self.node(id).as_clause()?;
        let mut controls = Vec::new();
        let mut children = Vec::new();
        for &child in self.children(id) {
            match self.node(child) {
                Node::Control(c) => controls.push(ControlDocument {
                    id: c.id.clone(),
                    number: c.number.clone(),
                    title: c.title.clone(),
                    category: c.category.clone(),
                    objective: c.objective.clone(),
                    guidance: c.guidance.clone(),
                }),
                Node::Clause(_) => children.extend(self.clause_document(child)),
            }
        }
        Some(ClauseDocument {
            id: clause.id.clone(),
            number: clause.number.clone(),
            title: clause.title.clone(),
            description: clause.description.clone(),
            is_annex: clause.is_annex,
            sort_order: clause.sort_order,
            controls,
            children,
        })
    }

    #[must_use]
    pub const fn header(&self) -> &FrameworkHeader {
        &self.header
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.header.code
    }

    /// Root clauses in sort order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Ordered children of `id` (empty for controls and empty clauses).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// Ancestors of `id`, outermost first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            out.push(parent);
            cursor = self.parent(parent);
        }
        out.reverse();
        out
    }

    /// All node ids in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    #[must_use]
    pub fn find_clause(&self, clause_id: &str) -> Option<NodeId> {
        self.clause_index.get(clause_id).copied()
    }

    #[must_use]
    pub fn find_control(&self, control_id: &str) -> Option<NodeId> {
        self.control_index.get(control_id).copied()
    }

    /// Resolve a locator to a node. Requirement locators never resolve.
    #[must_use]
    pub fn resolve(&self, locator: &Locator) -> Option<NodeId> {
        match locator {
            Locator::Clause(id) => self.find_clause(id),
            Locator::Control(id) => self.find_control(id),
            Locator::Requirement(_) => None,
        }
    }

    /// The clause a locator belongs to: the clause itself, or a control's parent.
    #[must_use]
    pub fn owning_clause(&self, locator: &Locator) -> Option<NodeId> {
        match locator {
            Locator::Clause(id) => self.find_clause(id),
            Locator::Control(id) => self.find_control(id).and_then(|n| self.parent(n)),
            Locator::Requirement(_) => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clause_index.len()
    }

    #[must_use]
    pub fn control_count(&self) -> usize {
        self.control_index.len()
    }

    /// Deepest clause nesting level; a tree of only roots has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.iter()
            .filter(|(_, n)| !n.is_control())
            .map(|(id, _)| self.ancestors(id).len() + 1)
            .max()
            .unwrap_or(0)
    }
}
