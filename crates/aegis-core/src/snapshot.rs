//! Snapshot wire documents.
//!
//! This is the exact JSON shape exchanged between the snapshot builder, the
//! object-store cache, and the tree reader. Field names are camelCase; nested
//! clauses and controls are inline and already in canonical order (clauses by
//! `sortOrder`, controls by `number`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Clause, Control, Framework};
use crate::enums::FrameworkStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkDocument {
    pub id: String,
    pub code: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub status: FrameworkStatus,
    pub clauses: Vec<ClauseDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClauseDocument {
    pub id: String,
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub is_annex: bool,
    pub sort_order: i64,
    pub controls: Vec<ControlDocument>,
    pub children: Vec<ClauseDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ControlDocument {
    pub id: String,
    pub number: String,
    pub title: String,
    pub category: Option<String>,
    pub objective: Option<String>,
    pub guidance: Option<String>,
}

impl FrameworkDocument {
    /// Document header for `framework`, with no clauses yet.
    #[must_use]
    pub fn header(framework: &Framework) -> Self {
        Self {
            id: framework.id.clone(),
            code: framework.code.clone(),
            name: framework.name.clone(),
            version: framework.version.clone(),
            description: framework.description.clone(),
            status: framework.status,
            clauses: Vec::new(),
        }
    }

    /// Total number of clauses at every depth.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.iter().map(ClauseDocument::clause_count).sum()
    }

    /// Total number of controls at every depth.
    #[must_use]
    pub fn control_count(&self) -> usize {
        self.clauses.iter().map(ClauseDocument::control_count).sum()
    }
}

impl ClauseDocument {
    /// Assemble a clause from its row plus already-ordered controls and children.
    #[must_use]
    pub fn assemble(
        clause: &Clause,
        controls: Vec<ControlDocument>,
        children: Vec<Self>,
    ) -> Self {
        Self {
            id: clause.id.clone(),
            number: clause.number.clone(),
            title: clause.title.clone(),
            description: clause.description.clone(),
            is_annex: clause.is_annex,
            sort_order: clause.sort_order,
            controls,
            children,
        }
    }

    fn clause_count(&self) -> usize {
        1 + self.children.iter().map(Self::clause_count).sum::<usize>()
    }

    fn control_count(&self) -> usize {
        self.controls.len() + self.children.iter().map(Self::control_count).sum::<usize>()
    }
}

impl From<&Control> for ControlDocument {
    fn from(control: &Control) -> Self {
        Self {
            id: control.id.clone(),
            number: control.number.clone(),
            title: control.title.clone(),
            category: control.category.clone(),
            objective: control.objective.clone(),
            guidance: control.guidance.clone(),
        }
    }
}
