//! Relational content the snapshot walker reads from.

use std::sync::Arc;

use aegis_core::entities::{Clause, Control, Framework};
use aegis_core::enums::FrameworkStatus;
use aegis_db::error::DatabaseError;
use aegis_db::service::AegisService;

/// Ordered queries over the content store.
///
/// `clauses` returns direct children of `parent_id` (roots for `None`)
/// ordered by sort order; `controls` returns a clause's controls ordered by
/// number.
#[allow(async_fn_in_trait)]
pub trait ContentSource {
    async fn framework_by_code(&self, code: &str) -> Result<Option<Framework>, DatabaseError>;

    async fn published_frameworks(&self) -> Result<Vec<Framework>, DatabaseError>;

    async fn clauses(
        &self,
        framework_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Clause>, DatabaseError>;

    async fn controls(&self, clause_id: &str) -> Result<Vec<Control>, DatabaseError>;
}

impl ContentSource for AegisService {
    async fn framework_by_code(&self, code: &str) -> Result<Option<Framework>, DatabaseError> {
        Self::framework_by_code(self, code).await
    }

    async fn published_frameworks(&self) -> Result<Vec<Framework>, DatabaseError> {
        self.list_frameworks(Some(FrameworkStatus::Published)).await
    }

    async fn clauses(
        &self,
        framework_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Clause>, DatabaseError> {
        self.list_clauses(framework_id, parent_id).await
    }

    async fn controls(&self, clause_id: &str) -> Result<Vec<Control>, DatabaseError> {
        self.list_controls(clause_id).await
    }
}

impl<T: ContentSource> ContentSource for Arc<T> {
    async fn framework_by_code(&self, code: &str) -> Result<Option<Framework>, DatabaseError> {
        T::framework_by_code(self, code).await
    }

    async fn published_frameworks(&self) -> Result<Vec<Framework>, DatabaseError> {
        T::published_frameworks(self).await
    }

    async fn clauses(
        &self,
        framework_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Clause>, DatabaseError> {
        T::clauses(self, framework_id, parent_id).await
    }

    async fn controls(&self, clause_id: &str) -> Result<Vec<Control>, DatabaseError> {
        T::controls(self, clause_id).await
    }
}
