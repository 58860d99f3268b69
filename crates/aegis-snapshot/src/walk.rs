//! Depth-first clause walk shared by the builder and the reader fallback.
//!
//! Each level is fetched in canonical order (clauses by sort order, controls
//! by number), a clause's controls and children are assembled before the
//! clause itself, and any clause reached twice aborts the walk. Below the
//! depth limit a walk either drops clauses (counting them) or, when strict,
//! fails.

use std::collections::HashSet;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use aegis_core::entities::{Clause, Framework};
use aegis_core::snapshot::{ClauseDocument, ControlDocument, FrameworkDocument};

use crate::error::SnapshotError;
use crate::source::ContentSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walker {
    max_depth: usize,
    strict: bool,
}

/// A walked document and the number of clauses left out below the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    pub document: FrameworkDocument,
    pub dropped: usize,
}

#[derive(Default)]
struct WalkState {
    visited: HashSet<String>,
    dropped: usize,
}

impl Walker {
    /// Walk every level.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
            strict: false,
        }
    }

    /// Walk at most `max_depth` clause levels (roots are level 1).
    ///
    /// Root clauses are always kept, so a limit of 0 behaves as 1.
    #[must_use]
    pub const fn bounded(max_depth: usize) -> Self {
        Self {
            max_depth: if max_depth == 0 { 1 } else { max_depth },
            strict: false,
        }
    }

    /// Fail with `SnapshotError::TooDeep` instead of dropping clauses below
    /// the limit.
    #[must_use]
    pub const fn strict(self) -> Self {
        Self {
            strict: true,
            ..self
        }
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Assemble the document for `framework` from `source`.
    ///
    /// # Errors
    ///
    /// See [`Walker::walk`].
    pub async fn document<S: ContentSource>(
        &self,
        source: &S,
        framework: &Framework,
    ) -> Result<FrameworkDocument, SnapshotError> {
        Ok(self.walk(source, framework).await?.document)
    }

    /// Assemble the document and count every clause dropped below the limit.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Database` if any query fails,
    /// `SnapshotError::CycleDetected` if a clause is reached twice, and
    /// `SnapshotError::TooDeep` when a strict walk reaches past the limit.
    /// Nothing partial is returned.
    pub async fn walk<S: ContentSource>(
        &self,
        source: &S,
        framework: &Framework,
    ) -> Result<Walk, SnapshotError> {
        let mut state = WalkState::default();
        let clauses = self.level(source, framework, None, 1, &mut state).await?;

        if state.dropped > 0 {
            tracing::warn!(
                code = %framework.code,
                max_depth = self.max_depth,
                dropped = state.dropped,
                "clause tree deeper than walk limit; deeper clauses dropped"
            );
        }

        Ok(Walk {
            document: FrameworkDocument {
                clauses,
                ..FrameworkDocument::header(framework)
            },
            dropped: state.dropped,
        })
    }

    fn level<'a, S: ContentSource>(
        &'a self,
        source: &'a S,
        framework: &'a Framework,
        parent_id: Option<String>,
        depth: usize,
        state: &'a mut WalkState,
    ) -> LocalBoxFuture<'a, Result<Vec<ClauseDocument>, SnapshotError>> {
        async move {
            let rows = source.clauses(&framework.id, parent_id.as_deref()).await?;
            let mut out = Vec::with_capacity(rows.len());

            for clause in rows {
                if !state.visited.insert(clause.id.clone()) {
                    return Err(SnapshotError::CycleDetected {
                        clause_id: clause.id,
                    });
                }

                let controls: Vec<ControlDocument> = source
                    .controls(&clause.id)
                    .await?
                    .iter()
                    .map(ControlDocument::from)
                    .collect();

                let children = if depth < self.max_depth {
                    self.level(source, framework, Some(clause.id.clone()), depth + 1, state)
                        .await?
                } else {
                    let below = source.clauses(&framework.id, Some(&clause.id)).await?;
                    if !below.is_empty() && self.strict {
                        return Err(SnapshotError::TooDeep {
                            code: framework.code.clone(),
                            max_depth: self.max_depth,
                        });
                    }
                    let dropped = count_subtree(source, &framework.id, below, state).await?;
                    state.dropped += dropped;
                    Vec::new()
                };

                out.push(ClauseDocument::assemble(&clause, controls, children));
            }
            Ok(out)
        }
        .boxed_local()
    }
}

/// Number of clauses in `rows` and everything below them.
fn count_subtree<'a, S: ContentSource>(
    source: &'a S,
    framework_id: &'a str,
    rows: Vec<Clause>,
    state: &'a mut WalkState,
) -> LocalBoxFuture<'a, Result<usize, SnapshotError>> {
    async move {
        let mut count = 0;
        for clause in rows {
            if !state.visited.insert(clause.id.clone()) {
                return Err(SnapshotError::CycleDetected {
                    clause_id: clause.id,
                });
            }
            let below = source.clauses(framework_id, Some(&clause.id)).await?;
            count += 1 + count_subtree(source, framework_id, below, state).await?;
        }
        Ok(count)
    }
    .boxed_local()
}
