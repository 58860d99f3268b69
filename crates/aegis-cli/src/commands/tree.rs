use anyhow::Context;
use serde::Serialize;

use aegis_core::snapshot::FrameworkDocument;
use aegis_snapshot::TreeOrigin;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct TreeOutput {
    origin: TreeOrigin,
    depth: usize,
    framework: FrameworkDocument,
}

/// Handle `aegis tree`.
pub async fn handle(code: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let read = ctx
        .engine
        .reader()
        .read(code)
        .await
        .with_context(|| format!("failed to read framework tree {code}"))?;
    output(
        &TreeOutput {
            origin: read.origin,
            depth: read.tree.depth(),
            framework: read.tree.to_document(),
        },
        flags.format,
    )
}
