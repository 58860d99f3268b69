use anyhow::Context;

use aegis_core::projection::flatten;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `aegis flatten`.
pub async fn handle(code: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tree = ctx
        .engine
        .reader()
        .get_tree(code)
        .await
        .with_context(|| format!("failed to read framework tree {code}"))?;
    output(&flatten(&tree), flags.format)
}
