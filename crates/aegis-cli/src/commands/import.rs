use anyhow::Context;
use serde::Serialize;

use aegis_db::repos::import::{FrameworkImport, ImportReport};
use aegis_snapshot::PublishReport;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportOutput {
    #[serde(flatten)]
    import: ImportReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<PublishReport>,
}

/// Handle `aegis import`.
pub async fn handle(args: &ImportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file))?;
    let input: FrameworkImport = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse framework document {}", args.file))?;

    let import = ctx
        .service
        .import_framework(&input)
        .await
        .with_context(|| format!("failed to import framework {}", input.code))?;

    let snapshot = if args.publish {
        let report = ctx
            .builder
            .publish(&import.framework.code)
            .await
            .with_context(|| format!("imported {} but publishing failed", import.framework.code))?;
        Some(report)
    } else {
        None
    };

    output(&ImportOutput { import, snapshot }, flags.format)
}
