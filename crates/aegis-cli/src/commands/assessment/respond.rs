use anyhow::Context;

use aegis_core::entities::Locator;
use aegis_core::fields::ResponseDraft;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Draft from CLI flags; status spelling is normalized to the wire form.
pub fn draft(
    status: &str,
    maturity: Option<i64>,
    gaps: Option<String>,
    recommendations: Option<String>,
    notes: Option<String>,
) -> ResponseDraft {
    ResponseDraft {
        compliance_status: status.trim().replace('-', "_").to_ascii_uppercase(),
        maturity_level: maturity,
        gaps,
        recommendations,
        notes,
    }
}

pub async fn run(
    assessment_id: &str,
    locator: &str,
    draft: ResponseDraft,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let locator = Locator::parse_key(locator)?;
    let saved = ctx
        .engine
        .save_draft(assessment_id, &locator, draft)
        .await
        .with_context(|| format!("failed to save response for {locator}"))?;
    output(&saved, flags.format)
}
