//! Assessment engine against an in-memory content store and snapshot cache.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use aegis_assess::{AssessError, AssessmentEngine};
use aegis_config::CacheConfig;
use aegis_core::entities::{Assessment, Locator};
use aegis_core::enums::{AssessmentStatus, ComplianceStatus};
use aegis_core::errors::CoreError;
use aegis_core::fields::{ResponseDraft, ResponseFields, ResponseFieldsBuilder};
use aegis_core::tree::FrameworkTree;
use aegis_db::repos::import::FrameworkImport;
use aegis_db::service::{AegisService, ResponsePolicy};
use aegis_snapshot::{SnapshotBuilder, SnapshotCache, TreeOrigin};

use ComplianceStatus::*;

const ISO: &str = r#"{
    "code": "ISO27001",
    "name": "ISO/IEC 27001",
    "version": "2022",
    "status": "PUBLISHED",
    "clauses": [
        {
            "number": "4",
            "title": "Context",
            "controls": [
                { "number": "4.1", "title": "Understanding the organization" },
                { "number": "4.2", "title": "Interested parties" }
            ]
        },
        {
            "number": "5",
            "title": "Leadership",
            "controls": [ { "number": "5.1", "title": "Leadership and commitment" } ],
            "children": [
                { "number": "5.3", "title": "Roles", "controls": [ { "number": "5.3.1", "title": "Assigned roles" } ] }
            ]
        },
        { "number": "A", "title": "Annex A", "isAnnex": true }
    ]
}"#;

struct Fixture {
    engine: AssessmentEngine,
    tree: FrameworkTree,
    assessment: Assessment,
}

impl Fixture {
    /// Locator of the clause or control with this number.
    fn at(&self, number: &str) -> Locator {
        self.tree
            .iter()
            .find(|(_, node)| node.number() == number)
            .map(|(_, node)| node.locator())
            .unwrap()
    }

    fn id(&self) -> &str {
        &self.assessment.id
    }

    async fn save(&self, number: &str, fields: ResponseFields) -> Assessment {
        self.engine
            .save_response(self.id(), &self.at(number), &fields)
            .await
            .unwrap()
            .assessment
    }
}

fn fields(status: ComplianceStatus) -> ResponseFields {
    ResponseFieldsBuilder::new(status).build()
}

fn rated(status: ComplianceStatus, level: u8) -> ResponseFields {
    ResponseFieldsBuilder::new(status).maturity(level).build()
}

async fn fixture_with(policy: ResponsePolicy, publish: bool) -> Fixture {
    let svc = AegisService::new_local(":memory:", policy).await.unwrap();
    let input: FrameworkImport = serde_json::from_str(ISO).unwrap();
    let report = svc.import_framework(&input).await.unwrap();
    let svc = Arc::new(svc);

    let cache = SnapshotCache::in_memory();
    if publish {
        SnapshotBuilder::new(Arc::clone(&svc), cache.clone(), &CacheConfig::default())
            .publish("ISO27001")
            .await
            .unwrap();
    }

    let engine = AssessmentEngine::new(svc, cache, &CacheConfig::default());
    let tree = engine.reader().get_tree("ISO27001").await.unwrap();
    let assessment = engine
        .create_assessment("org-1", &report.framework.id, "FY26 readiness")
        .await
        .unwrap();
    Fixture {
        engine,
        tree,
        assessment,
    }
}

async fn fixture() -> Fixture {
    fixture_with(ResponsePolicy::default(), true).await
}

fn core(err: &AssessError) -> &CoreError {
    err.as_core().unwrap()
}

#[tokio::test]
async fn completion_records_rounded_score() {
    let fx = fixture().await;
    fx.save("4.1", fields(Compliant)).await;
    fx.save("4.2", fields(Compliant)).await;
    fx.save("5.1", fields(NonCompliant)).await;
    fx.save("5.3.1", fields(NotAssessed)).await;

    assert_eq!(fx.engine.score_preview(fx.id()).await.unwrap(), Some(67));

    let done = fx.engine.complete_assessment(fx.id()).await.unwrap();
    assert_eq!(done.status, AssessmentStatus::Completed);
    assert_eq!(done.overall_score, Some(67));
    assert!(done.end_date.is_some());
}

#[tokio::test]
async fn all_not_assessed_cannot_complete() {
    let fx = fixture().await;
    fx.save("4.1", fields(NotAssessed)).await;
    fx.save("4.2", fields(NotAssessed)).await;

    let err = fx.engine.complete_assessment(fx.id()).await.unwrap_err();
    assert!(matches!(core(&err), CoreError::NoScoredResponses));
    assert_eq!(err.to_string(), "database error: cannot complete with no responses");

    let after = fx.engine.get_assessment(fx.id()).await.unwrap();
    assert_eq!(after.status, AssessmentStatus::InProgress);
    assert_eq!(after.overall_score, None);
    assert_eq!(after.end_date, None);
}

#[tokio::test]
async fn first_save_starts_once_and_overwrites_in_place() {
    let fx = fixture().await;
    assert_eq!(fx.assessment.status, AssessmentStatus::NotStarted);

    let first = fx.save("4.1", fields(NonCompliant)).await;
    assert_eq!(first.status, AssessmentStatus::InProgress);
    let started = first.start_date.unwrap();

    let second = fx.save("4.1", rated(Compliant, 4)).await;
    assert_eq!(second.start_date, Some(started));

    let responses = fx.engine.service().list_responses(fx.id()).await.unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].compliance_status, Compliant);
    assert_eq!(responses[0].maturity_level, Some(4));
}

#[tokio::test]
async fn concurrent_saves_to_one_locator_keep_one_row() {
    let fx = fixture().await;
    let locator = fx.at("5.1");
    let compliant = fields(Compliant);
    let partial = fields(PartiallyCompliant);
    let (a, b) = tokio::join!(
        fx.engine.save_response(fx.id(), &locator, &compliant),
        fx.engine.save_response(fx.id(), &locator, &partial),
    );
    a.unwrap();
    b.unwrap();

    let responses = fx.engine.service().list_responses(fx.id()).await.unwrap();
    assert_eq!(responses.len(), 1);
}

#[tokio::test]
async fn unknown_locator_and_bad_fields_are_reported_together() {
    let fx = fixture().await;
    let bad = ResponseFieldsBuilder::new(Compliant).maturity(7).build();

    let err = fx
        .engine
        .save_response(fx.id(), &Locator::Control("ctl-missing".into()), &bad)
        .await
        .unwrap_err();
    assert!(err.rejects_field("locator"));
    assert!(err.rejects_field("maturityLevel"));

    let responses = fx.engine.service().list_responses(fx.id()).await.unwrap();
    assert!(responses.is_empty());
    let after = fx.engine.get_assessment(fx.id()).await.unwrap();
    assert_eq!(after.status, AssessmentStatus::NotStarted);
}

#[tokio::test]
async fn control_from_another_framework_is_rejected() {
    let fx = fixture().await;
    let other: FrameworkImport = serde_json::from_str(
        r#"{ "code": "SOC2", "name": "SOC 2", "version": "2017",
             "clauses": [ { "number": "CC1", "title": "Control Environment",
                            "controls": [ { "number": "CC1.1", "title": "Integrity" } ] } ] }"#,
    )
    .unwrap();
    fx.engine.service().import_framework(&other).await.unwrap();
    let foreign = fx
        .engine
        .reader()
        .get_tree("SOC2")
        .await
        .unwrap()
        .iter()
        .find(|(_, node)| node.is_control())
        .map(|(_, node)| node.locator())
        .unwrap();

    let err = fx
        .engine
        .save_response(fx.id(), &foreign, &fields(Compliant))
        .await
        .unwrap_err();
    assert!(err.rejects_field("locator"));
}

#[tokio::test]
async fn requirement_locators_pass_through() {
    let fx = fixture().await;
    let saved = fx
        .engine
        .save_response(
            fx.id(),
            &Locator::Requirement("REQ-7.2".into()),
            &fields(PartiallyCompliant),
        )
        .await
        .unwrap();
    assert_eq!(saved.response.locator, Locator::Requirement("REQ-7.2".into()));
    assert_eq!(saved.assessment.status, AssessmentStatus::InProgress);
}

#[tokio::test]
async fn draft_errors_include_locator() {
    let fx = fixture().await;
    let draft = ResponseDraft {
        compliance_status: "MOSTLY".into(),
        maturity_level: Some(0),
        ..ResponseDraft::default()
    };

    let err = fx
        .engine
        .save_draft(fx.id(), &Locator::Clause("cls-nope".into()), draft)
        .await
        .unwrap_err();
    assert!(err.rejects_field("complianceStatus"));
    assert!(err.rejects_field("maturityLevel"));
    assert!(err.rejects_field("locator"));
}

#[tokio::test]
async fn valid_draft_is_saved() {
    let fx = fixture().await;
    let draft = ResponseDraft {
        compliance_status: "PARTIALLY_COMPLIANT".into(),
        maturity_level: Some(3),
        gaps: Some("No annual review".into()),
        ..ResponseDraft::default()
    };

    let saved = fx
        .engine
        .save_draft(fx.id(), &fx.at("4.2"), draft)
        .await
        .unwrap();
    assert_eq!(saved.response.compliance_status, PartiallyCompliant);
    assert_eq!(saved.response.maturity_level, Some(3));
    assert_eq!(saved.response.gaps.as_deref(), Some("No annual review"));
}

#[tokio::test]
async fn progress_counts_assessed_leaves() {
    let fx = fixture().await;
    fx.save("4.1", fields(Compliant)).await;
    fx.save("5.3.1", fields(NotAssessed)).await;
    fx.engine
        .save_response(
            fx.id(),
            &Locator::Requirement("REQ-1".into()),
            &fields(NonCompliant),
        )
        .await
        .unwrap();

    let progress = fx.engine.progress(fx.id()).await.unwrap();
    assert_eq!(progress.origin, TreeOrigin::Cache);
    assert_eq!(progress.framework_code, "ISO27001");
    assert_eq!(progress.total, 5);
    assert_eq!(progress.assessed, 1);
    assert_eq!(progress.percent_assessed(), 20);
    assert_eq!(progress.breakdown.compliant, 1);
    assert_eq!(progress.breakdown.non_compliant, 1);
    assert_eq!(progress.breakdown.not_assessed, 1);
    assert_eq!(progress.score_preview, Some(50));

    let numbers: Vec<&str> = progress
        .projection
        .items
        .iter()
        .map(|item| item.number.as_str())
        .collect();
    assert_eq!(numbers, vec!["4.1", "4.2", "5.1", "5.3.1", "A"]);

    let leadership = fx.at("5");
    let counts = progress.projection.clause_counts[leadership.id()];
    assert_eq!((counts.total, counts.assessed), (2, 0));
}

#[tokio::test]
async fn progress_without_snapshot_uses_fallback() {
    let fx = fixture_with(ResponsePolicy::default(), false).await;
    fx.save("A", fields(Compliant)).await;

    let progress = fx.engine.progress(fx.id()).await.unwrap();
    assert_eq!(progress.origin, TreeOrigin::Fallback);
    assert_eq!(progress.total, 5);
    assert_eq!(progress.assessed, 1);
}

#[tokio::test]
async fn maturity_report_groups_by_owning_clause() {
    let fx = fixture().await;
    fx.save("4.1", rated(Compliant, 4)).await;
    fx.save("4.2", rated(PartiallyCompliant, 3)).await;
    fx.save("5", rated(NonCompliant, 2)).await;
    fx.save("5.3.1", rated(Compliant, 5)).await;
    fx.save("5.1", fields(Compliant)).await;

    let report = fx.engine.maturity_report(fx.id()).await.unwrap();
    let got: Vec<(&str, f64, usize)> = report
        .clauses
        .iter()
        .map(|m| (m.number.as_str(), m.average, m.rated))
        .collect();
    assert_eq!(got, vec![("4", 3.5, 2), ("5", 2.0, 1), ("5.3", 5.0, 1)]);
}

#[tokio::test]
async fn completed_assessment_reopens_on_save() {
    let fx = fixture().await;
    fx.save("4.1", fields(Compliant)).await;
    fx.engine.complete_assessment(fx.id()).await.unwrap();

    let reopened = fx.save("4.2", fields(NonCompliant)).await;
    assert_eq!(reopened.status, AssessmentStatus::InProgress);
    assert_eq!(reopened.overall_score, Some(100));
    assert_eq!(reopened.end_date, None);

    let recompleted = fx.engine.complete_assessment(fx.id()).await.unwrap();
    assert_eq!(recompleted.overall_score, Some(50));
}

#[tokio::test]
async fn reopen_can_be_disabled() {
    let policy = ResponsePolicy {
        reopen_on_save: false,
        ..ResponsePolicy::default()
    };
    let fx = fixture_with(policy, true).await;
    fx.save("4.1", fields(Compliant)).await;
    fx.engine.complete_assessment(fx.id()).await.unwrap();

    let err = fx
        .engine
        .save_response(fx.id(), &fx.at("4.2"), &fields(Compliant))
        .await
        .unwrap_err();
    assert!(matches!(core(&err), CoreError::InvalidTransition { .. }));
}

#[tokio::test]
async fn archived_assessment_rejects_writes() {
    let fx = fixture().await;
    fx.save("4.1", fields(Compliant)).await;
    let archived = fx.engine.archive_assessment(fx.id()).await.unwrap();
    assert_eq!(archived.status, AssessmentStatus::Archived);

    let err = fx
        .engine
        .save_response(fx.id(), &fx.at("4.2"), &fields(Compliant))
        .await
        .unwrap_err();
    assert!(matches!(core(&err), CoreError::InvalidTransition { .. }));

    let err = fx.engine.complete_assessment(fx.id()).await.unwrap_err();
    assert!(matches!(core(&err), CoreError::InvalidTransition { .. }));

    let err = fx.engine.archive_assessment(fx.id()).await.unwrap_err();
    assert!(matches!(core(&err), CoreError::InvalidTransition { .. }));
}

#[tokio::test]
async fn overview_lists_responses_and_preview() {
    let fx = fixture().await;
    fx.save("4.1", fields(Compliant)).await;
    fx.save("4.2", fields(PartiallyCompliant)).await;

    let overview = fx.engine.overview(fx.id()).await.unwrap();
    assert_eq!(overview.framework_code, "ISO27001");
    assert_eq!(overview.responses.len(), 2);
    assert_eq!(overview.score_preview, Some(75));
    assert_eq!(overview.assessment.overall_score, None);
}

#[tokio::test]
async fn unknown_assessment_is_not_found() {
    let fx = fixture().await;
    assert!(fx.engine.score_preview("asm-missing").await.unwrap_err().is_not_found());
    assert!(fx.engine.progress("asm-missing").await.unwrap_err().is_not_found());
    let err = fx
        .engine
        .save_response("asm-missing", &fx.at("4.1"), &fields(Compliant))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
