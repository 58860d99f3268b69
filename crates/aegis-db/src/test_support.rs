//! Shared test utilities for aegis-db unit tests.

pub(crate) mod helpers {
    use aegis_core::entities::{Assessment, Clause, Control, Framework};
    use aegis_core::enums::FrameworkStatus;

    use crate::AegisDb;
    use crate::repos::framework::{NewClause, NewControl, NewFramework};
    use crate::service::{AegisService, ResponsePolicy};

    /// In-memory service with the default response policy.
    pub async fn test_service() -> AegisService {
        test_service_with(ResponsePolicy::default()).await
    }

    pub async fn test_service_with(policy: ResponsePolicy) -> AegisService {
        let db = AegisDb::open_local(":memory:").await.unwrap();
        AegisService::from_db(db, policy)
    }

    pub async fn create_framework(svc: &AegisService, code: &str) -> Framework {
        svc.create_framework(&NewFramework {
            code: code.into(),
            name: format!("{code} framework"),
            version: "2022".into(),
            description: None,
        })
        .await
        .unwrap()
    }

    pub async fn create_published(svc: &AegisService, code: &str) -> Framework {
        let fw = create_framework(svc, code).await;
        svc.set_framework_status(&fw.id, FrameworkStatus::Published)
            .await
            .unwrap()
    }

    pub async fn create_clause(
        svc: &AegisService,
        framework_id: &str,
        parent_id: Option<&str>,
        number: &str,
        sort_order: i64,
    ) -> Clause {
        svc.create_clause(
            framework_id,
            &NewClause {
                parent_id: parent_id.map(String::from),
                number: number.into(),
                title: format!("Clause {number}"),
                description: None,
                is_annex: false,
                sort_order,
            },
        )
        .await
        .unwrap()
    }

    pub async fn create_control(svc: &AegisService, clause_id: &str, number: &str) -> Control {
        svc.create_control(
            clause_id,
            &NewControl {
                number: number.into(),
                title: format!("Control {number}"),
                category: None,
                objective: None,
                guidance: None,
            },
        )
        .await
        .unwrap()
    }

    /// Framework with one clause holding two controls, plus a NOT_STARTED assessment.
    pub async fn seeded_assessment(svc: &AegisService) -> (Assessment, Clause, Vec<Control>) {
        let fw = create_published(svc, "ISO27001").await;
        let clause = create_clause(svc, &fw.id, None, "5", 1).await;
        let a = create_control(svc, &clause.id, "5.1").await;
        let b = create_control(svc, &clause.id, "5.2").await;
        let assessment = svc
            .create_assessment("org-1", &fw.id, "FY26 readiness")
            .await
            .unwrap();
        (assessment, clause, vec![a, b])
    }
}
