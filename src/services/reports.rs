// src/services/reports.rs

//! Citizen report service.
//!
//! Lists already-filed reports and runs the submission workflow:
//! `Idle -> Validating -> Submitting -> {Success, Failed}`. Validation is
//! local and reaches the network only when it passes. The busy flag is the
//! single re-entrancy guard: submitting while a submission is in flight is
//! a no-op. A successful submission clears the draft; a failed one leaves
//! it untouched for correction and resubmission.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::error::{AppError, Result};
use crate::models::{DepartmentOption, ReportDraft, SessionContext, SubmittedReport};
use crate::utils::endpoint;
use crate::utils::http::{get_json, server_message};

/// Submission lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

/// Result of a submit call that was accepted for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server acknowledged the report; the draft has been cleared.
    Submitted { message: Option<String> },
    /// A submission was already in flight; nothing was sent.
    AlreadyInFlight,
}

/// The report screen's remote operations.
pub struct ReportWorkflow {
    client: Client,
    base_url: String,
    busy: AtomicBool,
    state: Mutex<SubmissionState>,
}

impl ReportWorkflow {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            busy: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    /// Current workflow state.
    pub fn state(&self) -> SubmissionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SubmissionState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Fetch the reports already filed within an organizational context.
    pub async fn list_for_context(&self, party_id: i64) -> Result<Vec<SubmittedReport>> {
        let url = endpoint(&self.base_url, &format!("api/reportes/partido/{party_id}"))?;
        get_json(&self.client, url).await
    }

    /// Scalar multipart fields for a draft.
    ///
    /// The draft must already be validated; a missing location here is a
    /// programming error reported as validation failure rather than a
    /// panic.
    fn text_fields(
        session: &SessionContext,
        draft: &ReportDraft,
        reported_at: &str,
    ) -> Result<Vec<(&'static str, String)>> {
        let location = draft
            .location
            .ok_or_else(|| AppError::validation("location is required"))?;
        Ok(vec![
            ("id_usuario", session.user_id.to_string()),
            ("titulo", draft.title.clone()),
            ("descripcion", draft.description.clone()),
            ("id_dependencia", draft.department_id.clone()),
            ("fecha_reporte", reported_at.to_string()),
            ("latitud", location.latitude.to_string()),
            ("longitud", location.longitude.to_string()),
        ])
    }

    /// Submit the draft.
    ///
    /// Exactly one submission may be in flight; later calls return
    /// [`SubmitOutcome::AlreadyInFlight`] untouched. Errors follow the
    /// draft-preservation policy described on the module.
    pub async fn submit(
        &self,
        session: &SessionContext,
        draft: &mut ReportDraft,
        departments: &[DepartmentOption],
    ) -> Result<SubmitOutcome> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Ok(SubmitOutcome::AlreadyInFlight);
        }

        let result = self.submit_inner(session, draft, departments).await;
        self.busy.store(false, Ordering::SeqCst);

        self.set_state(match &result {
            Ok(SubmitOutcome::Submitted { .. }) => SubmissionState::Success,
            Ok(SubmitOutcome::AlreadyInFlight) => self.state(),
            // Validation failures return to the open form without a round
            // trip; everything else reached the network and failed.
            Err(AppError::Validation(_)) => SubmissionState::Idle,
            Err(_) => SubmissionState::Failed,
        });

        result
    }

    async fn submit_inner(
        &self,
        session: &SessionContext,
        draft: &mut ReportDraft,
        departments: &[DepartmentOption],
    ) -> Result<SubmitOutcome> {
        self.set_state(SubmissionState::Validating);
        draft.validate(departments)?;

        self.set_state(SubmissionState::Submitting);
        let reported_at = Utc::now().format("%Y-%m-%d").to_string();

        let mut form = Form::new();
        for (name, value) in Self::text_fields(session, draft, &reported_at)? {
            form = form.text(name, value);
        }

        if let Some(path) = &draft.photo {
            let bytes = tokio::fs::read(path).await?;
            let (file_name, mime) = ReportDraft::photo_parts(path);
            let part = Part::bytes(bytes).file_name(file_name).mime_str(&mime)?;
            form = form.part("imagen", part);
        }

        let url = endpoint(&self.base_url, "api/reportes/crear")?;
        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| server_message(&body))
                .unwrap_or_else(|| "could not create the report".to_string());
            return Err(AppError::rejected(status.as_u16(), message));
        }

        // Acknowledgement requires a decodable body, not just a 2xx.
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::parse("report submission", e))?;

        draft.clear();
        Ok(SubmitOutcome::Submitted {
            message: server_message(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use crate::utils::http::testing::spawn_one_shot;
    use tempfile::TempDir;

    fn session() -> SessionContext {
        SessionContext {
            user_id: 42,
            party_id: 7,
            first_name: "María".into(),
            paternal_surname: "López".into(),
            maternal_surname: String::new(),
            phone: "5512345678".into(),
            avatar_url: String::new(),
        }
    }

    fn draft() -> ReportDraft {
        ReportDraft {
            title: "Pothole".into(),
            description: "Large pothole".into(),
            department_id: "3".into(),
            photo: None,
            location: Some(Coordinates {
                latitude: 19.4,
                longitude: -99.1,
            }),
        }
    }

    fn offline_workflow() -> ReportWorkflow {
        ReportWorkflow::new(Client::new(), "http://127.0.0.1:1")
    }

    #[test]
    fn test_text_fields_cover_the_wire_contract() {
        let fields = ReportWorkflow::text_fields(&session(), &draft(), "2026-08-07").unwrap();
        let get = |name: &str| {
            fields
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("id_usuario"), Some("42"));
        assert_eq!(get("titulo"), Some("Pothole"));
        assert_eq!(get("descripcion"), Some("Large pothole"));
        assert_eq!(get("id_dependencia"), Some("3"));
        assert_eq!(get("fecha_reporte"), Some("2026-08-07"));
        assert_eq!(get("latitud"), Some("19.4"));
        assert_eq!(get("longitud"), Some("-99.1"));
        assert_eq!(fields.len(), 7);
    }

    #[tokio::test]
    async fn test_validation_failure_issues_no_network_call() {
        let workflow = offline_workflow();
        let mut incomplete = draft();
        incomplete.title.clear();
        let before = incomplete.clone();

        // An unroutable base would turn any request into an HTTP error;
        // a validation error proves nothing was sent.
        let err = workflow
            .submit(&session(), &mut incomplete, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(incomplete, before);
        assert_eq!(workflow.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_submit_while_busy_is_a_no_op() {
        let workflow = offline_workflow();
        workflow.busy.store(true, Ordering::SeqCst);

        let outcome = workflow.submit(&session(), &mut draft(), &[]).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::AlreadyInFlight);
        // The in-flight submission still owns the flag.
        assert!(workflow.busy.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_successful_submission_clears_draft() {
        let (base, server) =
            spawn_one_shot("200 OK", r#"{"message":"Reporte creado exitosamente."}"#.into()).await;
        let workflow = ReportWorkflow::new(Client::new(), base);
        let mut d = draft();

        let outcome = workflow.submit(&session(), &mut d, &[]).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Submitted {
                message: Some("Reporte creado exitosamente.".into())
            }
        );
        assert_eq!(d, ReportDraft::default());
        assert_eq!(workflow.state(), SubmissionState::Success);

        let requests = server.await.unwrap();
        let request = String::from_utf8_lossy(&requests[0]).into_owned();
        assert!(request.starts_with("POST /api/reportes/crear"));
        assert!(request.contains("multipart/form-data"));
        for field in ["titulo", "descripcion", "id_dependencia", "latitud", "longitud"] {
            assert!(request.contains(&format!("name=\"{field}\"")), "{field} missing");
        }
        // No photo was attached
        assert!(!request.contains("name=\"imagen\""));
    }

    #[tokio::test]
    async fn test_failed_submission_preserves_draft() {
        let (base, _server) =
            spawn_one_shot("500 Internal Server Error", r#"{"message":"BD no disponible"}"#.into())
                .await;
        let workflow = ReportWorkflow::new(Client::new(), base);
        let mut d = draft();
        let before = d.clone();

        let err = workflow.submit(&session(), &mut d, &[]).await.unwrap_err();
        match err {
            AppError::Rejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "BD no disponible");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(d, before);
        assert_eq!(workflow.state(), SubmissionState::Failed);
    }

    #[tokio::test]
    async fn test_photo_attached_as_imagen_part() {
        let tmp = TempDir::new().unwrap();
        let photo = tmp.path().join("bache.jpeg");
        tokio::fs::write(&photo, b"fake jpeg bytes").await.unwrap();

        let (base, server) = spawn_one_shot("200 OK", "{}".into()).await;
        let workflow = ReportWorkflow::new(Client::new(), base);
        let mut d = draft();
        d.set_photo(&photo);

        workflow.submit(&session(), &mut d, &[]).await.unwrap();

        let requests = server.await.unwrap();
        let request = String::from_utf8_lossy(&requests[0]).into_owned();
        assert!(request.contains("name=\"imagen\""));
        assert!(request.contains("filename=\"bache.jpeg\""));
        assert!(request.contains("image/jpeg"));
        assert!(request.contains("fake jpeg bytes"));
    }

    #[tokio::test]
    async fn test_list_for_context() {
        let (base, server) = spawn_one_shot(
            "200 OK",
            r#"[{
                "titulo": "Bache",
                "descripcion": "Bache profundo",
                "foto": "https://cdn.example.com/bache.jpg",
                "fecha_reporte": "2026-08-01",
                "estatus": "pendiente",
                "dependencia": "Obras Públicas"
            }]"#
            .into(),
        )
        .await;

        let workflow = ReportWorkflow::new(Client::new(), base);
        let reports = workflow.list_for_context(7).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].title, "Bache");
        assert_eq!(reports[0].status, "pendiente");

        let requests = server.await.unwrap();
        assert!(String::from_utf8_lossy(&requests[0]).starts_with("GET /api/reportes/partido/7"));
    }
}
