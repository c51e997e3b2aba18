//! Axum route handlers for the Relevance API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind, UNSUPPORTED_FORMAT_FEEDBACK};
use crate::scoring::combiner::{
    evaluate, evaluate_with_policy, Evaluation, FeedbackPolicy, RelevanceResult,
};
use crate::scoring::criteria::SkillCriteria;
use crate::scoring::feedback::action_plan;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub resume_text: String,
    /// Validated into `SkillCriteria`; non-string entries are rejected.
    pub skill_criteria: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub feedback_degraded: bool,
    pub result: RelevanceResult,
    /// One study step per missing skill. Empty when nothing is missing.
    pub action_plan: Vec<String>,
}

impl EvaluationResponse {
    fn new(evaluation_id: Uuid, evaluation: Evaluation) -> Self {
        Self {
            evaluation_id,
            evaluated_at: Utc::now(),
            feedback_degraded: evaluation.feedback_degraded,
            action_plan: action_plan(&evaluation.result.missing),
            result: evaluation.result,
        }
    }
}

struct UploadedFile {
    content_type: Option<String>,
    file_name: Option<String>,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/relevance/evaluate
///
/// Scores already-extracted resume text against a list of required skills.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let criteria = SkillCriteria::from_json_values(request.skill_criteria)?;
    let evaluation_id = Uuid::new_v4();

    let evaluation = run_evaluation(&state, &request.resume_text, &criteria)
        .instrument(info_span!("evaluation", %evaluation_id))
        .await?;

    Ok(Json(EvaluationResponse::new(evaluation_id, evaluation)))
}

/// POST /api/v1/relevance/upload
///
/// Multipart: `file` (PDF or DOCX) and `skill_criteria` (JSON array of strings).
/// Unreadable documents score zero; unsupported formats never reach the scorer.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationResponse>, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut raw_criteria: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                file = Some(UploadedFile {
                    content_type,
                    file_name,
                    data,
                });
            }
            Some("skill_criteria") => raw_criteria = Some(field.text().await?),
            _ => {}
        }
    }

    let raw_criteria = raw_criteria
        .ok_or_else(|| AppError::Validation("skill_criteria field is required".to_string()))?;
    let criteria = SkillCriteria::parse_json(&raw_criteria)?;
    let file = file.ok_or_else(|| AppError::Validation("file field is required".to_string()))?;

    let evaluation_id = Uuid::new_v4();
    let span = info_span!("evaluation", %evaluation_id);

    let kind = DocumentKind::detect(file.content_type.as_deref(), file.file_name.as_deref());
    let Some(kind) = kind else {
        span.in_scope(|| {
            info!(
                content_type = file.content_type.as_deref().unwrap_or("unknown"),
                "Unsupported resume format"
            )
        });
        let evaluation = Evaluation {
            result: RelevanceResult::no_text(&criteria, UNSUPPORTED_FORMAT_FEEDBACK),
            feedback_degraded: false,
        };
        return Ok(Json(EvaluationResponse::new(evaluation_id, evaluation)));
    };

    let evaluation = async {
        let resume_text = extract_text(file.data, kind).await;
        run_evaluation(&state, &resume_text, &criteria).await
    }
    .instrument(span)
    .await?;

    Ok(Json(EvaluationResponse::new(evaluation_id, evaluation)))
}

async fn run_evaluation(
    state: &AppState,
    resume_text: &str,
    criteria: &SkillCriteria,
) -> Result<Evaluation, AppError> {
    let embedder = state.embedder.as_ref();
    let generator = state.text_generator.as_ref();

    let evaluation = match state.feedback_policy() {
        FeedbackPolicy::Propagate => Evaluation {
            result: evaluate(resume_text, criteria, embedder, generator).await?,
            feedback_degraded: false,
        },
        policy => {
            evaluate_with_policy(resume_text, criteria, embedder, generator, policy).await?
        }
    };
    Ok(evaluation)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::extraction::DOCX_MIME;
    use crate::routes::build_router;
    use crate::scoring::combiner::{DEGRADED_FEEDBACK, NO_TEXT_FEEDBACK};
    use crate::scoring::feedback::TextGenerator;
    use crate::scoring::semantic::Embedder;
    use crate::scoring::testing::{CannedGenerator, FailingEmbedder, FailingGenerator, FixedEmbedder};
    use crate::state::AppState;

    const BOUNDARY: &str = "relevance-test-boundary";

    fn test_config(degrade: bool) -> Config {
        Config {
            google_api_key: "test-key".to_string(),
            embedding_api_url: "http://localhost:0".to_string(),
            embedding_api_key: None,
            embedding_model: "test-model".to_string(),
            collaborator_timeout: Duration::from_secs(1),
            max_upload_bytes: 1024 * 1024,
            degrade_on_feedback_failure: degrade,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    fn app(
        embedder: Arc<dyn Embedder>,
        text_generator: Arc<dyn TextGenerator>,
        degrade: bool,
    ) -> Router {
        build_router(AppState {
            config: test_config(degrade),
            embedder,
            text_generator,
        })
    }

    fn default_app() -> Router {
        app(
            Arc::new(FixedEmbedder::new(vec![1.0, 0.0])),
            Arc::new(CannedGenerator::new("Build a Docker project.")),
            false,
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn json_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/relevance/evaluate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file {
                Some((file_name, content_type)) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/relevance/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(default_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_evaluate_concrete_scenario() {
        let (status, body) = send(
            default_app(),
            json_request(json!({
                "resume_text": "Skilled in Python and SQL.",
                "skill_criteria": ["Python", "SQL", "AWS", "Docker"]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 70);
        assert_eq!(body["result"]["verdict"], "Medium");
        assert_eq!(body["result"]["matched_skills"], json!(["Python", "SQL"]));
        assert_eq!(body["result"]["missing_skills"], json!(["AWS", "Docker"]));
        assert_eq!(body["result"]["feedback"], "Build a Docker project.");
        assert_eq!(body["feedback_degraded"], false);
        assert!(body["evaluation_id"].is_string());
        assert_eq!(
            body["action_plan"],
            json!([
                "- **AWS:** Consider completing an online certification or a personal project focused on this technology.",
                "- **Docker:** Consider completing an online certification or a personal project focused on this technology."
            ])
        );
    }

    #[tokio::test]
    async fn test_evaluate_empty_resume_is_soft_result() {
        let (status, body) = send(
            app(Arc::new(FailingEmbedder), Arc::new(FailingGenerator), false),
            json_request(json!({"resume_text": "", "skill_criteria": ["Go"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 0);
        assert_eq!(body["result"]["missing_skills"], json!(["Go"]));
        assert_eq!(body["result"]["feedback"], NO_TEXT_FEEDBACK);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_null_criteria() {
        let (status, body) = send(
            default_app(),
            json_request(json!({"resume_text": "Go", "skill_criteria": ["Go", null]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_evaluate_embedding_failure_is_bad_gateway() {
        let (status, body) = send(
            app(
                Arc::new(FailingEmbedder),
                Arc::new(CannedGenerator::new("unused")),
                true,
            ),
            json_request(json!({"resume_text": "Go", "skill_criteria": ["Go"]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "EMBEDDING_ERROR");
    }

    #[tokio::test]
    async fn test_evaluate_feedback_failure_strict() {
        let (status, body) = send(
            app(
                Arc::new(FixedEmbedder::new(vec![1.0])),
                Arc::new(FailingGenerator),
                false,
            ),
            json_request(json!({"resume_text": "Go", "skill_criteria": ["Go"]})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_evaluate_feedback_failure_degraded() {
        let (status, body) = send(
            app(
                Arc::new(FixedEmbedder::new(vec![1.0])),
                Arc::new(FailingGenerator),
                true,
            ),
            json_request(json!({"resume_text": "Go", "skill_criteria": ["Go"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feedback_degraded"], true);
        assert_eq!(body["result"]["score"], 100);
        assert_eq!(body["result"]["feedback"], DEGRADED_FEEDBACK);
        assert_eq!(body["action_plan"], json!([]));
    }

    #[tokio::test]
    async fn test_upload_docx() {
        let docx = crate::extraction::docx::tests::build_docx(
            "<w:p><w:r><w:t>Python and SQL engineer</w:t></w:r></w:p>",
        );
        let request = multipart_request(&[
            ("skill_criteria", None, br#"["Python", "SQL", "AWS", "Docker"]"#.as_slice()),
            ("file", Some(("resume.docx", DOCX_MIME)), docx.as_slice()),
        ]);

        let (status, body) = send(default_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 70);
        assert_eq!(body["result"]["matched_skills"], json!(["Python", "SQL"]));
    }

    #[tokio::test]
    async fn test_upload_unsupported_format() {
        let generator = Arc::new(CannedGenerator::new("unused"));
        let request = multipart_request(&[
            ("file", Some(("resume.txt", "text/plain")), b"Python".as_slice()),
            ("skill_criteria", None, br#"["Python"]"#.as_slice()),
        ]);

        let (status, body) = send(
            app(Arc::new(FailingEmbedder), generator.clone(), false),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["score"], 0);
        assert_eq!(body["result"]["missing_skills"], json!(["Python"]));
        assert_eq!(
            body["result"]["feedback"],
            crate::extraction::UNSUPPORTED_FORMAT_FEEDBACK
        );
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_unreadable_pdf_scores_zero() {
        let request = multipart_request(&[
            ("file", Some(("resume.pdf", "application/pdf")), b"%PDF-garbage".as_slice()),
            ("skill_criteria", None, br#"["Python"]"#.as_slice()),
        ]);

        let (status, body) = send(
            app(Arc::new(FailingEmbedder), Arc::new(FailingGenerator), false),
            request,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["feedback"], NO_TEXT_FEEDBACK);
    }

    #[tokio::test]
    async fn test_upload_requires_criteria() {
        let request = multipart_request(&[("file", Some(("resume.pdf", "application/pdf")), b"x".as_slice())]);
        let (status, body) = send(default_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_json_criteria() {
        let request = multipart_request(&[
            ("file", Some(("resume.pdf", "application/pdf")), b"x".as_slice()),
            ("skill_criteria", None, b"['Python']".as_slice()),
        ]);
        let (status, _) = send(default_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
