//! Axum route handlers for the JSON API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::{extract_upload, ExtractedDocument};
use crate::interview::answers::generate_answer;
use crate::interview::questions::{generate_questions, QuestionCount};
use crate::state::AppState;
use crate::upload::UploadForm;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub resume_text: String,
    pub job_description: String,
    #[serde(default)]
    pub num_questions: QuestionCount,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub resume_text: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/extract
///
/// Multipart upload with a `resume` file field. Returns the detected
/// document kind and the extracted text.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractedDocument>, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let file = form
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    let document = extract_upload(
        file.bytes,
        file.content_type.as_deref(),
        file.file_name.as_deref(),
    )
    .await?;

    Ok(Json(document))
}

/// POST /api/v1/questions
///
/// Generates interview questions for the given résumé text and job description.
pub async fn handle_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let questions = generate_questions(
        state.llm.as_ref(),
        &request.resume_text,
        &request.job_description,
        request.num_questions,
    )
    .await?;

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/answers
///
/// Suggests an answer to one interview question, grounded in the résumé text.
pub async fn handle_answers(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let answer = generate_answer(state.llm.as_ref(), &request.resume_text, &request.question).await?;

    Ok(Json(AnswerResponse { answer }))
}
