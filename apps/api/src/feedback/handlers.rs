//! Axum route handlers for the Feedback API — the presentation layer's
//! server-side half. Input gating lives here, not in the service: the service
//! refuses empty strings, but the essay length threshold is a presentation
//! rule.
//!
//! Every response echoes a `submissionId` tagging the input the feedback was
//! issued for. A client that lets the user switch sentences or essays while a
//! call is in flight compares the echoed id against its current one and drops
//! stale results instead of rendering them.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::models::{TranslationFeedback, WritingFeedback};
use crate::state::AppState;

/// Minimum essay length in characters. Shorter submissions are rejected
/// without an evaluation call.
pub const MIN_ESSAY_CHARS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub source_sentence: String,
    pub user_translation: String,
    /// Client-chosen tag for stale-response discarding; minted server-side
    /// when absent.
    #[serde(default)]
    pub submission_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub submission_id: Uuid,
    pub feedback: TranslationFeedback,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayRequest {
    pub task_prompt: String,
    pub essay_text: String,
    #[serde(default)]
    pub submission_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayResponse {
    pub submission_id: Uuid,
    pub feedback: WritingFeedback,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/feedback/translation
///
/// Evaluates one Chinese→English translation and returns the full feedback
/// record. All-or-nothing: a record that fails validation never reaches the
/// client.
pub async fn handle_translation_feedback(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Result<Json<TranslationResponse>, AppError> {
    if request.source_sentence.trim().is_empty() {
        return Err(AppError::Validation(
            "sourceSentence cannot be empty".to_string(),
        ));
    }
    if request.user_translation.trim().is_empty() {
        return Err(AppError::Validation(
            "userTranslation cannot be empty".to_string(),
        ));
    }

    let submission_id = request.submission_id.unwrap_or_else(Uuid::new_v4);

    let feedback = state
        .feedback
        .evaluate_translation(&request.source_sentence, &request.user_translation)
        .await?;

    Ok(Json(TranslationResponse {
        submission_id,
        feedback,
    }))
}

/// POST /api/v1/feedback/essay
///
/// Evaluates one essay against its task prompt. Essays under
/// `MIN_ESSAY_CHARS` are rejected here, before the service is invoked.
pub async fn handle_essay_feedback(
    State(state): State<AppState>,
    Json(request): Json<EssayRequest>,
) -> Result<Json<EssayResponse>, AppError> {
    if request.task_prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "taskPrompt cannot be empty".to_string(),
        ));
    }
    let essay = request.essay_text.trim();
    if essay.is_empty() {
        return Err(AppError::Validation("essayText cannot be empty".to_string()));
    }
    if essay.chars().count() < MIN_ESSAY_CHARS {
        return Err(AppError::Validation(format!(
            "essayText must be at least {MIN_ESSAY_CHARS} characters"
        )));
    }

    let submission_id = request.submission_id.unwrap_or_else(Uuid::new_v4);

    let feedback = state
        .feedback
        .evaluate_essay(&request.task_prompt, &request.essay_text)
        .await?;

    Ok(Json(EssayResponse {
        submission_id,
        feedback,
    }))
}
