//! Feedback Service — the single integration point with the generative model.
//!
//! Everything upstream depends only on the `FeedbackService` trait, held in
//! `AppState` as `Arc<dyn FeedbackService>` so tests can substitute a fake.
//! Each operation is one schema-bound call: build content, issue the request,
//! validate, return the typed record. No cache, no local state — identical
//! input may legitimately produce different feedback.

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::feedback::models::{TranslationFeedback, WritingFeedback};
use crate::feedback::prompts::{
    build_translation_content, build_writing_content, TRANSLATION_SYSTEM_INSTRUCTION,
    WRITING_SYSTEM_INSTRUCTION,
};
use crate::feedback::schema::{translation_feedback_schema, writing_feedback_schema};
use crate::llm_client::{GeminiClient, LlmError};

#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Evaluates a Chinese→English translation against the source sentence.
    async fn evaluate_translation(
        &self,
        source_sentence: &str,
        user_translation: &str,
    ) -> Result<TranslationFeedback, AppError>;

    /// Evaluates an essay against its task prompt.
    async fn evaluate_essay(
        &self,
        task_prompt: &str,
        essay_text: &str,
    ) -> Result<WritingFeedback, AppError>;
}

/// Production implementation backed by the Gemini client.
#[derive(Clone)]
pub struct GeminiFeedbackService {
    client: GeminiClient,
}

impl GeminiFeedbackService {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

/// Rejects empty-after-trim arguments before any network call is attempted.
fn ensure_present(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} cannot be empty")));
    }
    Ok(())
}

#[async_trait]
impl FeedbackService for GeminiFeedbackService {
    async fn evaluate_translation(
        &self,
        source_sentence: &str,
        user_translation: &str,
    ) -> Result<TranslationFeedback, AppError> {
        ensure_present("source_sentence", source_sentence)?;
        ensure_present("user_translation", user_translation)?;

        let content = build_translation_content(source_sentence, user_translation);
        let schema = translation_feedback_schema();

        let feedback: TranslationFeedback = self
            .client
            .call_json(&content, TRANSLATION_SYSTEM_INSTRUCTION, &schema)
            .await?;

        feedback
            .validate()
            .map_err(|e| AppError::Evaluation(LlmError::Schema(e)))?;

        info!(
            "translation evaluated: band={}, critique_entries={}",
            feedback.estimated_band,
            feedback.critique.len()
        );
        Ok(feedback)
    }

    async fn evaluate_essay(
        &self,
        task_prompt: &str,
        essay_text: &str,
    ) -> Result<WritingFeedback, AppError> {
        ensure_present("task_prompt", task_prompt)?;
        ensure_present("essay_text", essay_text)?;

        let content = build_writing_content(task_prompt, essay_text);
        let schema = writing_feedback_schema();

        let feedback: WritingFeedback = self
            .client
            .call_json(&content, WRITING_SYSTEM_INSTRUCTION, &schema)
            .await?;

        feedback
            .validate()
            .map_err(|e| AppError::Evaluation(LlmError::Schema(e)))?;

        info!(
            "essay evaluated: overall_band={}, sentences={}, revised_paragraphs={}",
            feedback.overall_band,
            feedback.sentence_level.len(),
            feedback.revised_paragraphs.len()
        );
        Ok(feedback)
    }
}
