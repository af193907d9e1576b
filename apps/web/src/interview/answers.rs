//! Suggested answers, one model call per question.

use serde::Serialize;
use tracing::{info, warn};

use crate::interview::prompts::{fill, ANSWER_MAX_TOKENS, ANSWER_PROMPT_TEMPLATE};
use crate::llm_client::{CompletionModel, LlmError};

/// Stands in for an answer the model failed to produce.
pub const ANSWER_FALLBACK: &str = "Error generating answer.";

#[derive(Debug, Clone, Serialize)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer: String,
    /// Set when the model call failed and `answer` is the fallback text.
    pub error: Option<String>,
}

pub fn build_answer_prompt(resume_text: &str, question: &str) -> String {
    fill(
        ANSWER_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("question", question)],
    )
}

pub async fn generate_answer(
    model: &dyn CompletionModel,
    resume_text: &str,
    question: &str,
) -> Result<String, LlmError> {
    let prompt = build_answer_prompt(resume_text, question);
    let response = model.complete(&prompt, ANSWER_MAX_TOKENS).await?;
    Ok(response.trim().to_string())
}

/// Answers every question in order. A failed call yields `ANSWER_FALLBACK`
/// for that question and does not stop the rest.
pub async fn answer_all(
    model: &dyn CompletionModel,
    resume_text: &str,
    questions: &[String],
) -> Vec<AnsweredQuestion> {
    let mut answered = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let (answer, error) = match generate_answer(model, resume_text, question).await {
            Ok(answer) => (answer, None),
            Err(e) => {
                warn!("Answer for question {} failed: {e}", i + 1);
                (ANSWER_FALLBACK.to_string(), Some(e.to_string()))
            }
        };
        answered.push(AnsweredQuestion {
            question: question.clone(),
            answer,
            error,
        });
    }

    let failed = answered.iter().filter(|a| a.error.is_some()).count();
    info!("Answered {} questions ({} failed)", answered.len(), failed);

    answered
}
