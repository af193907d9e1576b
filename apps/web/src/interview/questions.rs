//! Question generation: one model call turns résumé text and a job
//! description into an ordered list of interview questions.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::interview::prompts::{fill, QUESTIONS_MAX_TOKENS, QUESTIONS_PROMPT_TEMPLATE};
use crate::llm_client::{CompletionModel, LlmError};

/// How many questions the user may ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum QuestionCount {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl QuestionCount {
    pub const ALL: [QuestionCount; 3] = [
        QuestionCount::Ten,
        QuestionCount::TwentyFive,
        QuestionCount::Fifty,
    ];

    pub fn get(self) -> u32 {
        match self {
            QuestionCount::Ten => 10,
            QuestionCount::TwentyFive => 25,
            QuestionCount::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for QuestionCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(QuestionCount::Ten),
            25 => Ok(QuestionCount::TwentyFive),
            50 => Ok(QuestionCount::Fifty),
            other => Err(format!(
                "number of questions must be 10, 25 or 50, got {other}"
            )),
        }
    }
}

impl From<QuestionCount> for u32 {
    fn from(count: QuestionCount) -> Self {
        count.get()
    }
}

pub fn build_questions_prompt(
    resume_text: &str,
    job_description: &str,
    count: QuestionCount,
) -> String {
    fill(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("num_questions", &count.get().to_string()),
            ("resume_text", resume_text),
            ("job_description", job_description),
        ],
    )
}

/// Splits a model response into questions, one per line, in model order.
/// The response as a whole is trimmed; individual lines are kept as the
/// model wrote them, blank lines and numbering included.
pub fn split_questions(response: &str) -> Vec<String> {
    response.trim().lines().map(str::to_string).collect()
}

/// Asks the model for `count` interview questions.
pub async fn generate_questions(
    model: &dyn CompletionModel,
    resume_text: &str,
    job_description: &str,
    count: QuestionCount,
) -> Result<Vec<String>, LlmError> {
    let prompt = build_questions_prompt(resume_text, job_description, count);
    let response = model.complete(&prompt, QUESTIONS_MAX_TOKENS).await?;
    let questions = split_questions(&response);

    info!(
        "Generated {} question lines (requested {}, resume {} chars, job description {} chars)",
        questions.len(),
        count.get(),
        resume_text.len(),
        job_description.len()
    );

    Ok(questions)
}
