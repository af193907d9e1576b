use std::fmt::Write;

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::errors::AppError;
use crate::interview::answers::{answer_all, AnsweredQuestion};
use crate::pages::{escape, layout, render_notices, Notice, Page};
use crate::session::SessionId;
use crate::state::AppState;

pub const GENERATE_FIRST_MESSAGE: &str =
    "Please generate questions first by going to the 'Upload Resume' page.";

fn render_answers(answered: &[AnsweredQuestion]) -> String {
    let mut out = String::from("<h1>Suggested Answers</h1>\n");
    for (i, item) in answered.iter().enumerate() {
        if let Some(error) = &item.error {
            out.push_str(&render_notices(&[Notice::Error(format!(
                "Error generating answer: {error}"
            ))]));
        }
        let _ = write!(
            out,
            "<h3>Question {}: {}</h3>\n<p class=\"text\"><strong>Suggested Answer:</strong> {}</p>\n",
            i + 1,
            escape(&item.question),
            escape(&item.answer)
        );
    }
    out
}

/// GET /answers
///
/// Answers every stored question, one model call each. Without stored
/// questions and résumé text the page only asks the user to generate
/// questions first.
pub async fn show_answers(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Response, AppError> {
    let data = state.sessions.load(session.id).await?;

    let content = match data.answer_inputs() {
        Some((resume_text, questions)) => {
            info!(
                "Generating answers for {} questions (session {})",
                questions.len(),
                session.id
            );
            let answered = answer_all(state.llm.as_ref(), resume_text, questions).await;
            render_answers(&answered)
        }
        None => format!("<p>{}</p>", escape(GENERATE_FIRST_MESSAGE)),
    };

    Ok(session.attach(layout(Page::Answers, &content).into_response()))
}

/// POST /session/reset
pub async fn reset_session(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Response, AppError> {
    state.sessions.clear(session.id).await?;
    info!("Cleared session {}", session.id);
    Ok(Redirect::to(Page::Introduction.path()).into_response())
}
