use std::fmt::Write;

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::extract_upload;
use crate::interview::questions::{generate_questions, QuestionCount};
use crate::pages::{escape, layout, render_notices, Notice, Page};
use crate::session::SessionId;
use crate::state::AppState;
use crate::upload::UploadForm;

const MISSING_INPUT_MESSAGE: &str =
    "Upload your resume and enter the job description or title to generate questions.";

fn render_form(job_description: &str, selected: QuestionCount) -> String {
    let mut options = String::new();
    for count in QuestionCount::ALL {
        let attr = if count == selected { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{n}"{attr}>{n}</option>"#,
            n = count.get()
        );
    }

    format!(
        r#"<form method="post" action="/upload" enctype="multipart/form-data"
      onsubmit="document.getElementById('busy').classList.add('shown')">
<label for="resume">Upload your resume (PDF or DOCX)</label>
<input id="resume" name="resume" type="file" accept=".pdf,.docx,application/pdf,application/vnd.openxmlformats-officedocument.wordprocessingml.document">
<label for="job_description">Enter the job description or title</label>
<textarea id="job_description" name="job_description">{jd}</textarea>
<label for="num_questions">Select number of questions</label>
<select id="num_questions" name="num_questions">{options}</select>
<p><button type="submit">Generate Interview Questions</button></p>
<p id="busy" class="busy">Generating questions...</p>
</form>"#,
        jd = escape(job_description),
    )
}

fn render_questions(questions: &[String]) -> String {
    let mut out = String::from("<h3>Interview Questions</h3>\n");
    for (i, question) in questions.iter().enumerate() {
        let _ = writeln!(out, r#"<p class="text">{}. {}</p>"#, i + 1, escape(question));
    }
    out
}

fn render_page(
    notices: &[Notice],
    job_description: &str,
    selected: QuestionCount,
    questions: Option<&[String]>,
) -> Response {
    let mut content = String::from("<h1>Upload Resume and Enter Job Description</h1>\n");
    content.push_str(&render_notices(notices));
    content.push_str(&render_form(job_description, selected));
    if let Some(questions) = questions {
        content.push_str(&render_questions(questions));
    }
    layout(Page::Upload, &content).into_response()
}

/// GET /upload
pub async fn show_upload(session: SessionId) -> Response {
    session.attach(render_page(&[], "", QuestionCount::default(), None))
}

/// POST /upload
///
/// Extracts the résumé, generates questions and stores both in the session.
/// Extraction and model failures are shown inline; the page itself never
/// fails for them.
pub async fn submit_upload(
    State(state): State<AppState>,
    session: SessionId,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let mut notices = Vec::new();

    let count = match form.num_questions.as_deref().map(str::trim) {
        None | Some("") => QuestionCount::default(),
        Some(raw) => match raw.parse::<u32>().map_err(|e| e.to_string()).and_then(QuestionCount::try_from) {
            Ok(count) => count,
            Err(e) => {
                notices.push(Notice::Error(format!("Invalid number of questions: {e}")));
                return Ok(session.attach(render_page(
                    &notices,
                    &form.job_description,
                    QuestionCount::default(),
                    None,
                )));
            }
        },
    };

    let (Some(file), Some(job_description)) = (form.resume.as_ref(), form.job_description()) else {
        notices.push(Notice::Info(MISSING_INPUT_MESSAGE.to_string()));
        return Ok(session.attach(render_page(&notices, &form.job_description, count, None)));
    };

    // An unreadable résumé does not stop question generation; the model
    // simply sees empty résumé text.
    let resume_text = match extract_upload(
        file.bytes.clone(),
        file.content_type.as_deref(),
        file.file_name.as_deref(),
    )
    .await
    {
        Ok(document) => document.text,
        Err(e) => {
            warn!("Resume extraction failed: {e}");
            notices.push(Notice::Error(e.to_string()));
            String::new()
        }
    };

    let questions = match generate_questions(
        state.llm.as_ref(),
        &resume_text,
        job_description,
        count,
    )
    .await
    {
        Ok(questions) => questions,
        Err(e) => {
            warn!("Question generation failed: {e}");
            notices.push(Notice::Error(format!("Error generating questions: {e}")));
            Vec::new()
        }
    };

    let mut data = state.sessions.load(session.id).await?;
    data.record_generation(resume_text, questions.clone());
    state.sessions.save(session.id, &data).await?;
    info!("Stored {} questions for session {}", questions.len(), session.id);

    Ok(session.attach(render_page(
        &notices,
        &form.job_description,
        count,
        Some(&questions),
    )))
}
