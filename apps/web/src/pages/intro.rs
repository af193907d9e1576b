use axum::response::Html;

use crate::pages::{layout, Page};

const INTRODUCTION: &str = r#"<h1>Introduction</h1>
<p>This tool helps job seekers, especially students and recent graduates, prepare for interviews.
It reads your résumé, compares it with the job you are aiming for, and produces interview
questions tailored to both, together with suggested answers drawn from your own experience.</p>

<h3>Main idea</h3>
<p>Interview preparation usually means hunting for generic question lists. Here a language model
reads your résumé alongside the job description and asks the questions an interviewer for that
role is likely to ask you. Suggested answers give you a structured starting point that highlights
your qualifications, which you can then rework in your own words.</p>

<h3>How to use it</h3>
<ol>
<li>Open <a href="/upload">Upload Resume</a>, choose a PDF or DOCX résumé and paste the job description or title.</li>
<li>Pick how many questions you want and generate them.</li>
<li>Open <a href="/answers">Generate Answers</a> to get a suggested answer for every question.</li>
</ol>

<h3>What powers it</h3>
<ul>
<li><strong>A hosted language model</strong> generates the questions and the suggested answers.</li>
<li><strong>PDF and DOCX parsing</strong> pulls plain text out of your résumé, page by page or paragraph by paragraph.</li>
<li><strong>Session-only storage</strong>: your résumé text and questions live only as long as your browsing session and are never written to disk.</li>
</ul>

<h3>Why it helps</h3>
<ul>
<li><strong>Tailored preparation</strong>: questions are specific to your résumé and the role.</li>
<li><strong>Confidence</strong>: practising with realistic questions and answers before the real interview.</li>
<li><strong>Time</strong>: minutes instead of hours spent collecting and drafting responses.</li>
</ul>"#;

/// GET / and GET /introduction
pub async fn show_introduction() -> Html<String> {
    layout(Page::Introduction, INTRODUCTION)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::llm_client::testing::ScriptedModel;
    use crate::pages::test_support::{body_text, get, send, test_app};

    #[tokio::test]
    async fn test_introduction_served_at_root_and_alias() {
        let app = test_app(ScriptedModel::new());

        for uri in ["/", "/introduction"] {
            let response = send(&app.router, get(uri, None)).await;
            assert_eq!(response.status(), StatusCode::OK);
            let html = body_text(response).await;
            assert!(html.contains("<h1>Introduction</h1>"));
            assert!(html.contains(r#"class="active">Introduction</a>"#));
        }

        assert_eq!(app.model.call_count(), 0);
    }
}
