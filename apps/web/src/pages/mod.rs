//! Server-rendered pages: Introduction, Upload Resume and Generate Answers,
//! sharing one sidebar layout.

pub mod answers;
pub mod intro;
pub mod upload;

use std::fmt::Write;

use axum::response::Html;

/// The three pages reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Introduction,
    Upload,
    Answers,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Introduction, Page::Upload, Page::Answers];

    pub fn title(self) -> &'static str {
        match self {
            Page::Introduction => "Introduction",
            Page::Upload => "Upload Resume",
            Page::Answers => "Generate Answers",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Introduction => "/",
            Page::Upload => "/upload",
            Page::Answers => "/answers",
        }
    }

    /// Shown in the sidebar while a page that calls the model is loading.
    fn busy_message(self) -> Option<&'static str> {
        match self {
            Page::Answers => Some("Generating answers..."),
            Page::Introduction | Page::Upload => None,
        }
    }
}

/// An inline message rendered above page content.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    fn render(&self, out: &mut String) {
        let (class, text) = match self {
            Notice::Info(text) => ("notice info", text),
            Notice::Error(text) => ("notice error", text),
        };
        let _ = write!(out, r#"<div class="{class}">{}</div>"#, escape(text));
    }
}

pub fn render_notices(notices: &[Notice]) -> String {
    let mut out = String::new();
    for notice in notices {
        notice.render(&mut out);
    }
    out
}

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; display: flex; min-height: 100vh; color: #1f2933; }
nav { width: 15rem; background: #f0f2f6; padding: 1.5rem 1rem; }
nav h2 { font-size: 1.1rem; margin-top: 0; }
nav a { display: block; padding: .4rem .6rem; border-radius: .3rem; color: inherit; text-decoration: none; }
nav a.active { background: #ff4b4b; color: #fff; }
nav form { margin-top: 2rem; }
main { flex: 1; padding: 2rem 3rem; max-width: 52rem; }
.notice { padding: .75rem 1rem; border-radius: .3rem; margin-bottom: 1rem; }
.notice.error { background: #ffe3e3; color: #8a1c1c; }
.notice.info { background: #e3f0ff; color: #1c4f8a; }
.text { white-space: pre-wrap; }
.busy { display: none; color: #52606d; font-style: italic; }
.busy.shown { display: block; }
label { display: block; margin: 1rem 0 .3rem; font-weight: 600; }
textarea { width: 100%; min-height: 8rem; }
"#;

/// Wraps page content in the shared document and sidebar navigation.
pub fn layout(active: Page, content: &str) -> Html<String> {
    let mut nav = String::new();
    let mut busy = String::new();
    for page in Page::ALL {
        let class = if page == active { r#" class="active""# } else { "" };
        let onclick = match page.busy_message() {
            Some(message) => {
                let _ = write!(busy, r#"<p id="nav-busy" class="busy">{message}</p>"#);
                r#" onclick="document.getElementById('nav-busy').classList.add('shown')""#
            }
            None => "",
        };
        let _ = write!(
            nav,
            r#"<a href="{}"{class}{onclick}>{}</a>"#,
            page.path(),
            page.title()
        );
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Interview Prep</title>
<style>{STYLE}</style>
</head>
<body>
<nav>
<h2>Navigation</h2>
{nav}
{busy}
<form method="post" action="/session/reset"><button type="submit">Start over</button></form>
</nav>
<main>
{content}
</main>
</body>
</html>"#,
        title = active.title(),
    ))
}

/// Escapes text for inclusion in HTML element content or quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, Response};
    use axum::Router;
    use tower::ServiceExt;

    use crate::llm_client::testing::ScriptedModel;
    use crate::routes::build_router;
    use crate::session::{MemorySessionStore, SessionStore};
    use crate::state::AppState;

    pub const BOUNDARY: &str = "----interviewprepboundary";

    pub struct TestApp {
        pub router: Router,
        pub model: Arc<ScriptedModel>,
        pub sessions: Arc<MemorySessionStore>,
    }

    pub fn test_app(model: ScriptedModel) -> TestApp {
        let model = Arc::new(model);
        let sessions = Arc::new(MemorySessionStore::new(Duration::from_secs(60)));
        let state = AppState {
            llm: model.clone(),
            sessions: sessions.clone() as Arc<dyn SessionStore>,
        };
        TestApp {
            router: build_router(state, 1024 * 1024),
            model,
            sessions,
        }
    }

    pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router.clone().oneshot(request).await.unwrap()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Extracts `name=value` from a response's Set-Cookie header.
    pub fn session_cookie(response: &Response<Body>) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    pub enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            file_name: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
    }

    pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn multipart_request(uri: &str, cookie: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(multipart_body(parts))).unwrap()
    }

    pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }
}
