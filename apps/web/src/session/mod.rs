//! Per-browser session state shared between the upload and answers pages.
//!
//! The browser carries an opaque session id cookie; the state itself lives
//! behind `SessionStore`, held in `AppState` as `Arc<dyn SessionStore>`.

pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderValue,
    },
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

pub const SESSION_COOKIE: &str = "prep_session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt session payload: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Everything a browsing session remembers between pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub resume_text: Option<String>,
    pub questions: Option<Vec<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionData {
    /// Résumé text and questions, if both have been stored. The answers page
    /// renders only when this returns `Some`.
    pub fn answer_inputs(&self) -> Option<(&str, &[String])> {
        match (&self.resume_text, &self.questions) {
            (Some(resume_text), Some(questions)) => Some((resume_text.as_str(), questions.as_slice())),
            _ => None,
        }
    }

    pub fn record_generation(&mut self, resume_text: String, questions: Vec<String>) {
        self.resume_text = Some(resume_text);
        self.questions = Some(questions);
        self.updated_at = Some(Utc::now());
    }
}

/// Storage for session state, keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored state, or an empty `SessionData` for unknown ids.
    async fn load(&self, id: Uuid) -> Result<SessionData, SessionError>;

    async fn save(&self, id: Uuid, data: &SessionData) -> Result<(), SessionError>;

    async fn clear(&self, id: Uuid) -> Result<(), SessionError>;
}

/// Session id taken from the request cookie. A request without a valid
/// cookie gets a fresh id, and `is_new` tells the handler to set the cookie.
#[derive(Debug, Clone, Copy)]
pub struct SessionId {
    pub id: Uuid,
    pub is_new: bool,
}

impl SessionId {
    fn from_cookie_header(header: Option<&HeaderValue>) -> Self {
        let existing = header
            .and_then(|v| v.to_str().ok())
            .and_then(|raw| {
                raw.split(';')
                    .filter_map(|pair| pair.trim().split_once('='))
                    .find(|(name, _)| *name == SESSION_COOKIE)
                    .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
            });

        match existing {
            Some(id) => SessionId { id, is_new: false },
            None => SessionId {
                id: Uuid::new_v4(),
                is_new: true,
            },
        }
    }

    fn cookie_value(&self) -> HeaderValue {
        // A hyphenated UUID is always a valid header value.
        HeaderValue::from_str(&format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.id
        ))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    /// Attaches the session cookie to a response when the session is new.
    pub fn attach(&self, mut response: Response) -> Response {
        if self.is_new {
            response
                .headers_mut()
                .append(SET_COOKIE, self.cookie_value());
        }
        response
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionId::from_cookie_header(parts.headers.get(COOKIE)))
    }
}
