//! # Roster HTTP Client
//!
//! Wrapper around the student-records REST API.
//!
//! Failures carry the backend's own `message` unchanged so the caller can
//! show it as-is.

use super::types::{AuthResponse, ErrorBody, LoginRequest, RegisterRequest, UserProfile};
use super::{AuthApi, StudentApi};
use crate::session::SessionContext;
use roster_core::{StudentDraft, StudentId, StudentRecord};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Errors from the HTTP client layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Cannot reach the backend.
    ConnectionFailed(String),
    /// 401 Unauthorized, with the backend's message.
    Unauthorized(String),
    /// Any other non-success status, with the backend's message.
    Rejected { status: u16, message: String },
    /// Failed to parse the response body.
    ParseError(String),
    /// The id cannot be addressed as a single path segment.
    InvalidId(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to backend at {url}"),
            Self::Unauthorized(msg) => write!(f, "{msg}"),
            Self::Rejected { message, .. } => write!(f, "{message}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::InvalidId(id) => write!(f, "Invalid student id: {id:?}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// HTTP client for the student-records backend.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    root: reqwest::Url,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client for the given API root, e.g. `http://localhost:2231/api`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let root = reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::ConnectionFailed(format!("{base_url}: {e}")))?;
        if root.cannot_be_a_base() {
            return Err(ApiError::ConnectionFailed(format!(
                "{base_url}: not an HTTP API root"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            root,
            token: None,
        })
    }

    /// Attach the bearer credential of an authenticated session.
    #[must_use]
    pub fn with_session(mut self, session: &SessionContext) -> Self {
        self.token = Some(session.token.clone());
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve path segments against the API root. Each segment is
    /// percent-encoded, so an id can never reach another resource.
    fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.root.clone();
        // `new` rejects roots that cannot take path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `/students/{id}`. Empty and dot ids would resolve to another route.
    fn student_url(&self, id: &StudentId) -> Result<reqwest::Url, ApiError> {
        match id.as_str() {
            "" | "." | ".." => Err(ApiError::InvalidId(id.as_str().to_string())),
            raw => Ok(self.endpoint(&["students", raw])),
        }
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send a request and map transport failures.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(format!("{}: {e}", self.base_url)))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(message));
        }
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Send and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::ParseError(e.to_string()))
    }
}

// =============================================================================
// STUDENT ENDPOINTS
// =============================================================================

impl StudentApi for HttpClient {
    /// GET /students
    async fn fetch_all(&self) -> Result<Vec<StudentRecord>, ApiError> {
        let req = self.request(reqwest::Method::GET, self.endpoint(&["students"]));
        self.send_json(req).await
    }

    /// GET /students/{id}
    async fn fetch_one(&self, id: &StudentId) -> Result<StudentRecord, ApiError> {
        let req = self.request(reqwest::Method::GET, self.student_url(id)?);
        self.send_json(req).await
    }

    /// POST /students
    async fn create(&self, draft: &StudentDraft) -> Result<StudentRecord, ApiError> {
        let req = self
            .request(reqwest::Method::POST, self.endpoint(&["students"]))
            .json(draft);
        self.send_json(req).await
    }

    /// PUT /students/{id}
    async fn update(&self, id: &StudentId, draft: &StudentDraft) -> Result<StudentRecord, ApiError> {
        let req = self
            .request(reqwest::Method::PUT, self.student_url(id)?)
            .json(draft);
        self.send_json(req).await
    }

    /// DELETE /students/{id}. The response body is not used.
    async fn delete_by_id(&self, id: &StudentId) -> Result<(), ApiError> {
        let req = self.request(reqwest::Method::DELETE, self.student_url(id)?);
        self.send(req).await.map(|_| ())
    }
}

// =============================================================================
// AUTH ENDPOINTS
// =============================================================================

impl AuthApi for HttpClient {
    /// POST /auth/login
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .request(reqwest::Method::POST, self.endpoint(&["auth", "login"]))
            .json(&body);
        self.send_json(req).await
    }

    /// POST /auth/register
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let req = self
            .request(reqwest::Method::POST, self.endpoint(&["auth", "register"]))
            .json(request);
        self.send_json(req).await
    }

    /// GET /auth/me
    async fn profile(&self) -> Result<UserProfile, ApiError> {
        let req = self.request(reqwest::Method::GET, self.endpoint(&["auth", "me"]));
        self.send_json(req).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
