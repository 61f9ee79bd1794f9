//! # Backend Collaborator
//!
//! The remote student-records service, seen from the client.
//!
//! `StudentApi` and `AuthApi` describe what the client needs from the
//! backend. `HttpClient` is the production implementation; tests plug in
//! in-memory fakes.
//!
//! ## Endpoints
//!
//! - `GET    /students`       - Fetch the full collection
//! - `GET    /students/{id}`  - Fetch one record
//! - `POST   /students`       - Create a record (server assigns `_id`)
//! - `PUT    /students/{id}`  - Replace a record
//! - `DELETE /students/{id}`  - Delete a record
//! - `POST   /auth/login`     - Exchange credentials for a token
//! - `POST   /auth/register`  - Create an account
//! - `GET    /auth/me`        - Describe the current user

mod client;
mod types;

pub use client::{ApiError, HttpClient};
pub use types::{AuthResponse, ErrorBody, LoginRequest, RegisterRequest, UserProfile};

use roster_core::{StudentDraft, StudentId, StudentRecord};
use std::future::Future;

/// Student record operations offered by the backend.
///
/// Every call may fail with `ApiError`; failures carry the backend's message
/// verbatim when one was sent.
pub trait StudentApi {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<StudentRecord>, ApiError>> + Send;

    fn fetch_one(
        &self,
        id: &StudentId,
    ) -> impl Future<Output = Result<StudentRecord, ApiError>> + Send;

    /// Returns the stored record including its server-assigned identifier.
    fn create(
        &self,
        draft: &StudentDraft,
    ) -> impl Future<Output = Result<StudentRecord, ApiError>> + Send;

    fn update(
        &self,
        id: &StudentId,
        draft: &StudentDraft,
    ) -> impl Future<Output = Result<StudentRecord, ApiError>> + Send;

    fn delete_by_id(&self, id: &StudentId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Account operations offered by the backend.
pub trait AuthApi {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, ApiError>> + Send;

    fn profile(&self) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;
}

// =============================================================================
// TESTS
// =============================================================================
