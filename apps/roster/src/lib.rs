//! # roster
//!
//! The Roster client application: backend collaborator, session handling,
//! the mutation service and the command-line presentation layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   apps/roster (THE BINARY)                  │
//! │                                                             │
//! │  ┌───────────┐    ┌────────────────┐    ┌───────────────┐   │
//! │  │   CLI     │───>│ Roster service │───>│  HttpClient   │───┼──> backend
//! │  │  (clap)   │    │ (watch, store) │    │  (reqwest)    │   │
//! │  └───────────┘    └───────┬────────┘    └───────────────┘   │
//! │                           ▼                                 │
//! │                   ┌───────────────┐                         │
//! │                   │  roster-core  │                         │
//! │                   │  (THE LOGIC)  │                         │
//! │                   └───────────────┘                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod service;
pub mod session;

pub use api::{ApiError, AuthApi, HttpClient, StudentApi};
pub use config::RosterConfig;
pub use error::AppError;
pub use service::Roster;
pub use session::{SessionContext, SessionStore};
