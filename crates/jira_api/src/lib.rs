//! Typed Jira REST API client crate used by the report server.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limiter;

pub use auth::Credentials;
pub use client::JiraClient;
pub use config::JiraConfig;
pub use error::{Result, TrackerError};
pub use models::{Issue, IssueFields, NamedEntity, SavedFilter, User, Worklog, WorklogPage};
