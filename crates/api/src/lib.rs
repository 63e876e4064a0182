#![forbid(unsafe_code)]

//! Remote-authority boundary for the eduplay client.
//!
//! The traits in [`remote`] are the only way the rest of the workspace talks
//! to the server; callers receive them as explicit `Arc<dyn …>` parameters.
//! [`http`] is the production implementation, [`remote::InMemoryApi`] the
//! test double.

pub mod http;
pub mod query;
pub mod remote;

pub use http::{ApiConfig, HttpApi};
pub use query::{GameListQuery, SortDir, SortKey};
pub use remote::{ApiError, GameApi, InMemoryApi, ProjectApi, QuizApi};
