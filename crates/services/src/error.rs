//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use eduplay_core::model::{AnswerIndex, QuizError};

/// Errors emitted by the quiz session machine and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no answer selected for the current question")]
    NoSelection,

    #[error("session is not accepting answers")]
    NotPlaying,

    #[error("cannot go back from the first question")]
    AtFirstQuestion,

    #[error("answer {answer:?} is not an option of the current question")]
    UnknownAnswer { answer: AnswerIndex },

    #[error("session is not ready to submit")]
    NotReadyToSubmit,

    #[error("session has no failed submit to retry")]
    NotFailed,

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("failed to load quiz: {0}")]
    Fetch(#[source] ApiError),

    #[error("failed to submit answers: {0}")]
    Submit(#[source] ApiError),
}

/// Errors emitted when an optimistic mutation is rejected remotely.
///
/// By the time the caller sees one of these the local state has already been
/// restored to its pre-mutation snapshot; the error exists for notification.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MutationError {
    #[error(transparent)]
    Remote(#[from] ApiError),
}
