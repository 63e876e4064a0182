#![forbid(unsafe_code)]

pub mod error;
pub mod optimistic;
pub mod quiz;

pub use eduplay_core::Clock;

pub use error::{MutationError, SessionError};
pub use optimistic::{GameActionService, MutationTicket, OptimisticCell, Resolution};
pub use quiz::{
    Advance, QuizPhase, QuizPlayService, QuizSession, SessionProgress, SubmitOutcome,
};
