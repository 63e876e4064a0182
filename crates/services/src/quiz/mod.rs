//! Quiz play: the session state machine and the workflow that drives it
//! against the remote authority.

mod progress;
mod session;
mod workflow;

pub use progress::SessionProgress;
pub use session::{Advance, QuizPhase, QuizSession};
pub use workflow::{QuizPlayService, SubmitOutcome};
