use std::sync::Arc;

use api::{ApiError, GameApi, QuizApi};
use eduplay_core::Clock;
use eduplay_core::model::{GameId, ScoreResult};

use super::session::{QuizPhase, QuizSession};
use crate::error::SessionError;

/// Result of a successful submit round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub score: ScoreResult,
    /// False when the best-effort play-count increment failed. The failure
    /// never affects the scored session.
    pub play_count_recorded: bool,
}

/// Drives quiz sessions against the remote authority.
///
/// All collaborators arrive through the constructor; nothing here reads
/// process-wide state.
#[derive(Clone)]
pub struct QuizPlayService {
    clock: Clock,
    quizzes: Arc<dyn QuizApi>,
    games: Arc<dyn GameApi>,
}

impl QuizPlayService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizApi>, games: Arc<dyn GameApi>) -> Self {
        Self {
            clock,
            quizzes,
            games,
        }
    }

    /// Fetch a quiz and start a session over it.
    ///
    /// A failed fetch is terminal for this attempt; retrying means calling
    /// `load` again. Nothing is retried automatically.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` when the quiz cannot be loaded, or a
    /// `Quiz` validation error for a malformed definition.
    pub async fn load(&self, id: GameId) -> Result<QuizSession, SessionError> {
        let quiz = self
            .quizzes
            .fetch_quiz(id)
            .await
            .map_err(SessionError::Fetch)?;
        QuizSession::new(quiz, self.clock.now())
    }

    /// Submit the recorded answers of a session that has finished playing.
    ///
    /// On success the session becomes Scored and the game's play count is
    /// bumped best-effort: a play-count failure is logged and reported via
    /// `SubmitOutcome::play_count_recorded` but never blocks or reverts the
    /// scored transition. On submit failure the session becomes Failed with
    /// its answers intact.
    ///
    /// # Errors
    ///
    /// Returns `NotReadyToSubmit` unless the session is in Submitting, and
    /// `Submit` when the remote call fails.
    pub async fn submit(&self, session: &mut QuizSession) -> Result<SubmitOutcome, SessionError> {
        if session.phase() != QuizPhase::Submitting {
            return Err(SessionError::NotReadyToSubmit);
        }
        let quiz_id = session.quiz().id();
        let submitted = self
            .quizzes
            .submit_answers(quiz_id, session.recorded_answers())
            .await;

        match submitted {
            Ok(score) => {
                session.complete(score.clone(), self.clock.now())?;
                let play_count_recorded = self.record_play(quiz_id).await;
                Ok(SubmitOutcome {
                    score,
                    play_count_recorded,
                })
            }
            Err(error) => {
                session.fail_submit()?;
                Err(SessionError::Submit(error))
            }
        }
    }

    /// Re-enter Submitting after a failed submit and try again with the
    /// same answer set.
    ///
    /// # Errors
    ///
    /// Returns `NotFailed` unless the previous submit failed, otherwise the
    /// same errors as [`submit`](Self::submit).
    pub async fn retry_submit(
        &self,
        session: &mut QuizSession,
    ) -> Result<SubmitOutcome, SessionError> {
        session.resume_submit()?;
        self.submit(session).await
    }

    async fn record_play(&self, quiz_id: GameId) -> bool {
        match self.games.increment_play_count(quiz_id).await {
            Ok(()) => true,
            Err(error) => {
                report_play_count_failure(quiz_id, &error);
                false
            }
        }
    }
}

fn report_play_count_failure(quiz_id: GameId, error: &ApiError) {
    tracing::warn!(%quiz_id, %error, "play count increment failed");
}
