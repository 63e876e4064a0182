use chrono::{DateTime, Utc};
use std::fmt;

use eduplay_core::model::{
    AnswerIndex, Question, QuizDefinition, QuizError, RecordedAnswer, ScoreResult,
};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of one play-through.
///
/// Loading has no representation here: a `QuizSession` only exists once the
/// quiz definition has arrived, and a failed fetch never produces a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Answering questions; local transitions only.
    Playing,
    /// All answers recorded, awaiting the submit round-trip.
    Submitting,
    /// Scored by the server. Terminal; a new play-through starts via
    /// [`QuizSession::restart`].
    Scored,
    /// The submit call failed. Recorded answers are kept so a retry can
    /// resubmit without re-answering.
    Failed,
}

/// Outcome of a successful [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    NextQuestion,
    /// The last answer was recorded; the session entered Submitting.
    ReadyToSubmit,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one traversal of a quiz.
///
/// Owns its `QuizDefinition` for the whole play-through; the question list
/// never changes after load. Every operation checks the phase first and
/// leaves the session untouched when it returns an error, so rapid repeated
/// input is rejected rather than queued.
pub struct QuizSession {
    quiz: QuizDefinition,
    phase: QuizPhase,
    current: usize,
    selected: Option<AnswerIndex>,
    recorded: Vec<RecordedAnswer>,
    score: Option<ScoreResult>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a play-through of a fetched quiz.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` (wire payloads bypass the
    /// `QuizDefinition` constructor, so the check is repeated here).
    pub fn new(quiz: QuizDefinition, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if quiz.questions().is_empty() {
            return Err(QuizError::NoQuestions.into());
        }
        Ok(Self::fresh(quiz, started_at))
    }

    fn fresh(quiz: QuizDefinition, started_at: DateTime<Utc>) -> Self {
        Self {
            quiz,
            phase: QuizPhase::Playing,
            current: 0,
            selected: None,
            recorded: Vec::new(),
            score: None,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Zero-based position in the question list; display adds one.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions().get(self.current)
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<AnswerIndex> {
        self.selected
    }

    /// Answers recorded so far, in traversal order. This exact sequence is
    /// what a submit carries.
    #[must_use]
    pub fn recorded_answers(&self) -> &[RecordedAnswer] {
        &self.recorded
    }

    #[must_use]
    pub fn score(&self) -> Option<&ScoreResult> {
        self.score.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.quiz.question_count()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.quiz.question_count();
        SessionProgress {
            total,
            answered: self.recorded.len(),
            remaining: total.saturating_sub(self.recorded.len()),
            is_complete: self.phase == QuizPhase::Scored,
        }
    }

    //
    // ─── LOCAL TRANSITIONS ─────────────────────────────────────────────────
    //

    /// Pick an answer for the current question. May be called any number of
    /// times before advancing; never touches the recorded answers.
    ///
    /// # Errors
    ///
    /// Returns `NotPlaying` outside the Playing phase, or `UnknownAnswer`
    /// if `answer` does not name an option of the current question.
    pub fn select_answer(&mut self, answer: AnswerIndex) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Playing {
            return Err(SessionError::NotPlaying);
        }
        let Some(question) = self.current_question() else {
            return Err(SessionError::NotPlaying);
        };
        if !question.has_answer(answer) {
            return Err(SessionError::UnknownAnswer { answer });
        }
        self.selected = Some(answer);
        Ok(())
    }

    /// Record the selected answer and move forward.
    ///
    /// The recorded pair carries the question's server-assigned index and
    /// the selected answer's server-assigned index, never array positions.
    /// On the last question the session enters Submitting instead of
    /// advancing. The selection is cleared on success, so a second call
    /// without a new selection fails the `NoSelection` guard; rapid
    /// double-input cannot record a question twice.
    ///
    /// # Errors
    ///
    /// Returns `NotPlaying` outside Playing, `NoSelection` when nothing is
    /// selected. Nothing is mutated on error.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.phase != QuizPhase::Playing {
            return Err(SessionError::NotPlaying);
        }
        let Some(selected) = self.selected else {
            return Err(SessionError::NoSelection);
        };
        let question_index = self
            .current_question()
            .ok_or(SessionError::NotPlaying)?
            .index();

        self.recorded
            .push(RecordedAnswer::new(question_index, selected));
        self.selected = None;

        if self.current + 1 == self.quiz.question_count() {
            self.phase = QuizPhase::Submitting;
            Ok(Advance::ReadyToSubmit)
        } else {
            self.current += 1;
            Ok(Advance::NextQuestion)
        }
    }

    /// Step back to the previous question.
    ///
    /// Clears the selection and drops that question's recorded entry, so the
    /// recorded sequence always has exactly one entry per answered question
    /// and `recorded.len() == current_index()` holds while Playing. The
    /// earlier answer is deliberately not restored to the selection.
    ///
    /// # Errors
    ///
    /// Returns `NotPlaying` outside Playing, `AtFirstQuestion` at index 0.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Playing {
            return Err(SessionError::NotPlaying);
        }
        if self.current == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.current -= 1;
        self.selected = None;
        self.recorded.pop();
        Ok(())
    }

    /// Begin a fresh play-through of the same quiz.
    ///
    /// This builds a new session rather than transitioning the old one; the
    /// scored result of the finished play-through is simply discarded with
    /// it.
    #[must_use]
    pub fn restart(&self, started_at: DateTime<Utc>) -> QuizSession {
        Self::fresh(self.quiz.clone(), started_at)
    }

    //
    // ─── REMOTE-DRIVEN TRANSITIONS ─────────────────────────────────────────
    //

    pub(crate) fn complete(
        &mut self,
        score: ScoreResult,
        completed_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Submitting {
            return Err(SessionError::NotReadyToSubmit);
        }
        self.phase = QuizPhase::Scored;
        self.score = Some(score);
        self.completed_at = Some(completed_at);
        Ok(())
    }

    pub(crate) fn fail_submit(&mut self) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Submitting {
            return Err(SessionError::NotReadyToSubmit);
        }
        self.phase = QuizPhase::Failed;
        Ok(())
    }

    pub(crate) fn resume_submit(&mut self) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Failed {
            return Err(SessionError::NotFailed);
        }
        self.phase = QuizPhase::Submitting;
        Ok(())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz.id())
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("recorded_len", &self.recorded.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use eduplay_core::model::{AnswerOption, GameId, QuestionIndex};
    use eduplay_core::time::fixed_now;
    use uuid::Uuid;

    // Server question indices start at 10 so they never coincide with
    // array positions.
    fn build_quiz(question_count: u32) -> QuizDefinition {
        let questions = (0..question_count)
            .map(|i| {
                let answers = (0..3)
                    .map(|a| AnswerOption::new(AnswerIndex::new(a), format!("option {a}")))
                    .collect();
                Question::new(QuestionIndex::new(10 + i), format!("Q{i}"), None, answers)
                    .unwrap()
            })
            .collect();
        QuizDefinition::new(GameId::new(Uuid::nil()), "Test", questions, 10).unwrap()
    }

    fn build_session(question_count: u32) -> QuizSession {
        QuizSession::new(build_quiz(question_count), fixed_now()).unwrap()
    }

    #[test]
    fn advance_records_server_identity_not_position() {
        let mut session = build_session(3);
        session.select_answer(AnswerIndex::new(2)).unwrap();
        assert_eq!(session.advance().unwrap(), Advance::NextQuestion);

        let recorded = session.recorded_answers();
        assert_eq!(recorded.len(), 1);
        // Question at position 0 carries server index 10.
        assert_eq!(recorded[0].question_index, QuestionIndex::new(10));
        assert_eq!(recorded[0].selected_answer_index, AnswerIndex::new(2));
    }

    #[test]
    fn advance_without_selection_mutates_nothing() {
        let mut session = build_session(3);
        let err = session.advance().unwrap_err();
        assert!(matches!(err, SessionError::NoSelection));
        assert_eq!(session.current_index(), 0);
        assert!(session.recorded_answers().is_empty());
        assert_eq!(session.phase(), QuizPhase::Playing);
    }

    #[test]
    fn double_advance_is_rejected_not_queued() {
        let mut session = build_session(3);
        session.select_answer(AnswerIndex::new(0)).unwrap();
        session.advance().unwrap();

        // The selection was consumed; a re-entrant call fails the guard.
        let err = session.advance().unwrap_err();
        assert!(matches!(err, SessionError::NoSelection));
        assert_eq!(session.recorded_answers().len(), 1);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn reselecting_overwrites_without_recording() {
        let mut session = build_session(2);
        session.select_answer(AnswerIndex::new(0)).unwrap();
        session.select_answer(AnswerIndex::new(2)).unwrap();
        assert_eq!(session.selected_answer(), Some(AnswerIndex::new(2)));
        assert!(session.recorded_answers().is_empty());
    }

    #[test]
    fn unknown_answer_is_rejected() {
        let mut session = build_session(2);
        let err = session.select_answer(AnswerIndex::new(7)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnknownAnswer { answer } if answer == AnswerIndex::new(7)
        ));
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn recorded_grows_by_one_per_advance_up_to_question_count() {
        let mut session = build_session(4);
        for expected in 1..=4 {
            session.select_answer(AnswerIndex::new(0)).unwrap();
            session.advance().unwrap();
            assert_eq!(session.recorded_answers().len(), expected);
        }
        assert_eq!(session.phase(), QuizPhase::Submitting);
        // No further growth possible: the phase guard rejects everything.
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::NotPlaying
        ));
        assert_eq!(session.recorded_answers().len(), 4);
    }

    #[test]
    fn last_advance_enters_submitting() {
        let mut session = build_session(1);
        session.select_answer(AnswerIndex::new(1)).unwrap();
        assert_eq!(session.advance().unwrap(), Advance::ReadyToSubmit);
        assert_eq!(session.phase(), QuizPhase::Submitting);
        assert_eq!(session.recorded_answers().len(), 1);
    }

    #[test]
    fn retreat_from_first_question_fails() {
        let mut session = build_session(3);
        let err = session.retreat().unwrap_err();
        assert!(matches!(err, SessionError::AtFirstQuestion));
    }

    #[test]
    fn retreat_clears_selection_and_recorded_entry() {
        let mut session = build_session(3);
        session.select_answer(AnswerIndex::new(1)).unwrap();
        session.advance().unwrap();
        session.select_answer(AnswerIndex::new(2)).unwrap();

        session.retreat().unwrap();

        assert_eq!(session.current_index(), 0);
        // The earlier answer is not restored to the selection.
        assert_eq!(session.selected_answer(), None);
        // One recorded entry per answered question, none for the current one.
        assert!(session.recorded_answers().is_empty());
        assert_eq!(session.recorded_answers().len(), session.current_index());
    }

    #[test]
    fn retreat_then_advance_records_no_duplicates() {
        let mut session = build_session(3);
        session.select_answer(AnswerIndex::new(0)).unwrap();
        session.advance().unwrap();
        session.retreat().unwrap();
        session.select_answer(AnswerIndex::new(1)).unwrap();
        session.advance().unwrap();

        let recorded = session.recorded_answers();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].selected_answer_index, AnswerIndex::new(1));
    }

    #[test]
    fn selection_does_not_survive_backward_navigation() {
        let mut session = build_session(3);
        session.select_answer(AnswerIndex::new(2)).unwrap();
        session.advance().unwrap();
        session.retreat().unwrap();
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn progress_tracks_answers() {
        let mut session = build_session(4);
        assert!((session.progress().percent() - 0.0).abs() < f64::EPSILON);

        session.select_answer(AnswerIndex::new(0)).unwrap();
        session.advance().unwrap();
        let progress = session.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 3);
        assert!(!progress.is_complete);
        assert!((progress.percent() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn submit_transitions_are_phase_guarded() {
        let mut session = build_session(1);
        // Not yet in Submitting.
        let score = ScoreResult {
            correct_count: 1,
            total_questions: 1,
            max_score: 10,
            score: 10,
            percentage: 100.0,
        };
        assert!(matches!(
            session.complete(score.clone(), fixed_now()).unwrap_err(),
            SessionError::NotReadyToSubmit
        ));

        session.select_answer(AnswerIndex::new(0)).unwrap();
        session.advance().unwrap();
        session.fail_submit().unwrap();
        assert_eq!(session.phase(), QuizPhase::Failed);
        // Answers survive the failure for a retry.
        assert_eq!(session.recorded_answers().len(), 1);

        session.resume_submit().unwrap();
        session.complete(score, fixed_now()).unwrap();
        assert_eq!(session.phase(), QuizPhase::Scored);
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert!(session.progress().is_complete);
    }

    #[test]
    fn resume_requires_a_failed_submit() {
        let mut session = build_session(1);
        assert!(matches!(
            session.resume_submit().unwrap_err(),
            SessionError::NotFailed
        ));
    }

    #[test]
    fn restart_discards_score_and_resets_position() {
        let mut session = build_session(2);
        for _ in 0..2 {
            session.select_answer(AnswerIndex::new(0)).unwrap();
            session.advance().unwrap();
        }
        session
            .complete(
                ScoreResult {
                    correct_count: 2,
                    total_questions: 2,
                    max_score: 20,
                    score: 20,
                    percentage: 100.0,
                },
                fixed_now(),
            )
            .unwrap();

        let fresh = session.restart(fixed_now());
        assert_eq!(fresh.phase(), QuizPhase::Playing);
        assert_eq!(fresh.current_index(), 0);
        assert!(fresh.recorded_answers().is_empty());
        assert_eq!(fresh.selected_answer(), None);
        assert!(fresh.score().is_none());
        assert_eq!(fresh.quiz().id(), session.quiz().id());
    }

    #[test]
    fn scored_session_rejects_play_input() {
        let mut session = build_session(1);
        session.select_answer(AnswerIndex::new(0)).unwrap();
        session.advance().unwrap();
        session
            .complete(
                ScoreResult {
                    correct_count: 0,
                    total_questions: 1,
                    max_score: 10,
                    score: 0,
                    percentage: 0.0,
                },
                fixed_now(),
            )
            .unwrap();

        assert!(matches!(
            session.select_answer(AnswerIndex::new(0)).unwrap_err(),
            SessionError::NotPlaying
        ));
        assert!(matches!(
            session.retreat().unwrap_err(),
            SessionError::NotPlaying
        ));
    }
}
