use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use eduplay_core::model::{
    AnswerIndex, GameId, GameSummary, GameTemplate, Project, QuestionIndex, QuizDefinition,
    RecordedAnswer, ScoreResult,
};

use crate::query::{GameListQuery, SortDir, SortKey};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Failures surfaced by the remote authority.
///
/// No retry policy lives at this layer; callers decide whether and when to
/// reissue a request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("request rejected: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),
}

//
// ─── REMOTE CONTRACTS ──────────────────────────────────────────────────────────
//

/// Quiz play contract: fetch a definition, submit a completed answer set.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Fetch the playable quiz for `id`.
    async fn fetch_quiz(&self, id: GameId) -> Result<QuizDefinition, ApiError>;

    /// Submit recorded answers in traversal order and receive the
    /// authoritative score.
    async fn submit_answers(
        &self,
        id: GameId,
        answers: &[RecordedAnswer],
    ) -> Result<ScoreResult, ApiError>;
}

/// Browse-side contract: list fetch, like toggle, play count.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Fetch game summaries matching the canonical query.
    async fn list_games(&self, query: &GameListQuery) -> Result<Vec<GameSummary>, ApiError>;

    /// Fetch the template catalog backing the type filter.
    async fn list_templates(&self) -> Result<Vec<GameTemplate>, ApiError>;

    /// Record the desired liked state for a game.
    async fn set_liked(&self, id: GameId, liked: bool) -> Result<(), ApiError>;

    /// Bump the play counter for a game. Best-effort from the caller's
    /// point of view.
    async fn increment_play_count(&self, id: GameId) -> Result<(), ApiError>;
}

/// Creator-side contract over the caller's own projects.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Fetch the caller's draft and published projects.
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// Record the desired published state for a project.
    async fn set_published(&self, slug: &str, id: GameId, published: bool)
    -> Result<(), ApiError>;

    /// Permanently remove a project.
    async fn delete_project(&self, slug: &str, id: GameId) -> Result<(), ApiError>;
}

//
// ─── IN-MEMORY DOUBLE ──────────────────────────────────────────────────────────
//

#[derive(Default)]
struct Failures {
    fetch: Option<ApiError>,
    submit: Option<ApiError>,
    like: Option<ApiError>,
    publish: Option<ApiError>,
    play_count: Option<ApiError>,
}

/// In-memory implementation of the remote contracts for tests.
///
/// Seeded quizzes carry their correct answers so `submit_answers` produces a
/// real score; `list_games` honors the canonical query. Each `fail_next_*`
/// arms a one-shot failure for the matching operation.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    quizzes: Arc<Mutex<HashMap<GameId, SeededQuiz>>>,
    games: Arc<Mutex<Vec<GameSummary>>>,
    templates: Arc<Mutex<Vec<GameTemplate>>>,
    projects: Arc<Mutex<Vec<Project>>>,
    play_counts: Arc<Mutex<HashMap<GameId, u32>>>,
    submissions: Arc<Mutex<Vec<Vec<RecordedAnswer>>>>,
    like_calls: Arc<Mutex<Vec<(GameId, bool)>>>,
    failures: Arc<Mutex<Failures>>,
}

struct SeededQuiz {
    quiz: QuizDefinition,
    correct: HashMap<QuestionIndex, AnswerIndex>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<std::sync::MutexGuard<'a, T>, ApiError> {
    mutex.lock().map_err(|e| ApiError::Network(e.to_string()))
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a playable quiz together with its answer key.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned; seeding happens before any
    /// concurrent use.
    pub fn insert_quiz(
        &self,
        quiz: QuizDefinition,
        correct: HashMap<QuestionIndex, AnswerIndex>,
    ) {
        let id = quiz.id();
        self.quizzes
            .lock()
            .expect("seeding")
            .insert(id, SeededQuiz { quiz, correct });
    }

    /// Seed a browse-list game. Insertion order doubles as creation order.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn insert_game(&self, game: GameSummary) {
        self.games.lock().expect("seeding").push(game);
    }

    /// Seed a template catalog entry.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn insert_template(&self, template: GameTemplate) {
        self.templates.lock().expect("seeding").push(template);
    }

    /// Seed a creator project.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn insert_project(&self, project: Project) {
        self.projects.lock().expect("seeding").push(project);
    }

    /// Arm a one-shot failure for the next `fetch_quiz`.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn fail_next_fetch(&self, error: ApiError) {
        self.failures.lock().expect("seeding").fetch = Some(error);
    }

    /// Arm a one-shot failure for the next `submit_answers`.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn fail_next_submit(&self, error: ApiError) {
        self.failures.lock().expect("seeding").submit = Some(error);
    }

    /// Arm a one-shot failure for the next `set_liked`.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn fail_next_like(&self, error: ApiError) {
        self.failures.lock().expect("seeding").like = Some(error);
    }

    /// Arm a one-shot failure for the next `set_published`.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn fail_next_publish(&self, error: ApiError) {
        self.failures.lock().expect("seeding").publish = Some(error);
    }

    /// Arm a one-shot failure for the next `increment_play_count`.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    pub fn fail_next_play_count(&self, error: ApiError) {
        self.failures.lock().expect("seeding").play_count = Some(error);
    }

    /// Submit payloads received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    #[must_use]
    pub fn submissions(&self) -> Vec<Vec<RecordedAnswer>> {
        self.submissions.lock().expect("inspecting").clone()
    }

    /// `(game, desired liked state)` pairs received so far.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    #[must_use]
    pub fn like_calls(&self) -> Vec<(GameId, bool)> {
        self.like_calls.lock().expect("inspecting").clone()
    }

    /// Recorded play count for a game.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    #[must_use]
    pub fn play_count(&self, id: GameId) -> u32 {
        self.play_counts
            .lock()
            .expect("inspecting")
            .get(&id)
            .copied()
            .unwrap_or(0)
    }

    /// Current server-side view of a project.
    ///
    /// # Panics
    ///
    /// Panics if internal state is poisoned.
    #[must_use]
    pub fn project(&self, id: GameId) -> Option<Project> {
        self.projects
            .lock()
            .expect("inspecting")
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    fn take_failure(
        &self,
        pick: impl FnOnce(&mut Failures) -> Option<ApiError>,
    ) -> Result<(), ApiError> {
        let mut guard = lock(&self.failures)?;
        match pick(&mut guard) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QuizApi for InMemoryApi {
    async fn fetch_quiz(&self, id: GameId) -> Result<QuizDefinition, ApiError> {
        self.take_failure(|f| f.fetch.take())?;
        let guard = lock(&self.quizzes)?;
        guard
            .get(&id)
            .map(|seeded| seeded.quiz.clone())
            .ok_or(ApiError::NotFound)
    }

    async fn submit_answers(
        &self,
        id: GameId,
        answers: &[RecordedAnswer],
    ) -> Result<ScoreResult, ApiError> {
        {
            let mut guard = lock(&self.submissions)?;
            guard.push(answers.to_vec());
        }
        self.take_failure(|f| f.submit.take())?;

        let guard = lock(&self.quizzes)?;
        let seeded = guard.get(&id).ok_or(ApiError::NotFound)?;
        let total = seeded.quiz.question_count();
        if answers.len() != total {
            return Err(ApiError::Validation(format!(
                "expected {total} answers, got {}",
                answers.len()
            )));
        }

        let mut correct_count = 0_u32;
        for answer in answers {
            let expected = seeded
                .correct
                .get(&answer.question_index)
                .ok_or_else(|| {
                    ApiError::Validation(format!(
                        "unknown question index {}",
                        answer.question_index.value()
                    ))
                })?;
            if *expected == answer.selected_answer_index {
                correct_count += 1;
            }
        }

        let total = u32::try_from(total).map_err(|e| ApiError::Validation(e.to_string()))?;
        let per_question = seeded.quiz.score_per_question();
        let percentage =
            (f64::from(correct_count) / f64::from(total) * 100.0 * 100.0).round() / 100.0;
        Ok(ScoreResult {
            correct_count,
            total_questions: total,
            max_score: total * per_question,
            score: correct_count * per_question,
            percentage,
        })
    }
}

#[async_trait]
impl GameApi for InMemoryApi {
    async fn list_games(&self, query: &GameListQuery) -> Result<Vec<GameSummary>, ApiError> {
        let guard = lock(&self.games)?;
        let mut games: Vec<GameSummary> = guard
            .iter()
            .filter(|game| {
                query
                    .search()
                    .is_none_or(|term| game.name.to_lowercase().contains(&term.to_lowercase()))
            })
            .filter(|game| {
                query
                    .template_slug()
                    .is_none_or(|slug| game.template_slug == slug)
            })
            .cloned()
            .collect();

        if let Some((key, dir)) = query.sort() {
            match key {
                // Seeding order stands in for creation time.
                SortKey::CreatedAt => {}
                SortKey::LikeCount => games.sort_by_key(|g| g.total_liked),
                SortKey::PlayCount => games.sort_by_key(|g| g.total_played),
                SortKey::Name => games.sort_by(|a, b| a.name.cmp(&b.name)),
            }
            if dir == SortDir::Desc {
                games.reverse();
            }
        }
        Ok(games)
    }

    async fn list_templates(&self) -> Result<Vec<GameTemplate>, ApiError> {
        Ok(lock(&self.templates)?.clone())
    }

    async fn set_liked(&self, id: GameId, liked: bool) -> Result<(), ApiError> {
        {
            let mut guard = lock(&self.like_calls)?;
            guard.push((id, liked));
        }
        self.take_failure(|f| f.like.take())?;

        let mut guard = lock(&self.games)?;
        let game = guard
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(ApiError::NotFound)?;
        game.set_liked(liked);
        Ok(())
    }

    async fn increment_play_count(&self, id: GameId) -> Result<(), ApiError> {
        self.take_failure(|f| f.play_count.take())?;
        let mut guard = lock(&self.play_counts)?;
        *guard.entry(id).or_insert(0) += 1;
        Ok(())
    }
}

#[async_trait]
impl ProjectApi for InMemoryApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        Ok(lock(&self.projects)?.clone())
    }

    async fn set_published(
        &self,
        _slug: &str,
        id: GameId,
        published: bool,
    ) -> Result<(), ApiError> {
        self.take_failure(|f| f.publish.take())?;
        let mut guard = lock(&self.projects)?;
        let project = guard
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::NotFound)?;
        project.set_published(published);
        Ok(())
    }

    async fn delete_project(&self, _slug: &str, id: GameId) -> Result<(), ApiError> {
        let mut guard = lock(&self.projects)?;
        let before = guard.len();
        guard.retain(|p| p.id != id);
        if guard.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
