mod game;
mod ids;
mod quiz;
mod score;

pub use ids::{AnswerIndex, GameId, QuestionIndex};

pub use game::{GameSummary, GameTemplate, Project};
pub use quiz::{AnswerOption, Question, QuizDefinition, QuizError, RecordedAnswer};
pub use score::{FeedbackTier, ScoreResult, StarRating};
