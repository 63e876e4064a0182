use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AnswerIndex, GameId, QuestionIndex};

//
// ─── QUIZ TYPES ────────────────────────────────────────────────────────────────
//

/// One selectable answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(rename = "answer_index")]
    index: AnswerIndex,
    #[serde(rename = "answer_text")]
    text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(index: AnswerIndex, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn index(&self) -> AnswerIndex {
        self.index
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A single quiz question with its answer options.
///
/// `index` is the server-assigned identity; the position of the question in
/// `QuizDefinition::questions` carries no meaning beyond display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question_index")]
    index: QuestionIndex,
    #[serde(rename = "question_text")]
    text: String,
    #[serde(rename = "question_image")]
    image: Option<String>,
    answers: Vec<AnswerOption>,
}

impl Question {
    /// Create a question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoAnswers` if the option list is empty.
    pub fn new(
        index: QuestionIndex,
        text: impl Into<String>,
        image: Option<String>,
        answers: Vec<AnswerOption>,
    ) -> Result<Self, QuizError> {
        if answers.is_empty() {
            return Err(QuizError::NoAnswers { question: index });
        }
        Ok(Self {
            index,
            text: text.into(),
            image,
            answers,
        })
    }

    #[must_use]
    pub fn index(&self) -> QuestionIndex {
        self.index
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Relative path of the optional illustration, resolved by the asset host.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerOption] {
        &self.answers
    }

    /// Returns true if `answer` names one of this question's options.
    #[must_use]
    pub fn has_answer(&self, answer: AnswerIndex) -> bool {
        self.answers.iter().any(|option| option.index() == answer)
    }
}

/// A playable quiz as delivered by the server. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDefinition {
    id: GameId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnail_image: Option<String>,
    #[serde(default)]
    is_published: bool,
    questions: Vec<Question>,
    score_per_question: u32,
}

impl QuizDefinition {
    /// Assemble a quiz definition.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if `questions` is empty.
    pub fn new(
        id: GameId,
        name: impl Into<String>,
        questions: Vec<Question>,
        score_per_question: u32,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            id,
            name: name.into(),
            description: String::new(),
            thumbnail_image: None,
            is_published: false,
            questions,
            score_per_question,
        })
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score_per_question(&self) -> u32 {
        self.score_per_question
    }
}

/// One `(question, selected answer)` pair of the submit payload.
///
/// Both fields are server-assigned identities taken from the question being
/// answered, never positions in the local arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub question_index: QuestionIndex,
    pub selected_answer_index: AnswerIndex,
}

impl RecordedAnswer {
    #[must_use]
    pub fn new(question_index: QuestionIndex, selected_answer_index: AnswerIndex) -> Self {
        Self {
            question_index,
            selected_answer_index,
        }
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {question:?} has no answer options")]
    NoAnswers { question: QuestionIndex },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
