use std::collections::HashMap;
use std::sync::Arc;

use api::{ApiError, InMemoryApi};
use eduplay_core::model::{
    AnswerIndex, AnswerOption, FeedbackTier, GameId, Question, QuestionIndex, QuizDefinition,
    RecordedAnswer, StarRating,
};
use eduplay_core::time::fixed_now;
use services::{Clock, QuizPhase, QuizPlayService, SessionError};
use uuid::Uuid;

fn seed_quiz(api: &InMemoryApi) -> GameId {
    let id = GameId::new(Uuid::new_v4());
    let questions = [10, 11, 12]
        .into_iter()
        .map(|i| {
            let answers = (0..3)
                .map(|a| AnswerOption::new(AnswerIndex::new(a), format!("option {a}")))
                .collect();
            Question::new(QuestionIndex::new(i), format!("Q{i}"), None, answers).unwrap()
        })
        .collect();
    let quiz = QuizDefinition::new(id, "Fractions", questions, 10).unwrap();
    let correct = HashMap::from([
        (QuestionIndex::new(10), AnswerIndex::new(1)),
        (QuestionIndex::new(11), AnswerIndex::new(2)),
        (QuestionIndex::new(12), AnswerIndex::new(2)),
    ]);
    api.insert_quiz(quiz, correct);
    id
}

fn play_service(api: &InMemoryApi) -> QuizPlayService {
    QuizPlayService::new(
        Clock::fixed(fixed_now()),
        Arc::new(api.clone()),
        Arc::new(api.clone()),
    )
}

#[tokio::test]
async fn full_play_through_scores_and_presents() {
    let api = InMemoryApi::new();
    let quiz_id = seed_quiz(&api);
    let service = play_service(&api);

    let mut session = service.load(quiz_id).await.unwrap();
    assert_eq!(session.phase(), QuizPhase::Playing);

    // Answers 1, 0, 2 for server questions 10, 11, 12: two correct.
    for answer in [1, 0, 2] {
        session.select_answer(AnswerIndex::new(answer)).unwrap();
        session.advance().unwrap();
    }
    assert_eq!(session.phase(), QuizPhase::Submitting);

    let outcome = service.submit(&mut session).await.unwrap();
    assert_eq!(session.phase(), QuizPhase::Scored);
    assert!(outcome.play_count_recorded);
    assert_eq!(api.play_count(quiz_id), 1);

    // The payload carries server identities, in traversal order.
    let submissions = api.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0],
        vec![
            RecordedAnswer::new(QuestionIndex::new(10), AnswerIndex::new(1)),
            RecordedAnswer::new(QuestionIndex::new(11), AnswerIndex::new(0)),
            RecordedAnswer::new(QuestionIndex::new(12), AnswerIndex::new(2)),
        ]
    );

    let score = &outcome.score;
    assert_eq!(score.correct_count, 2);
    assert_eq!(score.total_questions, 3);
    assert_eq!(score.max_score, 30);
    assert_eq!(score.score, 20);
    assert!((score.percentage - 66.67).abs() < f64::EPSILON);

    assert_eq!(
        score.stars(),
        StarRating {
            full: 3,
            half: false,
            empty: 2
        }
    );
    assert_eq!(score.feedback(), FeedbackTier::Good);
    assert_eq!(session.score(), Some(score));
}

#[tokio::test]
async fn fetch_failure_is_terminal_until_the_caller_retries() {
    let api = InMemoryApi::new();
    let quiz_id = seed_quiz(&api);
    let service = play_service(&api);

    api.fail_next_fetch(ApiError::Network("offline".into()));
    let err = service.load(quiz_id).await.unwrap_err();
    assert!(matches!(err, SessionError::Fetch(_)));

    // Manual retry is a fresh load.
    let session = service.load(quiz_id).await.unwrap();
    assert_eq!(session.phase(), QuizPhase::Playing);
}

#[tokio::test]
async fn failed_submit_keeps_answers_and_retry_resubmits_the_same_payload() {
    let api = InMemoryApi::new();
    let quiz_id = seed_quiz(&api);
    let service = play_service(&api);

    let mut session = service.load(quiz_id).await.unwrap();
    for answer in [1, 2, 2] {
        session.select_answer(AnswerIndex::new(answer)).unwrap();
        session.advance().unwrap();
    }

    api.fail_next_submit(ApiError::Network("offline".into()));
    let err = service.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::Submit(_)));
    assert_eq!(session.phase(), QuizPhase::Failed);
    assert_eq!(session.recorded_answers().len(), 3);

    let outcome = service.retry_submit(&mut session).await.unwrap();
    assert_eq!(session.phase(), QuizPhase::Scored);
    assert_eq!(outcome.score.correct_count, 3);

    let submissions = api.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0], submissions[1]);
}

#[tokio::test]
async fn play_count_failure_never_reverts_the_scored_session() {
    let api = InMemoryApi::new();
    let quiz_id = seed_quiz(&api);
    let service = play_service(&api);

    let mut session = service.load(quiz_id).await.unwrap();
    for answer in [1, 2, 2] {
        session.select_answer(AnswerIndex::new(answer)).unwrap();
        session.advance().unwrap();
    }

    api.fail_next_play_count(ApiError::Network("offline".into()));
    let outcome = service.submit(&mut session).await.unwrap();

    assert!(!outcome.play_count_recorded);
    assert_eq!(session.phase(), QuizPhase::Scored);
    assert_eq!(outcome.score.percentage, 100.0);
    assert_eq!(api.play_count(quiz_id), 0);
}

#[tokio::test]
async fn submit_outside_the_submitting_phase_is_rejected() {
    let api = InMemoryApi::new();
    let quiz_id = seed_quiz(&api);
    let service = play_service(&api);

    let mut session = service.load(quiz_id).await.unwrap();
    let err = service.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::NotReadyToSubmit));
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn restart_plays_the_same_quiz_from_scratch() {
    let api = InMemoryApi::new();
    let quiz_id = seed_quiz(&api);
    let service = play_service(&api);

    let mut session = service.load(quiz_id).await.unwrap();
    for answer in [1, 2, 2] {
        session.select_answer(AnswerIndex::new(answer)).unwrap();
        session.advance().unwrap();
    }
    service.submit(&mut session).await.unwrap();

    let mut fresh = session.restart(fixed_now());
    assert_eq!(fresh.phase(), QuizPhase::Playing);
    assert!(fresh.score().is_none());

    for answer in [1, 2, 2] {
        fresh.select_answer(AnswerIndex::new(answer)).unwrap();
        fresh.advance().unwrap();
    }
    let outcome = service.submit(&mut fresh).await.unwrap();
    assert_eq!(outcome.score.correct_count, 3);
    assert_eq!(api.play_count(quiz_id), 2);
}
