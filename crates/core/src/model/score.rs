use serde::{Deserialize, Serialize};

//
// ─── SCORE RESULT ──────────────────────────────────────────────────────────────
//

/// Authoritative scoring outcome returned by the server after a submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "correct_answers")]
    pub correct_count: u32,
    pub total_questions: u32,
    pub max_score: u32,
    pub score: u32,
    pub percentage: f64,
}

impl ScoreResult {
    /// Star rating for this result's percentage.
    #[must_use]
    pub fn stars(&self) -> StarRating {
        StarRating::from_percentage(self.percentage)
    }

    /// Feedback tier for this result's percentage.
    #[must_use]
    pub fn feedback(&self) -> FeedbackTier {
        FeedbackTier::from_percentage(self.percentage)
    }
}

//
// ─── STAR RATING ───────────────────────────────────────────────────────────────
//

/// Five-slot star rendering of a percentage score.
///
/// `full + half + empty` always equals 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    /// Compute the star split for a percentage in `[0, 100]`.
    ///
    /// Values outside the range are clamped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_percentage(percentage: f64) -> Self {
        let star_count = (percentage.clamp(0.0, 100.0) / 100.0) * 5.0;
        let full = star_count.floor();
        let half = star_count - full >= 0.5;
        let full = full as u8;
        let empty = 5 - full - u8::from(half);
        Self { full, half, empty }
    }
}

//
// ─── FEEDBACK TIER ─────────────────────────────────────────────────────────────
//

/// Qualitative feedback band for a percentage score.
///
/// Thresholds are inclusive lower bounds checked from the top down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackTier {
    Perfect,
    Great,
    Good,
    Low,
}

impl FeedbackTier {
    /// Classify a percentage: 100 is Perfect, >= 80 Great, >= 50 Good,
    /// anything below Low.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Perfect
        } else if percentage >= 80.0 {
            Self::Great
        } else if percentage >= 50.0 {
            Self::Good
        } else {
            Self::Low
        }
    }

    /// Player-facing message for the tier.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Perfect => "Perfect Score!",
            Self::Great => "Great job!",
            Self::Good => "Nice try!",
            Self::Low => "Better luck next time!",
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_slots_always_sum_to_five() {
        for p in 0..=100 {
            let stars = StarRating::from_percentage(f64::from(p));
            assert_eq!(
                stars.full + u8::from(stars.half) + stars.empty,
                5,
                "sum broken at {p}%"
            );
        }
    }

    #[test]
    fn star_boundaries() {
        assert_eq!(
            StarRating::from_percentage(0.0),
            StarRating {
                full: 0,
                half: false,
                empty: 5
            }
        );
        assert_eq!(
            StarRating::from_percentage(100.0),
            StarRating {
                full: 5,
                half: false,
                empty: 0
            }
        );
        // 10% steps: each adds half a star.
        assert_eq!(
            StarRating::from_percentage(10.0),
            StarRating {
                full: 0,
                half: true,
                empty: 4
            }
        );
        assert_eq!(
            StarRating::from_percentage(50.0),
            StarRating {
                full: 2,
                half: true,
                empty: 2
            }
        );
        assert_eq!(
            StarRating::from_percentage(90.0),
            StarRating {
                full: 4,
                half: true,
                empty: 0
            }
        );
    }

    #[test]
    fn two_of_three_correct_rounds_to_three_full_stars() {
        // 66.67% -> 3.3335 stars: fraction below one half.
        let stars = StarRating::from_percentage(66.67);
        assert_eq!(
            stars,
            StarRating {
                full: 3,
                half: false,
                empty: 2
            }
        );
    }

    #[test]
    fn out_of_range_percentages_clamp() {
        assert_eq!(StarRating::from_percentage(-3.0).empty, 5);
        assert_eq!(StarRating::from_percentage(140.0).full, 5);
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(FeedbackTier::from_percentage(100.0), FeedbackTier::Perfect);
        assert_eq!(FeedbackTier::from_percentage(99.9), FeedbackTier::Great);
        assert_eq!(FeedbackTier::from_percentage(80.0), FeedbackTier::Great);
        assert_eq!(FeedbackTier::from_percentage(79.9), FeedbackTier::Good);
        assert_eq!(FeedbackTier::from_percentage(50.0), FeedbackTier::Good);
        assert_eq!(FeedbackTier::from_percentage(49.9), FeedbackTier::Low);
        assert_eq!(FeedbackTier::from_percentage(0.0), FeedbackTier::Low);
    }

    #[test]
    fn score_result_deserializes_wire_names() {
        let payload = serde_json::json!({
            "correct_answers": 2,
            "total_questions": 3,
            "max_score": 30,
            "score": 20,
            "percentage": 66.67
        });
        let result: ScoreResult = serde_json::from_value(payload).unwrap();
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.score, 20);
        assert_eq!(result.feedback(), FeedbackTier::Good);
        assert_eq!(result.feedback().message(), "Nice try!");
    }
}
