//! SM-2 Spaced Repetition Algorithm
//!
//! Implementation of the SuperMemo 2 algorithm for calculating
//! optimal review intervals based on user performance.
//!
//! Review qualities map onto the classical 0-5 grade scale through
//! [`SchedulerConfig`]. Grades below 3 count as a failed recall:
//! - Again -> 1 (incorrect, but recognized)
//! - Hard  -> 2 (incorrect, but the answer seemed familiar)
//! - Good  -> 4 (correct with hesitation)
//! - Easy  -> 5 (perfect)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::models::{CardState, CardStatus, ReviewQuality};

/// Grades at or above this count as a successful recall
pub const PASSING_GRADE: u8 = 3;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Tunable scheduler constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub initial_ease: f64,
    pub min_ease: f64,
    /// Ease lost on an Again review
    pub again_penalty: f64,
    /// Ease lost on a Hard review
    pub hard_penalty: f64,
    pub again_interval_days: f64,
    pub hard_interval_days: f64,
    pub first_interval_days: f64,
    pub second_interval_days: f64,
    /// Upper bound on any scheduled interval
    pub max_interval_days: f64,
    pub again_grade: u8,
    pub hard_grade: u8,
    pub good_grade: u8,
    pub easy_grade: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            min_ease: 1.3,
            again_penalty: 0.2,
            hard_penalty: 0.15,
            again_interval_days: 1.0,
            hard_interval_days: 0.5,
            first_interval_days: 1.0,
            second_interval_days: 6.0,
            max_interval_days: 36_500.0,
            again_grade: 1,
            hard_grade: 2,
            good_grade: 4,
            easy_grade: 5,
        }
    }
}

impl SchedulerConfig {
    /// Map a review quality to its SM-2 grade (0-5)
    pub fn grade(&self, quality: ReviewQuality) -> u8 {
        let grade = match quality {
            ReviewQuality::Again => self.again_grade,
            ReviewQuality::Hard => self.hard_grade,
            ReviewQuality::Good => self.good_grade,
            ReviewQuality::Easy => self.easy_grade,
        };
        grade.min(5)
    }
}

/// Convert a (possibly fractional) day count to a whole-second duration.
/// Returns `None` when the day count does not fit in a `Duration`.
pub fn interval_duration(days: f64) -> Option<Duration> {
    let seconds = (days * SECONDS_PER_DAY).round();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_seconds(seconds as i64)
}

/// Timestamp `days` after `from`, saturating at the latest representable date
pub fn due_after(from: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    interval_duration(days)
        .and_then(|d| from.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Calculate the state a card moves to after a review.
///
/// Pure: the same state, quality, timestamp and config always give the
/// same result.
pub fn calculate_next_review(
    state: &CardState,
    quality: ReviewQuality,
    reviewed_at: DateTime<Utc>,
    config: &SchedulerConfig,
) -> CardState {
    let grade = config.grade(quality);
    let mut next = state.clone();

    if grade >= PASSING_GRADE {
        next.repetitions = state.repetitions + 1;
        next.interval_days = match next.repetitions {
            1 => config.first_interval_days,
            2 => config.second_interval_days,
            _ => (state.interval_days * state.ease_factor).round(),
        };

        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        let q = f64::from(5 - grade);
        next.ease_factor = (state.ease_factor + (0.1 - q * (0.08 + q * 0.02))).max(config.min_ease);

        next.status = if next.repetitions == 1 {
            CardStatus::Learning
        } else {
            CardStatus::Review
        };
        next.correct_count += 1;
    } else {
        let (interval, penalty) = match quality {
            ReviewQuality::Hard => (config.hard_interval_days, config.hard_penalty),
            _ => (config.again_interval_days, config.again_penalty),
        };
        next.repetitions = 0;
        next.interval_days = interval;
        next.ease_factor = (state.ease_factor - penalty).max(config.min_ease);
        next.lapses += 1;

        next.status = if state.status == CardStatus::Review {
            CardStatus::Relearning
        } else {
            CardStatus::Learning
        };
    }

    next.interval_days = next.interval_days.clamp(0.0, config.max_interval_days.max(0.0));
    next.review_count += 1;
    next.last_reviewed = Some(reviewed_at);
    next.due_date = due_after(reviewed_at, next.interval_days);

    log::debug!(
        "SM-2 {} (grade {}): interval {} -> {}, ease {:.2} -> {:.2}",
        quality,
        grade,
        state.interval_days,
        next.interval_days,
        state.ease_factor,
        next.ease_factor
    );

    next
}

/// Interval each quality would give, in `ReviewQuality::ALL` order.
/// Used to show users what interval each rating would give
pub fn preview_intervals(state: &CardState, config: &SchedulerConfig) -> [f64; 4] {
    ReviewQuality::ALL.map(|q| calculate_next_review(state, q, state.due_date, config).interval_days)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: f64) -> String {
    if days <= 0.0 {
        return "now".to_string();
    }
    if days < 1.0 {
        let hours = ((days * 24.0).round() as i64).max(1);
        return format!("{}h", hours);
    }

    let days = days.round() as i64;
    if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
