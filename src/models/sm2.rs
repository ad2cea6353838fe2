//! SM-2 derived review transition.
//!
//! This variant diverges from textbook SM-2 in two ways that the rest of the
//! crate depends on:
//! - Only quality 3 (`Easy`) takes the success branch; 0-2 all reset the item.
//! - On failure the ease factor drops by a flat 0.2 instead of the SM-2
//!   formula. The formula (with q graded out of 5) applies on success only.
//!
//! The ease factor never falls below 1.3 and the interval never below 1 day.

use super::{ReviewItem, ReviewQuality};
use chrono::{DateTime, Duration, Utc};

const MIN_EASE_FACTOR: f64 = 1.3;

/// Returns the item's state after one review at the given quality.
/// `now` is passed explicitly so callers (and tests) control the clock.
pub fn apply_review(item: &ReviewItem, quality: ReviewQuality, now: DateTime<Utc>) -> ReviewItem {
    let mut next = item.clone();

    if quality.is_success() {
        next.interval = match item.repetitions {
            0 => 1,
            1 => 6,
            _ => (item.interval as f64 * item.ease_factor).round() as u32,
        };
        next.repetitions = item.repetitions + 1;
        next.correct_streak = item.correct_streak + 1;

        // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
        let q = quality.grade();
        let ease = item.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
        next.ease_factor = ease.max(MIN_EASE_FACTOR);
    } else {
        next.interval = 1;
        next.repetitions = 0;
        next.correct_streak = 0;
        next.ease_factor = (item.ease_factor - 0.2).max(MIN_EASE_FACTOR);
    }

    next.next_review = now + Duration::days(next.interval as i64);
    next.last_reviewed = Some(now);

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn fresh_item(now: DateTime<Utc>) -> ReviewItem {
        ReviewItem::new("q1".into(), "react".into(), Difficulty::Medium, now)
    }

    #[test]
    fn test_first_success_one_day() {
        let now = Utc::now();
        let next = apply_review(&fresh_item(now), ReviewQuality::Easy, now);

        assert_eq!(next.interval, 1);
        assert_eq!(next.repetitions, 1);
        assert_eq!(next.correct_streak, 1);
        assert_eq!(next.next_review, now + Duration::days(1));
        assert_eq!(next.last_reviewed, Some(now));
    }

    #[test]
    fn test_second_success_six_days() {
        let now = Utc::now();
        let once = apply_review(&fresh_item(now), ReviewQuality::Easy, now);
        let twice = apply_review(&once, ReviewQuality::Easy, now);

        assert_eq!(twice.interval, 6);
        assert_eq!(twice.repetitions, 2);
    }

    #[test]
    fn test_third_success_multiplies_by_ease() {
        let now = Utc::now();
        let once = apply_review(&fresh_item(now), ReviewQuality::Easy, now);
        let twice = apply_review(&once, ReviewQuality::Easy, now);
        let thrice = apply_review(&twice, ReviewQuality::Easy, now);

        let expected = (6.0 * twice.ease_factor).round() as u32;
        assert_eq!(thrice.interval, expected);
        assert_eq!(thrice.repetitions, 3);
    }

    #[test]
    fn test_success_ease_drops_by_formula() {
        // q = 3 gives a delta of 0.1 - 2 * 0.12 = -0.14.
        let now = Utc::now();
        let next = apply_review(&fresh_item(now), ReviewQuality::Easy, now);
        assert!((next.ease_factor - 2.36).abs() < 1e-9);
    }

    #[test]
    fn test_failure_resets_progress() {
        let now = Utc::now();
        let mut item = fresh_item(now);
        item.interval = 15;
        item.repetitions = 4;
        item.correct_streak = 4;

        for quality in [ReviewQuality::Again, ReviewQuality::Hard, ReviewQuality::Good] {
            let next = apply_review(&item, quality, now);
            assert_eq!(next.interval, 1);
            assert_eq!(next.repetitions, 0);
            assert_eq!(next.correct_streak, 0);
            assert!((next.ease_factor - 2.3).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ease_factor_never_below_floor() {
        let now = Utc::now();
        let mut item = fresh_item(now);
        for _ in 0..20 {
            item = apply_review(&item, ReviewQuality::Again, now);
            assert!(item.ease_factor >= 1.3);
        }
        for _ in 0..20 {
            item = apply_review(&item, ReviewQuality::Easy, now);
            assert!(item.ease_factor >= 1.3);
        }
    }
}
