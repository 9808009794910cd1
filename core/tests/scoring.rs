//! ScoreEngine: unlocks, append-only achievements, points and levels.

use chrono::Duration;
use wealthpulse_core::{
    score_engine::{score, update_achievements, Achievement},
    state::UnlockedSet,
};

mod common;
use common::{daily_history, growth_record, params, t0};

fn unlocked_ids(achievements: &[Achievement]) -> Vec<&str> {
    achievements
        .iter()
        .filter(|a| a.unlocked)
        .map(|a| a.id.as_str())
        .collect()
}

#[test]
fn nothing_unlocks_on_empty_history() {
    let mut unlocked = UnlockedSet::new();
    let achievements = update_achievements(&[], &mut unlocked, t0());
    assert_eq!(achievements.len(), 3);
    assert!(unlocked_ids(&achievements).is_empty());
    assert!(unlocked.is_empty());
}

#[test]
fn first_simulation_unlocks_once() {
    let history = vec![growth_record("r0", t0(), params(1_000.0, 100.0, 12, "cdb"))];
    let mut unlocked = UnlockedSet::new();

    update_achievements(&history, &mut unlocked, t0());
    let later = t0() + Duration::days(3);
    let achievements = update_achievements(&history, &mut unlocked, later);

    assert_eq!(unlocked_ids(&achievements), vec!["first_simulation"]);
    // The original unlock time is kept.
    assert_eq!(achievements[0].unlocked_at, Some(t0()));
}

#[test]
fn explorer_needs_ten_simulations() {
    let mut unlocked = UnlockedSet::new();
    let nine = daily_history(9, t0(), |_| params(1_000.0, 100.0, 12, "cdb"));
    assert!(!unlocked_ids(&update_achievements(&nine, &mut unlocked, t0())).contains(&"explorer"));

    let ten = daily_history(10, t0(), |_| params(1_000.0, 100.0, 12, "cdb"));
    assert!(unlocked_ids(&update_achievements(&ten, &mut unlocked, t0())).contains(&"explorer"));
}

#[test]
fn weekly_consistency_uses_trailing_seven_days() {
    let history = daily_history(5, t0(), |_| params(1_000.0, 100.0, 12, "cdb"));

    let mut unlocked = UnlockedSet::new();
    let achievements = update_achievements(&history, &mut unlocked, t0());
    assert!(unlocked_ids(&achievements).contains(&"weekly_consistency"));

    // Three days on, the oldest records fall outside the window.
    let mut fresh = UnlockedSet::new();
    let achievements = update_achievements(&history, &mut fresh, t0() + Duration::days(3));
    assert!(!unlocked_ids(&achievements).contains(&"weekly_consistency"));
}

#[test]
fn unlocked_achievements_are_never_revoked() {
    let ten = daily_history(10, t0(), |_| params(1_000.0, 100.0, 12, "cdb"));
    let mut unlocked = UnlockedSet::new();
    update_achievements(&ten, &mut unlocked, t0());

    let achievements = update_achievements(&ten[..1], &mut unlocked, t0() + Duration::days(30));
    assert_eq!(
        unlocked_ids(&achievements),
        vec!["first_simulation", "explorer", "weekly_consistency"]
    );
}

#[test]
fn score_follows_the_formula() {
    let history = daily_history(11, t0(), |_| params(1_000.0, 500.0, 12, "cdb"));
    let mut unlocked = UnlockedSet::new();
    let achievements = update_achievements(&history, &mut unlocked, t0());
    let s = score(&history, &achievements);

    // 10 + 50 + 30 rewards, 11 × 5 activity, min(100, 22) consistency.
    assert_eq!(s.category_breakdown.achievements, 90);
    assert_eq!(s.category_breakdown.activity, 55);
    assert_eq!(s.category_breakdown.consistency, 22);
    assert_eq!(s.total, 167);
    assert_eq!(s.level, 2);
    assert_eq!(s.points_to_next_level, 33);
}

#[test]
fn consistency_points_cap_at_one_hundred() {
    let history = daily_history(80, t0(), |_| params(1_000.0, 100.0, 12, "cdb"));
    let s = score(&history, &[]);
    assert_eq!(s.category_breakdown.consistency, 100);
    assert_eq!(s.total, 80 * 5 + 100);
}

#[test]
fn score_is_monotonic_in_history() {
    let full = daily_history(30, t0(), |i| params(1_000.0, 100.0, 12 + i as u32, "cdb"));
    let mut unlocked = UnlockedSet::new();
    let mut previous = 0;

    for n in 0..=full.len() {
        let prefix = &full[..n];
        let now = prefix.last().map_or(t0(), |r| r.created_at);
        let achievements = update_achievements(prefix, &mut unlocked, now);
        let total = score(prefix, &achievements).total;
        assert!(total >= previous, "score dropped from {previous} to {total} at {n} records");
        previous = total;
    }
}

#[test]
fn exact_level_boundary_needs_a_full_level() {
    let history = daily_history(10, t0(), |_| params(1_000.0, 100.0, 12, "cdb"));
    // 50 activity + 20 consistency + 30 from a hand-built achievement = 100.
    let bonus = Achievement {
        id: "bonus".into(),
        name: "Bonus".into(),
        criteria: "test".into(),
        point_reward: 30,
        unlocked: true,
        unlocked_at: Some(t0()),
    };
    let s = score(&history, &[bonus]);
    assert_eq!(s.total, 100);
    assert_eq!(s.level, 2);
    assert_eq!(s.points_to_next_level, 100);
}
