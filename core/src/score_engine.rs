//! Score engine — achievements, points and levels.
//!
//! RULE: Achievements are append-only. An id in the caller's
//! UnlockedSet stays unlocked with its original timestamp, even if
//! the history that earned it is gone.

use crate::{
    record::SimulationRecord,
    state::UnlockedSet,
    types::{ItemId, Timestamp},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const POINTS_PER_SIMULATION: u32 = 5;
pub const CONSISTENCY_POINTS_PER_SIMULATION: u32 = 2;
pub const CONSISTENCY_POINTS_CAP: u32 = 100;
pub const POINTS_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstSimulation,
    Explorer,
    WeeklyConsistency,
}

impl AchievementKind {
    /// Catalog order. Append only.
    pub const ALL: [AchievementKind; 3] = [
        AchievementKind::FirstSimulation,
        AchievementKind::Explorer,
        AchievementKind::WeeklyConsistency,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::FirstSimulation   => "first_simulation",
            Self::Explorer          => "explorer",
            Self::WeeklyConsistency => "weekly_consistency",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstSimulation   => "First Steps",
            Self::Explorer          => "Explorer",
            Self::WeeklyConsistency => "Weekly Consistency",
        }
    }

    pub fn criteria(&self) -> &'static str {
        match self {
            Self::FirstSimulation   => "Run your first simulation",
            Self::Explorer          => "Run 10 simulations",
            Self::WeeklyConsistency => "Run 5 simulations within 7 days",
        }
    }

    pub fn point_reward(&self) -> u32 {
        match self {
            Self::FirstSimulation   => 10,
            Self::Explorer          => 50,
            Self::WeeklyConsistency => 30,
        }
    }

    fn is_met(&self, history: &[SimulationRecord], now: Timestamp) -> bool {
        match self {
            Self::FirstSimulation => !history.is_empty(),
            Self::Explorer        => history.len() >= 10,
            Self::WeeklyConsistency => {
                let since = now - Duration::days(7);
                history
                    .iter()
                    .filter(|r| r.created_at > since && r.created_at <= now)
                    .count()
                    >= 5
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id:           ItemId,
    pub name:         String,
    pub criteria:     String,
    pub point_reward: u32,
    pub unlocked:     bool,
    pub unlocked_at:  Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub activity:     u32,
    pub consistency:  u32,
    pub achievements: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScore {
    pub total:                u32,
    pub category_breakdown:   ScoreBreakdown,
    pub level:                u32,
    pub points_to_next_level: u32,
}

/// Check every catalog entry against `history`, record new unlocks in
/// `unlocked`, and return the full catalog with its current status.
pub fn update_achievements(
    history: &[SimulationRecord],
    unlocked: &mut UnlockedSet,
    now: Timestamp,
) -> Vec<Achievement> {
    AchievementKind::ALL
        .iter()
        .map(|kind| {
            if !unlocked.contains_key(kind.id()) && kind.is_met(history, now) {
                unlocked.insert(kind.id().to_string(), now);
                log::info!("achievement unlocked: {} (+{} pts)", kind.id(), kind.point_reward());
            }
            let unlocked_at = unlocked.get(kind.id()).copied();
            Achievement {
                id:           kind.id().to_string(),
                name:         kind.name().to_string(),
                criteria:     kind.criteria().to_string(),
                point_reward: kind.point_reward(),
                unlocked:     unlocked_at.is_some(),
                unlocked_at,
            }
        })
        .collect()
}

pub fn score(history: &[SimulationRecord], achievements: &[Achievement]) -> UserScore {
    let simulations = u32::try_from(history.len()).unwrap_or(u32::MAX);

    let breakdown = ScoreBreakdown {
        activity:     simulations.saturating_mul(POINTS_PER_SIMULATION),
        consistency:  simulations
            .saturating_mul(CONSISTENCY_POINTS_PER_SIMULATION)
            .min(CONSISTENCY_POINTS_CAP),
        achievements: achievements
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.point_reward)
            .sum(),
    };
    let total = breakdown
        .activity
        .saturating_add(breakdown.consistency)
        .saturating_add(breakdown.achievements);
    let level = total / POINTS_PER_LEVEL + 1;

    UserScore {
        total,
        category_breakdown: breakdown,
        level,
        points_to_next_level: level.saturating_mul(POINTS_PER_LEVEL).saturating_sub(total),
    }
}
