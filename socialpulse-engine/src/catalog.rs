//! Static seed data: achievement catalog, login reward schedule, daily
//! challenge pool, and demo creator roster.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::achievements::{Achievement, AchievementCategory};
use crate::daily::{DailyChallenge, DailyLoginReward};

struct AchievementDef {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: AchievementCategory,
    icon: &'static str,
    dollar_cents: i64,
    reward: &'static str,
    target: Option<u32>,
}

const ACHIEVEMENT_DEFS: &[AchievementDef] = &[
    AchievementDef {
        id: "first-dollar",
        title: "First Dollar",
        description: "Earn your first dollar of creator revenue",
        category: AchievementCategory::Revenue,
        icon: "💵",
        dollar_cents: 500,
        reward: "500 Creator Coins",
        target: Some(1),
    },
    AchievementDef {
        id: "hundred-club",
        title: "Hundred Club",
        description: "Reach $100 in lifetime revenue",
        category: AchievementCategory::Revenue,
        icon: "💰",
        dollar_cents: 2_500,
        reward: "2,500 Creator Coins",
        target: Some(100),
    },
    AchievementDef {
        id: "week-streak",
        title: "Seven in a Row",
        description: "Keep a 7-day login streak alive",
        category: AchievementCategory::Streak,
        icon: "🔥",
        dollar_cents: 1_000,
        reward: "1,000 Creator Coins",
        target: Some(7),
    },
    AchievementDef {
        id: "month-streak",
        title: "Iron Month",
        description: "Keep a 30-day login streak alive",
        category: AchievementCategory::Streak,
        icon: "🗓️",
        dollar_cents: 5_000,
        reward: "5,000 Creator Coins",
        target: Some(30),
    },
    AchievementDef {
        id: "task-starter",
        title: "Task Starter",
        description: "Complete 10 daily challenges",
        category: AchievementCategory::Task,
        icon: "✅",
        dollar_cents: 1_500,
        reward: "1,500 Creator Coins",
        target: Some(10),
    },
    AchievementDef {
        id: "task-machine",
        title: "Task Machine",
        description: "Complete 50 daily challenges",
        category: AchievementCategory::Task,
        icon: "⚙️",
        dollar_cents: 4_000,
        reward: "4,000 Creator Coins",
        target: Some(50),
    },
    AchievementDef {
        id: "first-thousand",
        title: "First Thousand",
        description: "Reach 1,000 followers across platforms",
        category: AchievementCategory::Social,
        icon: "👥",
        dollar_cents: 2_000,
        reward: "2,000 Creator Coins",
        target: Some(1_000),
    },
    AchievementDef {
        id: "viral-moment",
        title: "Viral Moment",
        description: "Pass 100,000 views on a single post",
        category: AchievementCategory::Social,
        icon: "🚀",
        dollar_cents: 3_000,
        reward: "3,000 Creator Coins",
        target: Some(100_000),
    },
    AchievementDef {
        id: "level-ten",
        title: "Double Digits",
        description: "Reach creator level 10",
        category: AchievementCategory::Milestone,
        icon: "🎯",
        dollar_cents: 2_500,
        reward: "2,500 Creator Coins",
        target: Some(10),
    },
    AchievementDef {
        id: "all-platforms",
        title: "Everywhere at Once",
        description: "Connect all three platforms",
        category: AchievementCategory::Milestone,
        icon: "🌐",
        dollar_cents: 1_000,
        reward: "1,000 Creator Coins",
        target: Some(3),
    },
];

/// Instantiate the full achievement catalog, everything locked.
#[must_use]
pub fn default_achievements() -> Vec<Achievement> {
    ACHIEVEMENT_DEFS
        .iter()
        .map(|def| Achievement {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            category: def.category,
            icon: def.icon.to_string(),
            dollar_cents: def.dollar_cents,
            reward: def.reward.to_string(),
            target: def.target,
            unlocked: false,
            unlocked_at: None,
            progress: None,
        })
        .collect()
}

/// Cents paid on each day of the 30-day login schedule. Ascends steadily
/// with bonus jumps on days 7, 14, 21, 28 and a big day-30 finale.
const REWARD_SCHEDULE_CENTS: [i64; 30] = [
    25, 30, 35, 40, 45, 50, 100, // week 1
    105, 110, 115, 120, 125, 130, 200, // week 2
    205, 210, 215, 220, 225, 230, 300, // week 3
    305, 310, 315, 320, 325, 330, 400, // week 4
    450, 1_000,
];

/// Build the fixed 30-day login reward schedule, unclaimed.
#[must_use]
pub fn reward_schedule() -> Vec<DailyLoginReward> {
    REWARD_SCHEDULE_CENTS
        .iter()
        .enumerate()
        .map(|(i, cents)| DailyLoginReward {
            day: i as u32 + 1,
            dollar_cents: *cents,
            claimed: false,
            claimed_at: None,
        })
        .collect()
}

struct ChallengeDef {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    dollar_cents: i64,
    xp_reward: i64,
    target: u32,
}

const CHALLENGE_DEFS: &[ChallengeDef] = &[
    ChallengeDef {
        id: "post-today",
        title: "Ship Something",
        description: "Publish one post on any platform",
        dollar_cents: 200,
        xp_reward: 150,
        target: 1,
    },
    ChallengeDef {
        id: "engage-fans",
        title: "Talk Back",
        description: "Reply to 5 comments from your audience",
        dollar_cents: 150,
        xp_reward: 100,
        target: 5,
    },
    ChallengeDef {
        id: "check-analytics",
        title: "Know Your Numbers",
        description: "Review your analytics dashboard",
        dollar_cents: 100,
        xp_reward: 75,
        target: 1,
    },
    ChallengeDef {
        id: "cross-promote",
        title: "Spread the Word",
        description: "Share your latest post to 2 other platforms",
        dollar_cents: 250,
        xp_reward: 200,
        target: 2,
    },
];

/// Instantiate today's challenge set with the given expiry.
#[must_use]
pub fn daily_challenges(expires_at: DateTime<Utc>) -> Vec<DailyChallenge> {
    CHALLENGE_DEFS
        .iter()
        .map(|def| DailyChallenge {
            id: def.id.to_string(),
            title: def.title.to_string(),
            description: def.description.to_string(),
            dollar_cents: def.dollar_cents,
            xp_reward: def.xp_reward,
            progress: 0,
            target: def.target,
            completed: false,
            expires_at,
        })
        .collect()
}

/// Demo creator roster used to populate the mock leaderboard.
pub struct DemoCreator {
    pub name: &'static str,
    pub handle: &'static str,
    /// Baseline monthly earnings in cents, before seeded jitter.
    pub base_cents: i64,
    pub level: u32,
}

pub static DEMO_CREATORS: Lazy<Vec<DemoCreator>> = Lazy::new(|| {
    const ROSTER: &[(&str, &str, i64, u32)] = &[
        ("Maya Chen", "@mayacreates", 1_250_000, 34),
        ("Jordan Reyes", "@jreyfilms", 980_000, 29),
        ("Priya Patel", "@priyatalks", 860_000, 27),
        ("Sam Okafor", "@samcooks", 720_000, 24),
        ("Lena Fischer", "@lenabuilds", 640_000, 22),
        ("Diego Santos", "@diegoplays", 510_000, 19),
        ("Aisha Bello", "@aishastyle", 430_000, 17),
        ("Tom Novak", "@tomtravels", 350_000, 14),
        ("Yuki Tanaka", "@yukidraws", 270_000, 12),
        ("Omar Haddad", "@omarteaches", 190_000, 9),
    ];
    ROSTER
        .iter()
        .map(|(name, handle, base_cents, level)| DemoCreator {
            name,
            handle,
            base_cents: *base_cents,
            level: *level,
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn catalog_has_ten_unique_achievements() {
        let achievements = default_achievements();
        assert_eq!(achievements.len(), 10);
        let mut ids: Vec<_> = achievements.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        assert!(achievements.iter().all(|a| !a.unlocked));
    }

    #[test]
    fn reward_schedule_covers_thirty_days() {
        let schedule = reward_schedule();
        assert_eq!(schedule.len(), 30);
        assert_eq!(schedule[0].day, 1);
        assert_eq!(schedule[29].day, 30);
        assert!(schedule.iter().all(|r| r.dollar_cents > 0 && !r.claimed));
        // The finale is the largest single payout.
        let max = schedule.iter().map(|r| r.dollar_cents).max().unwrap();
        assert_eq!(schedule[29].dollar_cents, max);
    }

    #[test]
    fn challenge_pool_has_four_entries() {
        let expiry = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let challenges = daily_challenges(expiry);
        assert_eq!(challenges.len(), 4);
        assert!(challenges.iter().all(|c| c.target > 0 && !c.completed));
    }
}
