use chrono::{DateTime, Duration, Utc};
use socialpulse_engine::{
    ActionPriority, ClaimOutcome, GamificationEngine, MemoryStore, SpendOutcome, StreakKind,
    StreakUpdate, UnlockOutcome, earnings_velocity, near_miss_alerts, next_best_actions,
};

fn at(rfc: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc).unwrap().with_timezone(&Utc)
}

#[test]
fn three_day_login_run_accumulates_rewards() {
    let engine = GamificationEngine::new(MemoryStore::default());
    let start = at("2025-03-01T08:00:00Z");

    let mut claimed_cents = 0;
    for day in 0..3 {
        let now = start + Duration::days(day);
        let (_, outcome) = engine.claim_daily_login_reward_at(now);
        let ClaimOutcome::Claimed { cents, xp, .. } = outcome else {
            panic!("day {day} should claim");
        };
        assert_eq!(xp, 100);
        claimed_cents += cents;

        // A second tap the same day is a no-op.
        let (_, again) = engine.claim_daily_login_reward_at(now + Duration::hours(3));
        assert_eq!(again, ClaimOutcome::AlreadyClaimedToday);
    }

    let state = engine.load_at(start + Duration::days(2));
    assert_eq!(state.daily_login.current_streak, 3);
    assert_eq!(state.daily_login.total_earned_cents, claimed_cents);
    // Schedule days 1-3 pay 25 + 30 + 35 cents.
    assert_eq!(claimed_cents, 90);
    // Coins mirror cents at the fixed 100:1-per-dollar ratio.
    assert_eq!(state.creator_coins.balance, 90);
    assert_eq!(state.user_level.xp, 300);
}

#[test]
fn bulk_xp_award_crosses_three_levels() {
    let engine = GamificationEngine::new(MemoryStore::default());
    let now = at("2025-03-01T08:00:00Z");

    let state = engine.add_xp_at(6_500, now);
    assert_eq!(state.user_level.level, 4);
    assert_eq!(state.user_level.xp, 500);
    assert!(state.user_level.xp < state.user_level.xp_to_next);

    let reloaded = engine.load_at(now);
    assert_eq!(reloaded.user_level.level, 4);
}

#[test]
fn achievement_unlock_is_idempotent_across_reloads() {
    let engine = GamificationEngine::new(MemoryStore::default());
    let now = at("2025-03-01T08:00:00Z");

    let (state, outcome) = engine.unlock_achievement_at("week-streak", now);
    let UnlockOutcome::Unlocked { coins, xp } = outcome else {
        panic!("expected unlock");
    };
    assert_eq!(coins, 1_000);
    assert_eq!(xp, 500);
    let balance = state.creator_coins.balance;
    let level_xp = (state.user_level.level, state.user_level.xp);

    let (state, outcome) = engine.unlock_achievement_at("week-streak", now + Duration::hours(1));
    assert_eq!(outcome, UnlockOutcome::AlreadyUnlocked);
    assert_eq!(state.creator_coins.balance, balance);
    assert_eq!((state.user_level.level, state.user_level.xp), level_xp);
}

#[test]
fn progress_driven_unlock_pays_exactly_once() {
    let engine = GamificationEngine::new(MemoryStore::default());
    let now = at("2025-03-01T08:00:00Z");

    engine.update_achievement_progress_at("hundred-club", 60, now);
    let mid = engine.load_at(now);
    assert!(!mid.achievements.iter().any(|a| a.unlocked));

    let (state, _) = engine.update_achievement_progress_at("hundred-club", 100, now);
    let unlocked = state
        .achievements
        .iter()
        .find(|a| a.id == "hundred-club")
        .unwrap();
    assert!(unlocked.unlocked);
    assert_eq!(state.creator_coins.balance, 2_500);

    // Pushing progress further changes nothing.
    let (state, _) = engine.update_achievement_progress_at("hundred-club", 500, now);
    assert_eq!(state.creator_coins.balance, 2_500);
}

#[test]
fn spend_guard_on_exact_balance() {
    let engine = GamificationEngine::new(MemoryStore::default());
    let now = at("2025-03-01T08:00:00Z");

    let state = engine.add_coins_at(250, now);
    assert_eq!(state.creator_coins.balance, 250);

    let (_, declined) = engine.spend_coins_at(251, now);
    assert!(matches!(declined, SpendOutcome::Declined { .. }));

    let (state, spent) = engine.spend_coins_at(250, now);
    assert!(matches!(spent, SpendOutcome::Spent { remaining: 0 }));
    assert_eq!(state.creator_coins.balance, 0);
    assert_eq!(state.creator_coins.lifetime_earned, 250);
}

#[test]
fn streak_machine_through_the_engine() {
    let engine = GamificationEngine::new(MemoryStore::default());
    let t0 = at("2025-03-01T08:00:00Z");

    let (_, u) = engine.update_streak_at(StreakKind::Posting, t0);
    assert_eq!(u, StreakUpdate::Started);
    let (_, u) = engine.update_streak_at(StreakKind::Posting, t0 + Duration::hours(23));
    assert_eq!(u, StreakUpdate::Held);
    let (state, u) = engine.update_streak_at(StreakKind::Posting, t0 + Duration::hours(30));
    assert_eq!(u, StreakUpdate::Extended);
    assert_eq!(state.streaks.posting.current, 2);

    let (state, u) = engine.update_streak_at(StreakKind::Posting, t0 + Duration::hours(30 + 49));
    assert_eq!(u, StreakUpdate::Reset);
    assert_eq!(state.streaks.posting.current, 1);
    assert_eq!(state.streaks.posting.longest, 2);
}

#[test]
fn derived_views_reflect_built_up_state() {
    let engine = GamificationEngine::new(MemoryStore::default());
    let start = at("2025-03-01T08:00:00Z");

    // Build earnings history through real transitions.
    for day in 0..3 {
        engine.claim_daily_login_reward_at(start + Duration::days(day));
    }
    engine.update_achievement_progress_at("hundred-club", 85, start + Duration::days(3));

    let state = engine.load_at(start + Duration::days(3));

    let alerts = near_miss_alerts(&state);
    assert!(
        alerts
            .iter()
            .any(|a| a.message.contains("Hundred Club")),
        "85/100 progress should produce a near-miss nudge"
    );

    let actions = next_best_actions(&state);
    assert!(!actions.is_empty());
    assert!(actions.len() <= 5);
    assert!(
        actions
            .iter()
            .any(|a| a.priority == ActionPriority::Medium),
        "near-complete achievement should be recommended"
    );

    let velocity = earnings_velocity(&state.earnings_samples);
    assert!(velocity.hourly_cents > 0.0);
    assert!((velocity.daily_cents - velocity.hourly_cents * 24.0).abs() < 1e-9);
}
