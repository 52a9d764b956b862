//! Loyalty levels, daily rewards, badges and the prize wheel.

use std::sync::Arc;

use commerce_core::{Action, GamificationData, GamificationUpdate, Store};
use rand::Rng;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Points granted by the daily reward.
pub const DAILY_REWARD_POINTS: u64 = 25;

/// A loyalty band. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub level: u32,
    pub name: &'static str,
    pub min_points: u64,
    pub max_points: u64,
}

impl Level {
    pub fn contains(&self, points: u64) -> bool {
        (self.min_points..=self.max_points).contains(&points)
    }
}

#[rustfmt::skip]
pub const LEVELS: [Level; 6] = [
    Level { level: 1, name: "Newbie Shopper", min_points: 0, max_points: 100 },
    Level { level: 2, name: "Smart Buyer", min_points: 101, max_points: 300 },
    Level { level: 3, name: "Savvy Shopper", min_points: 301, max_points: 600 },
    Level { level: 4, name: "Shopping Expert", min_points: 601, max_points: 1000 },
    Level { level: 5, name: "Shopping Master", min_points: 1001, max_points: 1500 },
    Level { level: 6, name: "Shopping Legend", min_points: 1501, max_points: 9999 },
];

/// The band containing `points`, or the first band when none does.
pub fn level_for(points: u64) -> &'static Level {
    LEVELS
        .iter()
        .find(|level| level.contains(points))
        .unwrap_or(&LEVELS[0])
}

pub fn next_level(current: &Level) -> Option<&'static Level> {
    LEVELS.iter().find(|level| level.level == current.level + 1)
}

/// Percent of the way from the current band's floor to the next band's floor.
/// 100 in the top band.
pub fn progress_to_next(points: u64) -> f64 {
    let current = level_for(points);
    match next_level(current) {
        Some(next) => {
            let span = (next.min_points - current.min_points) as f64;
            (points.saturating_sub(current.min_points) as f64 / span * 100.0).min(100.0)
        }
        None => 100.0,
    }
}

/// Points still needed to reach the next band; 0 in the top band.
pub fn points_to_next(points: u64) -> u64 {
    next_level(level_for(points))
        .map(|next| next.min_points.saturating_sub(points))
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Prize {
    #[strum(serialize = "10% Off")]
    TenPercentOff,
    #[strum(serialize = "50 Points")]
    FiftyPoints,
    #[strum(serialize = "Free Shipping")]
    FreeShipping,
    #[strum(serialize = "20% Off")]
    TwentyPercentOff,
    #[strum(serialize = "100 Points")]
    HundredPoints,
    #[strum(serialize = "Mystery Gift")]
    MysteryGift,
}

impl Prize {
    /// Chance of landing on this prize, in percent. All prizes sum to 100.
    pub fn probability(self) -> f64 {
        match self {
            Prize::TenPercentOff => 30.0,
            Prize::FiftyPoints => 25.0,
            Prize::FreeShipping => 20.0,
            Prize::TwentyPercentOff => 15.0,
            Prize::HundredPoints => 8.0,
            Prize::MysteryGift => 2.0,
        }
    }

    /// Loyalty points granted, for points prizes.
    pub fn points(self) -> Option<u64> {
        match self {
            Prize::FiftyPoints => Some(50),
            Prize::HundredPoints => Some(100),
            _ => None,
        }
    }
}

/// Maps a roll in `[0, 100]` onto the cumulative prize distribution.
pub fn select_prize(roll: f64) -> Prize {
    let mut cumulative = 0.0;
    for prize in Prize::iter() {
        cumulative += prize.probability();
        if roll <= cumulative {
            return prize;
        }
    }
    Prize::TenPercentOff
}

#[derive(Debug, Clone)]
pub struct GamificationService {
    store: Arc<Store>,
}

impl GamificationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn data(&self) -> GamificationData {
        self.store.get_state().gamification_data.clone()
    }

    pub fn current_level(&self) -> &'static Level {
        level_for(self.data().points)
    }

    /// Adds the daily points, extends the streak and recomputes the level.
    pub fn claim_daily_reward(&self) -> GamificationData {
        let data = self.data();
        let points = data.points.saturating_add(DAILY_REWARD_POINTS);
        self.apply(GamificationUpdate {
            points: Some(points),
            level: Some(level_for(points).level),
            streaks: Some(data.streaks.saturating_add(1)),
            ..Default::default()
        })
    }

    pub fn award_points(&self, points: u64) -> GamificationData {
        let total = self.data().points.saturating_add(points);
        self.apply(GamificationUpdate {
            points: Some(total),
            level: Some(level_for(total).level),
            ..Default::default()
        })
    }

    pub fn award_badge(&self, badge: impl Into<String>) -> GamificationData {
        let mut badges = self.data().badges;
        badges.insert(badge.into());
        self.apply(GamificationUpdate {
            badges: Some(badges),
            ..Default::default()
        })
    }

    /// Spins the prize wheel with a random roll.
    pub fn spin(&self) -> Prize {
        let roll = rand::thread_rng().gen_range(0.0..=100.0);
        self.spin_with(roll)
    }

    /// Resolves a spin for `roll`, crediting points prizes.
    pub fn spin_with(&self, roll: f64) -> Prize {
        let prize = select_prize(roll);
        tracing::info!("[GamificationService] Spin landed on {}", prize);
        if let Some(points) = prize.points() {
            self.award_points(points);
        }
        prize
    }

    fn apply(&self, update: GamificationUpdate) -> GamificationData {
        let state = self.store.dispatch(Action::UpdateGamification(update));
        state.gamification_data.clone()
    }
}
