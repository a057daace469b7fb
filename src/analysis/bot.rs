//! Rule-based fake-follower scorecard.

use serde::{Deserialize, Serialize};

use crate::analysis::metrics::calculate_follower_like_ratio;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSignals {
    pub followers: u64,
    pub following: u64,
    pub total_likes: u64,
    pub video_count: u64,
    /// Percentage, as returned by `calculate_engagement_rate`.
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotFlag {
    LowEngagementForFollowers,
    FollowingExceedsFollowers,
    LowLikesForFollowers,
    FewVideosForAudience,
}

impl BotFlag {
    pub fn describe(&self) -> &'static str {
        match self {
            BotFlag::LowEngagementForFollowers => "engagement is too low for the follower count",
            BotFlag::FollowingExceedsFollowers => "account follows far more people than follow it",
            BotFlag::LowLikesForFollowers => "total likes are too low for the follower count",
            BotFlag::FewVideosForAudience => "very few videos for the size of the audience",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotRisk {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotAssessment {
    pub score: u8,
    pub flags: Vec<BotFlag>,
    pub risk: BotRisk,
}

impl BotAssessment {
    pub fn has(&self, flag: BotFlag) -> bool {
        self.flags.contains(&flag)
    }
}

const LOW_ENGAGEMENT_LARGE_POINTS: i32 = 30;
const LOW_ENGAGEMENT_SMALL_POINTS: i32 = 20;
const FOLLOWING_RATIO_POINTS: i32 = 25;
const LOW_LIKES_POINTS: i32 = 20;
const FEW_VIDEOS_POINTS: i32 = 15;
const HIGH_ENGAGEMENT_ADJUSTMENT: i32 = -20;

pub fn detect_bot_patterns(signals: &BotSignals) -> BotAssessment {
    let mut score: i32 = 0;
    let mut flags = Vec::new();
    let er = if signals.engagement_rate.is_finite() {
        signals.engagement_rate
    } else {
        0.0
    };

    if signals.followers >= 10_000 && er < 1.0 {
        score += LOW_ENGAGEMENT_LARGE_POINTS;
        flags.push(BotFlag::LowEngagementForFollowers);
    } else if signals.followers >= 1_000 && er < 0.5 {
        score += LOW_ENGAGEMENT_SMALL_POINTS;
        flags.push(BotFlag::LowEngagementForFollowers);
    }

    if signals.following > 1_000 && signals.following > signals.followers.saturating_mul(2) {
        score += FOLLOWING_RATIO_POINTS;
        flags.push(BotFlag::FollowingExceedsFollowers);
    }

    let like_ratio =
        calculate_follower_like_ratio(signals.total_likes as f64, signals.followers as f64);
    if signals.followers >= 1_000 && like_ratio < 0.5 {
        score += LOW_LIKES_POINTS;
        flags.push(BotFlag::LowLikesForFollowers);
    }

    if signals.followers >= 50_000 && signals.video_count < 5 {
        score += FEW_VIDEOS_POINTS;
        flags.push(BotFlag::FewVideosForAudience);
    }

    if er > 10.0 {
        score += HIGH_ENGAGEMENT_ADJUSTMENT;
    }

    let score = score.clamp(0, 100) as u8;
    let risk = match score {
        0..=29 => BotRisk::Low,
        30..=59 => BotRisk::Moderate,
        _ => BotRisk::High,
    };

    BotAssessment { score, flags, risk }
}
