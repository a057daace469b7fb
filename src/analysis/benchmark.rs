//! Benchmark-relative scoring.
//!
//! A raw metric is scored by where it sits between a niche's `average` and its
//! `top_performer`: below average scales linearly up to the low weight (60),
//! between the two adds up to the high weight (40), and anything at or above
//! the top performer is a full 100.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const LOW_WEIGHT: f64 = 60.0;
pub const HIGH_WEIGHT: f64 = 40.0;

#[derive(Debug, Error, PartialEq)]
pub enum BenchmarkError {
    #[error(
        "benchmark requires top_performer > average > 0 \
         (got average={average}, top_performer={top_performer})"
    )]
    NotIncreasing { average: f64, top_performer: f64 },
    #[error("unknown platform '{0}'")]
    UnknownPlatform(String),
    #[error("unknown niche '{0}'")]
    UnknownNiche(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub average: f64,
    pub top_performer: f64,
}

impl Benchmark {
    pub fn new(average: f64, top_performer: f64) -> Result<Self, BenchmarkError> {
        let benchmark = Self { average, top_performer };
        if benchmark.is_valid() {
            Ok(benchmark)
        } else {
            Err(BenchmarkError::NotIncreasing { average, top_performer })
        }
    }

    const fn of(average: f64, top_performer: f64) -> Self {
        Self { average, top_performer }
    }

    pub fn is_valid(&self) -> bool {
        self.average.is_finite()
            && self.top_performer.is_finite()
            && self.average > 0.0
            && self.top_performer > self.average
    }

    pub fn scale(&self, value: f64) -> f64 {
        scale_to_benchmark(value, self.average, self.top_performer)
    }
}

pub fn scale_to_benchmark(value: f64, average: f64, top_performer: f64) -> f64 {
    scale_to_benchmark_weighted(value, average, top_performer, LOW_WEIGHT, HIGH_WEIGHT)
}

/// Piecewise-linear score in `[0, 100]`.
///
/// Degenerate pairs (`top_performer <= average`) collapse to a step at
/// `average`, so the interpolation never divides by zero.
pub fn scale_to_benchmark_weighted(
    value: f64,
    average: f64,
    top_performer: f64,
    low_weight: f64,
    high_weight: f64,
) -> f64 {
    if !value.is_finite() || value <= 0.0 || !average.is_finite() || !top_performer.is_finite() {
        return 0.0;
    }
    let low = low_weight.max(0.0);
    let high = high_weight.max(0.0);

    let score = if average <= 0.0 {
        100.0
    } else if value < average {
        (value / average) * low
    } else if top_performer <= average || value >= top_performer {
        100.0
    } else {
        low + ((value - average) / (top_performer - average)) * high
    };

    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tiktok,
    Instagram,
    Youtube,
}

impl FromStr for Platform {
    type Err = BenchmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" | "reels" => Ok(Platform::Instagram),
            "youtube" | "shorts" => Ok(Platform::Youtube),
            other => Err(BenchmarkError::UnknownPlatform(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Niche {
    General,
    Comedy,
    Education,
    Beauty,
    Fitness,
    Food,
    Gaming,
    Lifestyle,
    Tech,
}

impl Niche {
    pub const ALL: [Niche; 9] = [
        Niche::General,
        Niche::Comedy,
        Niche::Education,
        Niche::Beauty,
        Niche::Fitness,
        Niche::Food,
        Niche::Gaming,
        Niche::Lifestyle,
        Niche::Tech,
    ];
}

impl FromStr for Niche {
    type Err = BenchmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let niche = match s.trim().to_ascii_lowercase().as_str() {
            "general" | "" => Niche::General,
            "comedy" | "entertainment" => Niche::Comedy,
            "education" => Niche::Education,
            "beauty" | "fashion" => Niche::Beauty,
            "fitness" | "health" => Niche::Fitness,
            "food" | "cooking" => Niche::Food,
            "gaming" => Niche::Gaming,
            "lifestyle" | "travel" => Niche::Lifestyle,
            "tech" | "technology" => Niche::Tech,
            other => return Err(BenchmarkError::UnknownNiche(other.to_string())),
        };
        Ok(niche)
    }
}

/// Reference pairs for every metric the analyzers score.
/// Rates are percentages; ratios are plain multiples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicheBenchmarks {
    pub platform: Platform,
    pub niche: Niche,
    pub engagement_rate: Benchmark,
    pub like_follower_ratio: Benchmark,
    pub views_per_follower: Benchmark,
    pub share_rate: Benchmark,
    pub save_rate: Benchmark,
    pub comment_rate: Benchmark,
}

impl NicheBenchmarks {
    pub fn all(&self) -> [(&'static str, Benchmark); 6] {
        [
            ("engagement_rate", self.engagement_rate),
            ("like_follower_ratio", self.like_follower_ratio),
            ("views_per_follower", self.views_per_follower),
            ("share_rate", self.share_rate),
            ("save_rate", self.save_rate),
            ("comment_rate", self.comment_rate),
        ]
    }
}

struct PlatformBase {
    engagement_rate: Benchmark,
    like_follower_ratio: Benchmark,
    views_per_follower: Benchmark,
    share_rate: Benchmark,
    save_rate: Benchmark,
    comment_rate: Benchmark,
}

const TIKTOK: PlatformBase = PlatformBase {
    engagement_rate: Benchmark::of(5.0, 12.0),
    like_follower_ratio: Benchmark::of(8.0, 25.0),
    views_per_follower: Benchmark::of(0.6, 2.5),
    share_rate: Benchmark::of(0.4, 1.5),
    save_rate: Benchmark::of(0.3, 1.2),
    comment_rate: Benchmark::of(0.2, 0.8),
};

const INSTAGRAM: PlatformBase = PlatformBase {
    engagement_rate: Benchmark::of(2.5, 6.0),
    like_follower_ratio: Benchmark::of(4.0, 15.0),
    views_per_follower: Benchmark::of(0.3, 1.2),
    share_rate: Benchmark::of(0.2, 0.9),
    save_rate: Benchmark::of(0.4, 1.5),
    comment_rate: Benchmark::of(0.1, 0.5),
};

const YOUTUBE: PlatformBase = PlatformBase {
    engagement_rate: Benchmark::of(3.5, 8.0),
    like_follower_ratio: Benchmark::of(5.0, 18.0),
    views_per_follower: Benchmark::of(0.4, 1.8),
    share_rate: Benchmark::of(0.15, 0.7),
    save_rate: Benchmark::of(0.1, 0.5),
    comment_rate: Benchmark::of(0.15, 0.6),
};

/// Engagement multipliers `(average, top)` applied on top of the platform base.
fn niche_engagement_multiplier(niche: Niche) -> (f64, f64) {
    match niche {
        Niche::General => (1.0, 1.0),
        Niche::Comedy => (1.2, 1.3),
        Niche::Education => (0.9, 1.0),
        Niche::Beauty => (1.0, 1.1),
        Niche::Fitness => (1.1, 1.1),
        Niche::Food => (1.1, 1.2),
        Niche::Gaming => (0.8, 0.9),
        Niche::Lifestyle => (0.9, 1.0),
        Niche::Tech => (0.7, 0.8),
    }
}

/// Education and tech audiences save far more than they share.
fn niche_save_multiplier(niche: Niche) -> f64 {
    match niche {
        Niche::Education | Niche::Tech => 1.5,
        Niche::Food | Niche::Fitness => 1.3,
        _ => 1.0,
    }
}

pub fn benchmarks_for(platform: Platform, niche: Niche) -> NicheBenchmarks {
    let base = match platform {
        Platform::Tiktok => &TIKTOK,
        Platform::Instagram => &INSTAGRAM,
        Platform::Youtube => &YOUTUBE,
    };
    let (avg_mul, top_mul) = niche_engagement_multiplier(niche);
    let save_mul = niche_save_multiplier(niche);

    NicheBenchmarks {
        platform,
        niche,
        engagement_rate: Benchmark::of(
            base.engagement_rate.average * avg_mul,
            base.engagement_rate.top_performer * top_mul,
        ),
        like_follower_ratio: base.like_follower_ratio,
        views_per_follower: base.views_per_follower,
        share_rate: base.share_rate,
        save_rate: Benchmark::of(
            base.save_rate.average * save_mul,
            base.save_rate.top_performer * save_mul,
        ),
        comment_rate: base.comment_rate,
    }
}
