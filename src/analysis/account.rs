use serde::{Deserialize, Serialize};

use crate::analysis::benchmark::{Benchmark, NicheBenchmarks};
use crate::analysis::bias::{
    weakest_layers, AnalysisResult, BiasLayer, LayerScore, RECOMMENDATION_THRESHOLD,
};
use crate::analysis::bot::{detect_bot_patterns, BotAssessment, BotSignals};
use crate::analysis::metrics::{
    calculate_engagement_rate, calculate_follower_like_ratio, percent_of, round2,
};
use crate::analysis::text::{language_score, with_summary, TextFeatures};

/// Uploads needed for a steady posting history.
const POSTING_VOLUME: Benchmark = Benchmark {
    average: 30.0,
    top_performer: 150.0,
};

const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetrics {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub total_likes: u64,
    pub video_count: u64,
    #[serde(default)]
    pub avg_views: Option<f64>,
    #[serde(default)]
    pub avg_comments: Option<f64>,
    #[serde(default)]
    pub avg_shares: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl AccountMetrics {
    pub fn likes_per_video(&self) -> f64 {
        if self.video_count == 0 {
            0.0
        } else {
            self.total_likes as f64 / self.video_count as f64
        }
    }

    fn views(&self) -> Option<f64> {
        self.avg_views.filter(|v| v.is_finite() && *v > 0.0)
    }

    pub fn engagement_rate(&self) -> f64 {
        let likes = self.likes_per_video();
        match self.views() {
            Some(views) => {
                let interactions =
                    likes + self.avg_comments.unwrap_or(0.0) + self.avg_shares.unwrap_or(0.0);
                calculate_engagement_rate(interactions, views)
            }
            None => calculate_engagement_rate(likes, self.followers as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAnalysis {
    pub username: String,
    pub engagement_rate: f64,
    pub follower_like_ratio: f64,
    pub bot: BotAssessment,
    pub benchmarks: NicheBenchmarks,
    pub result: AnalysisResult,
}

pub fn analyze_account(metrics: &AccountMetrics, benchmarks: &NicheBenchmarks) -> AccountAnalysis {
    let engagement_rate = metrics.engagement_rate();
    let follower_like_ratio =
        calculate_follower_like_ratio(metrics.total_likes as f64, metrics.followers as f64);

    let bot = detect_bot_patterns(&BotSignals {
        followers: metrics.followers,
        following: metrics.following,
        total_likes: metrics.total_likes,
        video_count: metrics.video_count,
        engagement_rate,
    });

    let views = metrics.views();
    let views_per_follower = match views {
        Some(v) if metrics.followers > 0 => Some(round2(v / metrics.followers as f64)),
        _ => None,
    };
    let comment_rate = views.zip(metrics.avg_comments).map(|(v, c)| round2(percent_of(c, v)));
    let share_rate = views.zip(metrics.avg_shares).map(|(v, s)| round2(percent_of(s, v)));
    let bio = metrics.bio.as_deref().map(TextFeatures::extract).filter(|f| !f.is_empty());

    let mut layers = Vec::with_capacity(8);
    let mut recommendations = Vec::new();

    layers.push(LayerScore::new(
        BiasLayer::Vbm,
        benchmarks.like_follower_ratio.scale(follower_like_ratio),
        format!("{:.2} likes per follower", follower_like_ratio),
    ));

    match comment_rate {
        Some(rate) => layers.push(LayerScore::new(
            BiasLayer::Epm,
            benchmarks.comment_rate.scale(rate),
            format!("{:.2}% of viewers comment", rate),
        )),
        None => layers.push(LayerScore::new(BiasLayer::Epm, NEUTRAL, "no comment data")),
    }

    match &bio {
        Some(features) => layers.push(LayerScore::new(
            BiasLayer::Nlp,
            language_score(features),
            format!("bio of {} words", features.word_count),
        )),
        None => {
            layers.push(LayerScore::new(BiasLayer::Nlp, 40.0, "no bio"));
            recommendations.push(
                "Write a bio that says who the account is for and what viewers get from following."
                    .to_string(),
            );
        }
    }

    layers.push(LayerScore::new(
        BiasLayer::Eth,
        100.0 - f64::from(bot.score),
        format!("bot score {} ({:?} risk)", bot.score, bot.risk).to_lowercase(),
    ));

    layers.push(LayerScore::new(
        BiasLayer::Eco,
        POSTING_VOLUME.scale(metrics.video_count as f64),
        format!("{} videos posted", metrics.video_count),
    ));

    layers.push(LayerScore::new(
        BiasLayer::Soc,
        benchmarks.engagement_rate.scale(engagement_rate),
        format!("{:.2}% engagement rate", engagement_rate),
    ));

    match views_per_follower {
        Some(ratio) => layers.push(LayerScore::new(
            BiasLayer::Cog,
            benchmarks.views_per_follower.scale(ratio),
            format!("{:.2} views per follower", ratio),
        )),
        None => layers.push(LayerScore::new(BiasLayer::Cog, NEUTRAL, "no view data")),
    }

    match share_rate {
        Some(rate) => layers.push(LayerScore::new(
            BiasLayer::Bmil,
            benchmarks.share_rate.scale(rate),
            format!("{:.2}% of viewers share", rate),
        )),
        None => layers.push(LayerScore::new(BiasLayer::Bmil, NEUTRAL, "no share data")),
    }

    for layer in weakest_layers(&layers, RECOMMENDATION_THRESHOLD) {
        let advice = match layer.layer {
            BiasLayer::Vbm => Some(format!(
                "Likes per follower is {:.2} against a niche average of {:.1}; stronger thumbnails and first frames lift it.",
                follower_like_ratio, benchmarks.like_follower_ratio.average
            )),
            BiasLayer::Epm => comment_rate.map(|rate| format!(
                "Only {:.2}% of viewers comment (niche average {:.2}%); end videos with a question that has an opinion attached.",
                rate, benchmarks.comment_rate.average
            )),
            BiasLayer::Eth => Some(format!(
                "Audience authenticity is at risk: {}.",
                bot.flags.iter().map(|f| f.describe()).collect::<Vec<_>>().join("; ")
            )),
            BiasLayer::Eco => Some(format!(
                "{} videos is a thin catalogue; the algorithm rewards steady posting, aim for {} or more.",
                metrics.video_count, POSTING_VOLUME.average
            )),
            BiasLayer::Soc => Some(format!(
                "Engagement rate {:.2}% is below the {:.1}% niche average; reply to comments in the first hour.",
                engagement_rate, benchmarks.engagement_rate.average
            )),
            BiasLayer::Cog => views_per_follower.map(|ratio| format!(
                "Videos reach {:.2} views per follower; tighten the first three seconds to keep viewers watching.",
                ratio
            )),
            BiasLayer::Bmil => share_rate.map(|rate| format!(
                "Share rate {:.2}% trails the {:.2}% niche average; make content people send to a friend.",
                rate, benchmarks.share_rate.average
            )),
            BiasLayer::Nlp => bio.as_ref().map(|f| format!(
                "The bio averages {:.1} words per sentence; shorten it to one clear promise.",
                f.avg_sentence_length()
            )),
        };
        recommendations.extend(advice);
    }

    let result = AnalysisResult::from_layers(layers, recommendations, String::new());
    let subject = format!("account @{}", metrics.username.trim_start_matches('@'));

    AccountAnalysis {
        username: metrics.username.clone(),
        engagement_rate,
        follower_like_ratio,
        bot,
        benchmarks: *benchmarks,
        result: with_summary(result, &subject),
    }
}
