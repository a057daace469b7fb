use serde::{Deserialize, Serialize};

use crate::analysis::benchmark::NicheBenchmarks;
use crate::analysis::bias::{
    weakest_layers, AnalysisResult, BiasLayer, LayerScore, RECOMMENDATION_THRESHOLD,
};
use crate::analysis::metrics::{calculate_engagement_rate, percent_of, round2};
use crate::analysis::text::{
    ethics_score, hashtag_score, language_score, with_summary, AnalysisMode, TextFeatures,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetrics {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    #[serde(default)]
    pub saves: u64,
    /// Zero when unknown.
    #[serde(default)]
    pub duration_secs: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub engagement_rate: f64,
    pub share_rate: f64,
    pub save_rate: f64,
    pub comment_rate: f64,
    pub result: AnalysisResult,
}

/// Short-form sweet spot is 15 to 60 seconds.
pub fn duration_score(secs: f64) -> f64 {
    if !secs.is_finite() || secs <= 0.0 {
        50.0
    } else if secs < 15.0 {
        50.0 + secs / 15.0 * 50.0
    } else if secs <= 60.0 {
        100.0
    } else if secs <= 180.0 {
        100.0 - (secs - 60.0) / 120.0 * 50.0
    } else {
        (50.0 - (secs - 180.0) / 60.0 * 10.0).max(20.0)
    }
}

pub fn analyze_video(metrics: &VideoMetrics, benchmarks: &NicheBenchmarks) -> VideoAnalysis {
    let views = metrics.views as f64;
    let interactions = [metrics.likes, metrics.comments, metrics.shares, metrics.saves]
        .iter()
        .map(|n| *n as f64)
        .sum::<f64>();
    let engagement_rate = calculate_engagement_rate(interactions, views);
    let share_rate = round2(percent_of(metrics.shares as f64, views));
    let save_rate = round2(percent_of(metrics.saves as f64, views));
    let comment_rate = round2(percent_of(metrics.comments as f64, views));
    let description = TextFeatures::extract(&metrics.description);

    let mut eth = if description.is_empty() { 100.0 } else { ethics_score(&description) };
    let mut eth_notes = Vec::new();
    if metrics.likes > metrics.views {
        eth -= 50.0;
        eth_notes.push("more likes than views");
    }
    if engagement_rate > benchmarks.engagement_rate.top_performer * 3.0 {
        eth -= 25.0;
        eth_notes.push("implausibly high engagement");
    }
    let eth_finding = if eth_notes.is_empty() {
        format!("{} exaggerated claim(s) in description", description.claim_count)
    } else {
        eth_notes.join(", ")
    };

    let (nlp, nlp_finding) = if description.is_empty() {
        (30.0, "no description".to_string())
    } else {
        let hook = if description.has_hook { 10.0 } else { 0.0 };
        (
            language_score(&description) + hook,
            format!(
                "{} word description, hook: {}",
                description.word_count,
                if description.has_hook { "yes" } else { "no" }
            ),
        )
    };

    let layers = vec![
        LayerScore::new(
            BiasLayer::Vbm,
            benchmarks.engagement_rate.scale(engagement_rate),
            format!("{:.2}% engagement rate", engagement_rate),
        ),
        LayerScore::new(
            BiasLayer::Epm,
            benchmarks.share_rate.scale(share_rate),
            format!("{:.2}% share rate", share_rate),
        ),
        LayerScore::new(BiasLayer::Nlp, nlp, nlp_finding),
        LayerScore::new(BiasLayer::Eth, eth, eth_finding),
        LayerScore::new(
            BiasLayer::Eco,
            hashtag_score(description.hashtag_count, AnalysisMode::Creator),
            format!("{} hashtag(s)", description.hashtag_count),
        ),
        LayerScore::new(
            BiasLayer::Soc,
            benchmarks.comment_rate.scale(comment_rate),
            format!("{:.2}% comment rate", comment_rate),
        ),
        LayerScore::new(
            BiasLayer::Cog,
            duration_score(metrics.duration_secs),
            format!("{:.0}s duration", metrics.duration_secs),
        ),
        LayerScore::new(
            BiasLayer::Bmil,
            benchmarks.save_rate.scale(save_rate),
            format!("{:.2}% save rate", save_rate),
        ),
    ];

    let duration_unknown = !metrics.duration_secs.is_finite() || metrics.duration_secs <= 0.0;
    let recommendations = weakest_layers(&layers, RECOMMENDATION_THRESHOLD)
        .into_iter()
        .map(|l| match l.layer {
            BiasLayer::Vbm => format!(
                "Engagement rate {:.2}% is under the {:.1}% niche average; open on motion or a face, not a title card.",
                engagement_rate, benchmarks.engagement_rate.average
            ),
            BiasLayer::Epm => format!(
                "Share rate {:.2}% (niche average {:.2}%); build toward a payoff viewers want to pass on.",
                share_rate, benchmarks.share_rate.average
            ),
            BiasLayer::Nlp => {
                "Write a description that opens with a hook and speaks to the viewer directly."
                    .to_string()
            }
            BiasLayer::Eth => format!("Authenticity concerns: {}.", l.finding),
            BiasLayer::Eco => format!(
                "{} hashtag(s) in the description; use 3 to 5 specific ones.",
                description.hashtag_count
            ),
            BiasLayer::Soc => format!(
                "Comment rate {:.2}% (niche average {:.2}%); ask a question in the video itself.",
                comment_rate, benchmarks.comment_rate.average
            ),
            BiasLayer::Cog if duration_unknown => {
                "The video duration is missing, so the 15 to 60 second sweet spot could not be checked."
                    .to_string()
            }
            BiasLayer::Cog => format!(
                "At {:.0} seconds the video sits outside the 15 to 60 second sweet spot.",
                metrics.duration_secs
            ),
            BiasLayer::Bmil => format!(
                "Save rate {:.2}% (niche average {:.2}%); add reference value such as steps, lists or recipes.",
                save_rate, benchmarks.save_rate.average
            ),
        })
        .collect();

    let result = AnalysisResult::from_layers(layers, recommendations, String::new());

    VideoAnalysis {
        engagement_rate,
        share_rate,
        save_rate,
        comment_rate,
        result: with_summary(result, "video"),
    }
}
