//! Deterministic scoring against the BIAS framework.

pub mod account;
pub mod benchmark;
pub mod bias;
pub mod bot;
pub mod metrics;
pub mod text;
pub mod video;

pub use account::{analyze_account, AccountAnalysis, AccountMetrics};
pub use benchmark::{
    benchmarks_for, scale_to_benchmark, Benchmark, Niche, NicheBenchmarks, Platform,
};
pub use bias::{weakest_layers, AnalysisResult, BiasLayer, LayerScore};
pub use bot::{detect_bot_patterns, BotAssessment, BotFlag, BotRisk, BotSignals};
pub use metrics::{calculate_engagement_rate, calculate_follower_like_ratio};
pub use text::{analyze_text, AnalysisMode, TextFeatures};
pub use video::{analyze_video, VideoAnalysis, VideoMetrics};
