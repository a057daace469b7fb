use serde::{Deserialize, Serialize};

use crate::analysis::{AccountMetrics, BiasLayer, Niche, Platform, VideoMetrics};
use crate::api::error::ApiError;
use crate::db::{ChatMessage, LibraryContribution};
use crate::knowledge::{GlossaryEntry, RoutedAnswer};

const MAX_CONTENT_CHARS: usize = 10_000;
const MAX_QUESTION_CHARS: usize = 2_000;
const MAX_SESSION_ID_CHARS: usize = 128;
const MAX_TERM_CHARS: usize = 100;
const MAX_DEFINITION_CHARS: usize = 2_000;

fn require(field: &str, value: &str, max_chars: usize) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    if len > max_chars {
        return Err(ApiError::Validation(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(())
}

fn parse_layer(layer: Option<&str>) -> Result<Option<BiasLayer>, ApiError> {
    match layer.map(str::trim).filter(|l| !l.is_empty()) {
        None => Ok(None),
        Some(code) => BiasLayer::from_code(code)
            .map(Some)
            .ok_or_else(|| ApiError::Validation(format!("unknown BIAS layer '{}'", code))),
    }
}

/// Platform and niche selection shared by the metric-driven analyzers.
#[derive(Debug, Deserialize, Default)]
pub struct BenchmarkSelection {
    pub platform: Option<String>,
    pub niche: Option<String>,
}

impl BenchmarkSelection {
    pub fn resolve(
        &self,
        default_platform: &str,
        default_niche: &str,
    ) -> Result<(Platform, Niche), ApiError> {
        let platform = self
            .platform
            .as_deref()
            .unwrap_or(default_platform)
            .parse::<Platform>()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let niche = self
            .niche
            .as_deref()
            .unwrap_or(default_niche)
            .parse::<Niche>()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok((platform, niche))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    pub session_id: String,
    pub content: String,
    pub mode: Option<String>,
    #[serde(default)]
    pub enhance: bool,
}

impl AnalyzeTextRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("sessionId", &self.session_id, MAX_SESSION_ID_CHARS)?;
        require("content", &self.content, MAX_CONTENT_CHARS)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeVideoRequest {
    pub session_id: String,
    pub metrics: VideoMetrics,
    #[serde(flatten)]
    pub benchmark: BenchmarkSelection,
    #[serde(default)]
    pub enhance: bool,
}

impl AnalyzeVideoRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("sessionId", &self.session_id, MAX_SESSION_ID_CHARS)?;
        if self.metrics.description.chars().count() > MAX_CONTENT_CHARS {
            return Err(ApiError::Validation(format!(
                "metrics.description must be at most {} characters",
                MAX_CONTENT_CHARS
            )));
        }
        if !self.metrics.duration_secs.is_finite() || self.metrics.duration_secs < 0.0 {
            return Err(ApiError::Validation(
                "metrics.durationSecs must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeAccountRequest {
    pub session_id: String,
    pub metrics: AccountMetrics,
    #[serde(flatten)]
    pub benchmark: BenchmarkSelection,
    #[serde(default)]
    pub enhance: bool,
}

impl AnalyzeAccountRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("sessionId", &self.session_id, MAX_SESSION_ID_CHARS)?;
        require("metrics.username", &self.metrics.username, MAX_TERM_CHARS)?;
        let averages = [
            ("metrics.avgViews", self.metrics.avg_views),
            ("metrics.avgComments", self.metrics.avg_comments),
            ("metrics.avgShares", self.metrics.avg_shares),
        ];
        for (field, value) in averages {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ApiError::Validation(format!(
                        "{} must be a non-negative number",
                        field
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysesQuery {
    pub session_id: Option<String>,
    pub kind: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_offset")]
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    pub question: String,
    #[serde(default)]
    pub enhance: bool,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("sessionId", &self.session_id, MAX_SESSION_ID_CHARS)?;
        require("question", &self.question, MAX_QUESTION_CHARS)
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: ChatMessage,
    pub routing: RoutedAnswer,
}

#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub term: String,
    pub definition: String,
    pub layer: Option<String>,
    pub contributor: Option<String>,
}

impl ContributionRequest {
    pub fn validate(&self) -> Result<Option<BiasLayer>, ApiError> {
        require("term", &self.term, MAX_TERM_CHARS)?;
        require("definition", &self.definition, MAX_DEFINITION_CHARS)?;
        if let Some(contributor) = &self.contributor {
            if contributor.chars().count() > MAX_TERM_CHARS {
                return Err(ApiError::Validation(format!(
                    "contributor must be at most {} characters",
                    MAX_TERM_CHARS
                )));
            }
        }
        parse_layer(self.layer.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct ContributionUpdateRequest {
    pub term: String,
    pub definition: String,
    pub layer: Option<String>,
}

impl ContributionUpdateRequest {
    pub fn validate(&self) -> Result<Option<BiasLayer>, ApiError> {
        require("term", &self.term, MAX_TERM_CHARS)?;
        require("definition", &self.definition, MAX_DEFINITION_CHARS)?;
        parse_layer(self.layer.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_offset")]
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_offset")]
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct GlossaryResponse {
    pub builtin: Vec<GlossaryEntry>,
    pub community: Vec<LibraryContribution>,
}

fn default_limit() -> usize {
    50
}

fn default_offset() -> usize {
    0
}
