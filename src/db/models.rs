use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::analysis::BiasLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Text,
    Video,
    Account,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Text => "text",
            AnalysisKind::Video => "video",
            AnalysisKind::Account => "account",
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(AnalysisKind::Text),
            "video" => Ok(AnalysisKind::Video),
            "account" => Ok(AnalysisKind::Account),
            other => Err(format!("unknown analysis kind '{}'", other)),
        }
    }
}

/// A stored analysis. `result` is the serialized analyzer output and
/// `content` the raw input (text, or the metrics as JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub session_id: String,
    pub kind: AnalysisKind,
    pub mode: String,
    pub input_type: String,
    pub content: String,
    pub result: serde_json::Value,
    pub overall_score: u8,
    pub narrative_source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnalysis<'a> {
    pub session_id: &'a str,
    pub kind: AnalysisKind,
    pub mode: &'a str,
    pub input_type: &'a str,
    pub content: &'a str,
    pub result: serde_json::Value,
    pub overall_score: u8,
    pub narrative_source: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub topic: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionStatus::Pending => "pending",
            ContributionStatus::Approved => "approved",
            ContributionStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ContributionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ContributionStatus::Pending),
            "approved" => Ok(ContributionStatus::Approved),
            "rejected" => Ok(ContributionStatus::Rejected),
            other => Err(format!("unknown contribution status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryContribution {
    pub id: Uuid,
    pub term: String,
    pub definition: String,
    pub layer: Option<BiasLayer>,
    pub contributor: String,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}
