use serde::{Deserialize, Serialize};

/// The eight layers of the BIAS framework, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BiasLayer {
    Vbm,
    Epm,
    Nlp,
    Eth,
    Eco,
    Soc,
    Cog,
    Bmil,
}

impl BiasLayer {
    pub const ALL: [BiasLayer; 8] = [
        BiasLayer::Vbm,
        BiasLayer::Epm,
        BiasLayer::Nlp,
        BiasLayer::Eth,
        BiasLayer::Eco,
        BiasLayer::Soc,
        BiasLayer::Cog,
        BiasLayer::Bmil,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BiasLayer::Vbm => "VBM",
            BiasLayer::Epm => "EPM",
            BiasLayer::Nlp => "NLP",
            BiasLayer::Eth => "ETH",
            BiasLayer::Eco => "ECO",
            BiasLayer::Soc => "SOC",
            BiasLayer::Cog => "COG",
            BiasLayer::Bmil => "BMIL",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BiasLayer::Vbm => "Visual & Behavioral Markers",
            BiasLayer::Epm => "Emotional Persuasion Mapping",
            BiasLayer::Nlp => "Narrative & Language Patterns",
            BiasLayer::Eth => "Ethics & Authenticity",
            BiasLayer::Eco => "Ecosystem & Algorithm Fit",
            BiasLayer::Soc => "Social Proof & Community",
            BiasLayer::Cog => "Cognitive Load & Attention",
            BiasLayer::Bmil => "Brand, Monetization & Influence Loop",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl std::fmt::Display for BiasLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerScore {
    pub layer: BiasLayer,
    pub score: u8,
    pub finding: String,
}

impl LayerScore {
    /// Rounds and clamps a raw heuristic score into `0..=100`.
    pub fn new(layer: BiasLayer, raw_score: f64, finding: impl Into<String>) -> Self {
        Self {
            layer,
            score: to_score(raw_score),
            finding: finding.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub layers: Vec<LayerScore>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

impl AnalysisResult {
    pub fn from_layers(
        layers: Vec<LayerScore>,
        recommendations: Vec<String>,
        summary: String,
    ) -> Self {
        let overall_score = if layers.is_empty() {
            0
        } else {
            let total: f64 = layers.iter().map(|l| f64::from(l.score)).sum();
            to_score(total / layers.len() as f64)
        };

        Self {
            overall_score,
            layers,
            recommendations,
            summary,
        }
    }

    pub fn layer(&self, layer: BiasLayer) -> Option<&LayerScore> {
        self.layers.iter().find(|l| l.layer == layer)
    }
}

/// Layers scoring under this get a recommendation.
pub const RECOMMENDATION_THRESHOLD: u8 = 60;

/// Layers scoring under `threshold`, weakest first. Ties keep layer order.
pub fn weakest_layers(layers: &[LayerScore], threshold: u8) -> Vec<&LayerScore> {
    let mut weak: Vec<&LayerScore> = layers.iter().filter(|l| l.score < threshold).collect();
    weak.sort_by_key(|l| l.score);
    weak
}

pub fn to_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Plain-text verdict used in summaries.
pub fn score_band(score: u8) -> &'static str {
    match score {
        80..=100 => "excellent",
        60..=79 => "solid",
        40..=59 => "developing",
        _ => "weak",
    }
}
