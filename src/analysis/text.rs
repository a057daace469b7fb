use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analysis::benchmark::scale_to_benchmark;
use crate::analysis::bias::{
    score_band, weakest_layers, AnalysisResult, BiasLayer, LayerScore, RECOMMENDATION_THRESHOLD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Creator,
    Business,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Creator => "creator",
            AnalysisMode::Business => "business",
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "creator" => Ok(AnalysisMode::Creator),
            "business" | "brand" => Ok(AnalysisMode::Business),
            other => Err(format!("unknown analysis mode '{}'", other)),
        }
    }
}

const CTA_PHRASES: &[&str] = &[
    "follow", "comment", "share", "subscribe", "link in bio", "save this", "tag a friend",
    "click", "sign up", "buy", "shop", "dm me", "join", "download",
];

const EMOTIONAL_WORDS: &[&str] = &[
    "love", "hate", "amazing", "incredible", "shocking", "heartbreaking", "happy", "sad",
    "angry", "fear", "scared", "excited", "beautiful", "brutal", "insane", "unbelievable",
    "proud", "grateful", "obsessed", "wow", "crying", "hilarious",
];

const URGENCY_WORDS: &[&str] = &[
    "now", "today", "hurry", "limited", "last chance", "only", "deadline", "urgent",
    "immediately", "don't miss",
];

const CLAIM_PHRASES: &[&str] = &[
    "guaranteed", "secret", "miracle", "never fails", "overnight", "instantly", "cure",
    "risk free", "get rich", "doctors hate",
];

const SECOND_PERSON: &[&str] = &["you", "your", "you're", "yourself", "yours"];

const HOOK_OPENERS: &[&str] = &[
    "you", "stop", "why", "how", "this", "nobody", "imagine", "what", "pov", "here's", "never",
];

/// Lowercased word tokens; apostrophes stay inside words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(|w| w.trim_matches('\'').to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Counts whole-word occurrences of `phrase` (one or more words) in `tokens`.
pub fn count_phrase(tokens: &[String], phrase: &str) -> usize {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > tokens.len() {
        return 0;
    }
    tokens
        .windows(needle.len())
        .filter(|window| window.iter().zip(&needle).all(|(t, n)| t == n))
        .count()
}

fn count_any(tokens: &[String], phrases: &[&str]) -> usize {
    phrases.iter().map(|p| count_phrase(tokens, p)).sum()
}

fn is_emoji(c: char) -> bool {
    matches!(c as u32, 0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x1F1E6..=0x1F1FF)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFeatures {
    pub word_count: usize,
    pub sentence_count: usize,
    pub question_count: usize,
    pub exclamation_count: usize,
    pub hashtag_count: usize,
    pub mention_count: usize,
    pub emoji_count: usize,
    pub second_person_count: usize,
    pub cta_count: usize,
    pub emotional_count: usize,
    pub urgency_count: usize,
    pub claim_count: usize,
    pub has_hook: bool,
}

impl TextFeatures {
    pub fn extract(text: &str) -> Self {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Self::default();
        }

        let sentence_count = text
            .split(['.', '!', '?', '\n'])
            .filter(|s| s.chars().any(char::is_alphanumeric))
            .count()
            .max(1);

        let raw_words: Vec<&str> = text.split_whitespace().collect();
        let hashtag_count = raw_words.iter().filter(|w| w.starts_with('#') && w.len() > 1).count();
        let mention_count = raw_words.iter().filter(|w| w.starts_with('@') && w.len() > 1).count();

        let claim_count = count_any(&tokens, CLAIM_PHRASES) + text.matches("100%").count();

        Self {
            word_count: tokens.len(),
            sentence_count,
            question_count: text.matches('?').count(),
            exclamation_count: text.matches('!').count(),
            hashtag_count,
            mention_count,
            emoji_count: text.chars().filter(|c| is_emoji(*c)).count(),
            second_person_count: count_any(&tokens, SECOND_PERSON),
            cta_count: count_any(&tokens, CTA_PHRASES),
            emotional_count: count_any(&tokens, EMOTIONAL_WORDS),
            urgency_count: count_any(&tokens, URGENCY_WORDS),
            claim_count,
            has_hook: detect_hook(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn avg_sentence_length(&self) -> f64 {
        if self.sentence_count == 0 {
            0.0
        } else {
            self.word_count as f64 / self.sentence_count as f64
        }
    }

    /// Emotional words per 100 words.
    pub fn emotional_density(&self) -> f64 {
        if self.word_count == 0 {
            0.0
        } else {
            self.emotional_count as f64 / self.word_count as f64 * 100.0
        }
    }
}

fn detect_hook(text: &str) -> bool {
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let first_sentence_end = first_line.find(['.', '!', '?']).map(|i| &first_line[i..=i]);
    if first_sentence_end == Some("?") {
        return true;
    }
    let tokens = tokenize(first_line);
    match tokens.first() {
        Some(first) => {
            first.chars().all(|c| c.is_ascii_digit()) || HOOK_OPENERS.contains(&first.as_str())
        }
        None => false,
    }
}

// --- Per-layer heuristics shared with the video and account analyzers ---

pub(crate) fn emoji_score(emoji_count: usize) -> f64 {
    match emoji_count {
        0 => 40.0,
        1..=5 => 85.0,
        n => (85.0 - (n as f64 - 5.0) * 5.0).max(40.0),
    }
}

pub(crate) fn emotion_score(features: &TextFeatures) -> f64 {
    let density = features.emotional_density();
    let base = scale_to_benchmark(density, 2.0, 6.0);
    // Past 12 words per hundred the copy reads as melodrama.
    if density > 12.0 {
        (base - (density - 12.0) * 4.0).max(30.0)
    } else {
        base
    }
}

pub(crate) fn language_score(features: &TextFeatures) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    let avg = features.avg_sentence_length();
    let base = if (8.0..=18.0).contains(&avg) {
        85.0
    } else if avg < 8.0 {
        60.0 + avg * 3.0
    } else {
        (85.0 - (avg - 18.0) * 3.0).max(25.0)
    };
    let direct_address = if features.second_person_count > 0 { 10.0 } else { 0.0 };
    base + direct_address
}

pub(crate) fn ethics_score(features: &TextFeatures) -> f64 {
    let claims = features.claim_count as f64 * 20.0;
    let pressure = features.urgency_count.saturating_sub(2) as f64 * 5.0;
    100.0 - claims - pressure
}

pub(crate) fn hashtag_score(count: usize, mode: AnalysisMode) -> f64 {
    let (lo, hi) = match mode {
        AnalysisMode::Creator => (3, 5),
        AnalysisMode::Business => (1, 3),
    };
    if count == 0 {
        35.0
    } else if count < lo {
        65.0
    } else if count <= hi {
        90.0
    } else {
        (90.0 - (count - hi) as f64 * 10.0).max(20.0)
    }
}

pub(crate) fn conversation_score(features: &TextFeatures) -> f64 {
    let prompts = (features.question_count + features.mention_count).min(3) as f64;
    if prompts == 0.0 {
        40.0
    } else {
        70.0 + prompts * 10.0
    }
}

pub(crate) fn attention_score(features: &TextFeatures, mode: AnalysisMode) -> f64 {
    let (lo, hi) = match mode {
        AnalysisMode::Creator => (20, 150),
        AnalysisMode::Business => (40, 250),
    };
    let words = features.word_count;
    let length = if words == 0 {
        0.0
    } else if words < lo {
        words as f64 / lo as f64 * 100.0
    } else if words <= hi {
        100.0
    } else {
        (100.0 - (words - hi) as f64 / hi as f64 * 100.0).max(20.0)
    };
    let hook = if features.has_hook { 30.0 } else { 0.0 };
    length * 0.7 + hook
}

pub(crate) fn cta_score(cta_count: usize, mode: AnalysisMode) -> f64 {
    match (mode, cta_count) {
        (_, 0) => 30.0,
        (AnalysisMode::Creator, 1) => 75.0,
        (AnalysisMode::Creator, 2) => 90.0,
        (AnalysisMode::Creator, _) => 70.0,
        (AnalysisMode::Business, 1) => 80.0,
        (AnalysisMode::Business, 2..=3) => 95.0,
        (AnalysisMode::Business, _) => 75.0,
    }
}

pub(crate) fn text_recommendation(
    layer: BiasLayer,
    features: &TextFeatures,
    mode: AnalysisMode,
) -> String {
    match layer {
        BiasLayer::Vbm => format!(
            "Visual markers are thin ({} emoji); one to five well-placed emoji make the copy easier to scan.",
            features.emoji_count
        ),
        BiasLayer::Epm => format!(
            "Emotional density is {:.1} words per hundred; aim for 2 to 6 so the message lands without melodrama.",
            features.emotional_density()
        ),
        BiasLayer::Nlp => format!(
            "Sentences average {:.1} words; keep them between 8 and 18 and speak to the reader as \"you\".",
            features.avg_sentence_length()
        ),
        BiasLayer::Eth => format!(
            "Found {} exaggerated claim(s) and {} urgency cue(s); drop absolute promises to protect trust.",
            features.claim_count, features.urgency_count
        ),
        BiasLayer::Eco => {
            let ideal = match mode {
                AnalysisMode::Creator => "3 to 5",
                AnalysisMode::Business => "1 to 3",
            };
            format!(
                "Uses {} hashtag(s); {} targeted hashtags help the algorithm classify the post.",
                features.hashtag_count, ideal
            )
        }
        BiasLayer::Soc => {
            "Invite a reply: end with a question or tag someone to start a conversation."
                .to_string()
        }
        BiasLayer::Cog => {
            if features.has_hook {
                format!(
                    "At {} words the copy is outside the comfortable reading range; trim or expand it.",
                    features.word_count
                )
            } else {
                "Open with a hook (a question, a number, or a direct \"you\") to win the first second of attention."
                    .to_string()
            }
        }
        BiasLayer::Bmil => format!(
            "Found {} call(s) to action; one or two clear asks convert better than none or many.",
            features.cta_count
        ),
    }
}

pub fn analyze_text(content: &str, mode: AnalysisMode) -> AnalysisResult {
    let features = TextFeatures::extract(content);
    if features.is_empty() {
        let layers = BiasLayer::ALL
            .into_iter()
            .map(|layer| LayerScore::new(layer, 0.0, "No content to analyze."))
            .collect();
        return AnalysisResult::from_layers(
            layers,
            Vec::new(),
            "No content to analyze.".to_string(),
        );
    }

    let layers = vec![
        LayerScore::new(
            BiasLayer::Vbm,
            emoji_score(features.emoji_count),
            format!("{} emoji", features.emoji_count),
        ),
        LayerScore::new(
            BiasLayer::Epm,
            emotion_score(&features),
            format!("{:.1} emotional words per 100", features.emotional_density()),
        ),
        LayerScore::new(
            BiasLayer::Nlp,
            language_score(&features),
            format!("{:.1} words per sentence", features.avg_sentence_length()),
        ),
        LayerScore::new(
            BiasLayer::Eth,
            ethics_score(&features),
            format!("{} exaggerated claim(s)", features.claim_count),
        ),
        LayerScore::new(
            BiasLayer::Eco,
            hashtag_score(features.hashtag_count, mode),
            format!("{} hashtag(s)", features.hashtag_count),
        ),
        LayerScore::new(
            BiasLayer::Soc,
            conversation_score(&features),
            format!(
                "{} question(s), {} mention(s)",
                features.question_count, features.mention_count
            ),
        ),
        LayerScore::new(
            BiasLayer::Cog,
            attention_score(&features, mode),
            format!(
                "{} words, hook: {}",
                features.word_count,
                if features.has_hook { "yes" } else { "no" }
            ),
        ),
        LayerScore::new(
            BiasLayer::Bmil,
            cta_score(features.cta_count, mode),
            format!("{} call(s) to action", features.cta_count),
        ),
    ];

    let recommendations = weakest_layers(&layers, RECOMMENDATION_THRESHOLD)
        .into_iter()
        .map(|l| text_recommendation(l.layer, &features, mode))
        .collect();

    let result = AnalysisResult::from_layers(layers, recommendations, String::new());
    with_summary(result, &format!("{} text", mode.as_str()))
}

/// Fills in the deterministic summary line from the scored layers.
pub(crate) fn with_summary(mut result: AnalysisResult, subject: &str) -> AnalysisResult {
    let strongest = result.layers.iter().max_by_key(|l| l.score);
    let weakest = result.layers.iter().min_by_key(|l| l.score);
    result.summary = match (strongest, weakest) {
        (Some(best), Some(worst)) => format!(
            "Overall {}/100 ({}) for this {}. Strongest layer: {} {} ({}); weakest: {} {} ({}).",
            result.overall_score,
            score_band(result.overall_score),
            subject,
            best.layer.code(),
            best.layer.name(),
            best.score,
            worst.layer.code(),
            worst.layer.name(),
            worst.score,
        ),
        _ => format!("Nothing to score for this {}.", subject),
    };
    result
}
