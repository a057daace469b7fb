use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::text::{count_phrase, tokenize};
use crate::analysis::BiasLayer;
use crate::knowledge::topics::Topic;

pub const CONFIDENCE_KEYWORD: &str = "keyword-match";
pub const CONFIDENCE_NONE: &str = "none";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedAnswer {
    pub topic: Topic,
    pub layer: Option<BiasLayer>,
    pub matched_keyword: Option<String>,
    pub confidence: String,
    pub answer: String,
}

/// Picks the first topic, in priority order, whose keyword list matches a
/// whole word or phrase of the question.
pub fn classify(question: &str) -> (Topic, Option<&'static str>) {
    let tokens = tokenize(question);
    for topic in Topic::PRIORITY {
        if let Some(keyword) = topic
            .keywords()
            .iter()
            .copied()
            .find(|keyword| count_phrase(&tokens, keyword) > 0)
        {
            return (topic, Some(keyword));
        }
    }
    (Topic::OutOfScope, None)
}

pub fn route(question: &str) -> RoutedAnswer {
    let (topic, keyword) = classify(question);
    debug!(topic = topic.as_str(), keyword = ?keyword, "routed question");

    RoutedAnswer {
        topic,
        layer: topic.layer(),
        matched_keyword: keyword.map(str::to_string),
        confidence: if keyword.is_some() {
            CONFIDENCE_KEYWORD
        } else {
            CONFIDENCE_NONE
        }
        .to_string(),
        answer: topic.answer().to_string(),
    }
}

/// System prompt used when an LLM rewrites a routed answer.
pub fn enhancement_prompt(routed: &RoutedAnswer) -> String {
    let layer = routed
        .layer
        .map(|l| {
            format!(
                " It falls under the {} ({}) layer of the BIAS framework.",
                l.code(),
                l.name()
            )
        })
        .unwrap_or_default();
    format!(
        "You are a social media behavioral analyst. The question is about '{}'.{} \
         Expand the reference answer below into practical advice of at most 150 words. \
         Do not contradict it.\n\nReference answer: {}",
        routed.topic.as_str(),
        layer,
        routed.answer
    )
}
