#[cfg(test)]
mod tests {
    use biaslens::analysis::BiasLayer;
    use biaslens::knowledge::router::{enhancement_prompt, CONFIDENCE_KEYWORD, CONFIDENCE_NONE};
    use biaslens::knowledge::{classify, glossary, route, Topic};
    use proptest::prelude::*;

    #[test]
    fn test_topic_routing() {
        assert_eq!(classify("How do I spot fake followers?"), (Topic::BotDetection, Some("fake followers")));
        assert_eq!(classify("How do I write a better hook?").0, Topic::Hooks);
        assert_eq!(classify("What is the algorithm doing to my reach").0, Topic::Algorithm);
        assert_eq!(classify("How many hashtags should I use?").0, Topic::Hashtags);
        assert_eq!(classify("How do I get a brand deal?").0, Topic::Monetization);
        assert_eq!(classify("Tips for eye contact on camera").0, Topic::BodyLanguage);
    }

    #[test]
    fn test_priority_order() {
        // Bot detection comes before engagement.
        assert_eq!(classify("Are bots ruining my engagement?").0, Topic::BotDetection);
        // Hooks come before language.
        assert_eq!(classify("Which words make a good hook?").0, Topic::Hooks);
    }

    #[test]
    fn test_matching_is_case_and_punctuation_insensitive() {
        assert_eq!(classify("STORYTELLING!!!").0, Topic::Storytelling);
        assert_eq!(classify("fyp?").0, Topic::Algorithm);
    }

    #[test]
    fn test_whole_word_matching() {
        // "hookah" and "robotics" must not match "hook" or "bot".
        assert_eq!(classify("Where can I find a hookah lounge?").0, Topic::OutOfScope);
        assert_eq!(classify("Is robotics a good career?").0, Topic::OutOfScope);
    }

    #[test]
    fn test_generic_questions_need_a_domain_anchor() {
        assert_eq!(classify("How?").0, Topic::OutOfScope);
        assert_eq!(classify("Why is the sky blue?").0, Topic::OutOfScope);
        assert_eq!(classify("How should I plan my content?").0, Topic::CommunicationGeneral);
        assert_eq!(classify("").0, Topic::OutOfScope);
    }

    #[test]
    fn test_route_fields() {
        let routed = route("How long should my intro be?");
        assert_eq!(routed.topic, Topic::Hooks);
        assert_eq!(routed.layer, Some(BiasLayer::Cog));
        assert_eq!(routed.matched_keyword.as_deref(), Some("intro"));
        assert_eq!(routed.confidence, CONFIDENCE_KEYWORD);
        assert_eq!(routed.answer, Topic::Hooks.answer());

        let routed = route("What's the capital of France?");
        assert_eq!(routed.topic, Topic::OutOfScope);
        assert_eq!(routed.layer, None);
        assert_eq!(routed.matched_keyword, None);
        assert_eq!(routed.confidence, CONFIDENCE_NONE);
    }

    #[test]
    fn test_routed_answer_json() {
        let json = serde_json::to_value(route("Is clickbait unethical or just smart?")).unwrap();
        assert_eq!(json["topic"], "ethics");
        assert_eq!(json["layer"], "ETH");
        assert_eq!(json["matchedKeyword"], "clickbait");
    }

    #[test]
    fn test_enhancement_prompt_carries_reference_answer() {
        let routed = route("How do I tell a story in 30 seconds?");
        let prompt = enhancement_prompt(&routed);
        assert!(prompt.contains("storytelling"));
        assert!(prompt.contains("NLP"));
        assert!(prompt.contains(&routed.answer));
    }

    #[test]
    fn test_every_topic_has_keywords_and_an_answer() {
        for topic in Topic::PRIORITY {
            assert!(!topic.keywords().is_empty(), "{} has no keywords", topic.as_str());
            assert!(!topic.answer().is_empty());
            let keyword = topic.keywords()[0];
            // A topic's first keyword routes to that topic or to one ranked above it.
            let routed = classify(keyword).0;
            let rank = |t: Topic| Topic::PRIORITY.iter().position(|p| *p == t).expect("routed topic");
            assert!(rank(routed) <= rank(topic), "{} routed to {}", keyword, routed.as_str());
        }
    }

    #[test]
    fn test_glossary_covers_every_layer() {
        let entries = glossary();
        for layer in BiasLayer::ALL {
            assert!(entries.iter().any(|e| e.layer == Some(layer)), "missing {}", layer);
        }
        assert!(entries.iter().any(|e| e.term == "Benchmark"));
    }

    proptest! {
        #[test]
        fn prop_generic_words_never_route_to_a_topic(
            words in prop::collection::vec(
                prop::sample::select(vec!["how", "why", "what", "is", "the", "do", "i", "can", "it", "work"]),
                0..8,
            )
        ) {
            let question = format!("{}?", words.join(" "));
            prop_assert_eq!(classify(&question).0, Topic::OutOfScope);
        }

        #[test]
        fn prop_route_never_panics(question in ".{0,200}") {
            let routed = route(&question);
            prop_assert_eq!(routed.matched_keyword.is_some(), routed.topic != Topic::OutOfScope);
        }
    }
}
