#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use biaslens::analysis::{analyze_text, AnalysisMode};
    use biaslens::llm::cascade::{AiCascade, LOCAL_SOURCE};
    use biaslens::llm::models::{ChatOptions, ChatResponse, Message};
    use biaslens::llm::gemini::GeminiProvider;
    use biaslens::llm::openai::OpenAiProvider;
    use biaslens::llm::{LlmError, LlmProvider};
    use std::time::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FakeProvider {
        name: &'static str,
        reply: Result<&'static str, fn() -> LlmError>,
        calls: AtomicUsize,
        last_options: Mutex<Option<ChatOptions>>,
    }

    impl FakeProvider {
        fn ok(name: &'static str, reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
                last_options: Mutex::new(None),
            })
        }

        fn failing(name: &'static str, err: fn() -> LlmError) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Err(err),
                calls: AtomicUsize::new(0),
                last_options: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn chat(&self, _messages: &[Message], options: ChatOptions) -> Result<ChatResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_options.lock().unwrap() = Some(options);
            match self.reply {
                Ok(content) => Ok(ChatResponse {
                    content: content.to_string(),
                    model: "fake-model".to_string(),
                    usage: None,
                }),
                Err(err) => Err(err()),
            }
        }
    }

    fn tiers(providers: &[&Arc<FakeProvider>]) -> Vec<Arc<dyn LlmProvider>> {
        providers
            .iter()
            .map(|p| Arc::clone(*p) as Arc<dyn LlmProvider>)
            .collect()
    }

    fn question() -> Vec<Message> {
        vec![Message::user("How do I write a hook?")]
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let openai = FakeProvider::ok("openai", "from openai");
        let gemini = FakeProvider::ok("gemini", "from gemini");
        let cascade = AiCascade::new(tiers(&[&openai, &gemini]));

        let outcome = cascade
            .complete(&question(), ChatOptions::default(), || "local answer".to_string())
            .await;

        assert_eq!(outcome.content, "from openai");
        assert_eq!(outcome.source, "openai");
        assert!(!outcome.is_local());
        assert_eq!(openai.calls(), 1);
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_next_tier() {
        let openai = FakeProvider::failing("openai", || LlmError::Timeout);
        let gemini = FakeProvider::ok("gemini", "from gemini");
        let cascade = AiCascade::new(tiers(&[&openai, &gemini]));

        let outcome = cascade
            .complete(&question(), ChatOptions::default(), || "local answer".to_string())
            .await;

        assert_eq!(outcome.source, "gemini");
        assert_eq!(outcome.content, "from gemini");
        assert_eq!(openai.calls(), 1);
        assert_eq!(gemini.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_failures_use_local_fallback() {
        let openai = FakeProvider::failing("openai", || LlmError::RateLimited);
        let gemini = FakeProvider::failing("gemini", || LlmError::Api("500".to_string()));
        let cascade = AiCascade::new(tiers(&[&openai, &gemini]));

        let outcome = cascade
            .complete(&question(), ChatOptions::default(), || "local answer".to_string())
            .await;

        assert_eq!(outcome.source, LOCAL_SOURCE);
        assert_eq!(outcome.content, "local answer");
        assert!(outcome.is_local());
        assert_eq!(openai.calls(), 1);
        assert_eq!(gemini.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_cascade_is_local() {
        let cascade = AiCascade::default();
        assert!(cascade.is_empty());

        let outcome = cascade
            .complete(&question(), ChatOptions::default(), || "local answer".to_string())
            .await;
        assert!(outcome.is_local());
    }

    #[tokio::test]
    async fn test_defaults_fill_missing_options() {
        let provider = FakeProvider::ok("openai", "ok");
        let cascade = AiCascade::new(tiers(&[&provider])).with_defaults(ChatOptions {
            temperature: Some(0.2),
            max_tokens: Some(256),
            ..Default::default()
        });

        cascade
            .complete(
                &question(),
                ChatOptions {
                    max_tokens: Some(64),
                    ..Default::default()
                },
                String::new,
            )
            .await;

        let used = provider.last_options.lock().unwrap().clone().unwrap();
        assert_eq!(used.temperature, Some(0.2));
        assert_eq!(used.max_tokens, Some(64));
        assert_eq!(cascade.provider_names(), vec!["openai".to_string()]);
    }

    #[tokio::test]
    async fn test_narrate_falls_back_to_summary() {
        let result = analyze_text("Stop scrolling! You need this one tip today.", AnalysisMode::Creator);
        let cascade = AiCascade::new(tiers(&[&FakeProvider::failing("openai", || LlmError::NotConfigured)]));

        let outcome = cascade.narrate(&result, "text").await;
        assert!(outcome.is_local());
        assert_eq!(outcome.content, result.summary);
    }

    #[tokio::test]
    async fn test_narrate_sends_scores_to_provider() {
        let result = analyze_text("Why do your videos stall at 200 views?", AnalysisMode::Creator);
        let provider = FakeProvider::ok("gemini", "A friendly narrative.");
        let cascade = AiCascade::new(tiers(&[&provider]));

        let outcome = cascade.narrate(&result, "text").await;
        assert_eq!(outcome.source, "gemini");
        assert_eq!(outcome.content, "A friendly narrative.");

        let used = provider.last_options.lock().unwrap().clone().unwrap();
        assert!(used.system_prompt.is_some());
    }

    #[tokio::test]
    async fn test_provider_without_key_is_not_configured() {
        let gemini = GeminiProvider::new(
            String::new(),
            "http://127.0.0.1:1".to_string(),
            "gemini-1.5-flash".to_string(),
            Duration::from_secs(5),
        );
        let err = gemini.chat(&[Message::user("hi")], ChatOptions::default()).await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));

        let openai = OpenAiProvider::new(
            "  ".to_string(),
            "http://127.0.0.1:1".to_string(),
            "gpt-4o-mini".to_string(),
            Duration::from_secs(5),
        );
        let err = openai.chat(&[Message::user("hi")], ChatOptions::default()).await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }

    #[tokio::test]
    async fn test_network_errors_do_not_expose_api_keys() {
        const KEY: &str = "SUPERSECRETKEY";
        let providers: [Arc<dyn LlmProvider>; 2] = [
            Arc::new(GeminiProvider::new(
                KEY.to_string(),
                "http://127.0.0.1:1".to_string(),
                "gemini-1.5-flash".to_string(),
                Duration::from_secs(5),
            )),
            Arc::new(OpenAiProvider::new(
                KEY.to_string(),
                "http://127.0.0.1:1".to_string(),
                "gpt-4o-mini".to_string(),
                Duration::from_secs(5),
            )),
        ];

        for provider in providers {
            let err = provider.chat(&[Message::user("hi")], ChatOptions::default()).await.unwrap_err();
            let text = err.to_string();
            assert!(!text.contains(KEY), "{} leaked its key: {}", provider.name(), text);
        }
    }
}
