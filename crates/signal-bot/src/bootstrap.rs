//! Component Wiring
//!
//! Builds every collaborator from `Settings`. No network traffic happens
//! here; the first request is made by the first scheduled cycle.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider};
use agent_runtime::{GroqConfig, GroqProvider};
use crypto_advisor::{
    AdvisorConfig, RecommendationEngine, TradingCycle,
    advisor::DEFAULT_TEMPERATURE,
    exchange::{BinanceClient, ExchangeClient},
    notify::{TelegramConfig, TelegramNotifier},
};
use reqwest::Client;

use crate::config::Settings;

/// Completion provider for the configured model
pub fn build_provider(settings: &Settings, http: &Client) -> Arc<GroqProvider> {
    let config = GroqConfig::new(settings.groq_api_key.clone()).with_base_url(&settings.groq_base_url);
    Arc::new(GroqProvider::new(http.clone(), config))
}

/// Market-data client for the configured exchange endpoint
pub fn build_exchange(settings: &Settings, http: &Client) -> Arc<BinanceClient> {
    Arc::new(BinanceClient::new(http.clone(), &settings.binance_base_url))
}

/// Exchange → engine → notifier pipeline
pub fn build_cycle(
    settings: &Settings,
    http: &Client,
    exchange: Arc<dyn ExchangeClient>,
    provider: Arc<dyn LlmProvider>,
) -> TradingCycle {
    let engine = RecommendationEngine::new(
        provider,
        AdvisorConfig {
            market: settings.market.clone(),
            probability_threshold: settings.probability_threshold,
            generation: GenerationOptions::for_model(&settings.llm_model)
                .with_temperature(DEFAULT_TEMPERATURE),
        },
    );

    let notifier = Arc::new(TelegramNotifier::new(
        http.clone(),
        TelegramConfig::new(&settings.telegram_token, &settings.telegram_chat_id)
            .with_api_base(&settings.telegram_api_base),
    ));

    TradingCycle::new(exchange, engine, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Form, Json, Router,
        extract::Query,
        routing::{get, post},
    };
    use crypto_advisor::{CycleOutcome, cycle::REPORT_HEADER};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const LITERAL: &str = r#"{"action":"long","et":50000,"sl":49000,"tp1":51000,"tp2":52000,"tp3":53000,"prob":75}"#;

    #[derive(Clone, Default)]
    struct Recorded {
        kline_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
        prompts: Arc<Mutex<Vec<Value>>>,
        chat_posts: Arc<Mutex<Vec<HashMap<String, String>>>>,
    }

    fn rows(n: u64) -> Value {
        let rows: Vec<Value> = (0..n)
            .map(|i| {
                json!([
                    1_700_000_000_000_u64 + i * 900_000,
                    "50000.00", "50100.00", "49900.00", "50050.00", "12.5",
                    1_700_000_000_000_u64 + i * 900_000 + 899_999,
                    "625625.0", 10, "6.0", "300300.0", "0"
                ])
            })
            .collect();
        Value::Array(rows)
    }

    /// Exchange, completion provider and chat API on one local server
    async fn stub_upstreams(recorded: Recorded) -> String {
        let r1 = recorded.clone();
        let r2 = recorded.clone();
        let r3 = recorded;
        let app = Router::new()
            .route(
                "/fapi/v1/klines",
                get(move |Query(q): Query<HashMap<String, String>>| {
                    let r = r1.clone();
                    async move {
                        r.kline_queries.lock().unwrap().push(q);
                        Json(rows(100))
                    }
                }),
            )
            .route(
                "/openai/v1/chat/completions",
                post(move |Json(body): Json<Value>| {
                    let r = r2.clone();
                    async move {
                        r.prompts.lock().unwrap().push(body);
                        Json(json!({
                            "model": "stub",
                            "choices": [{ "message": { "role": "assistant", "content": LITERAL }, "finish_reason": "stop" }]
                        }))
                    }
                }),
            )
            .route(
                "/botT0KEN/sendMessage",
                post(move |Form(form): Form<HashMap<String, String>>| {
                    let r = r3.clone();
                    async move {
                        r.chat_posts.lock().unwrap().push(form);
                        Json(json!({ "ok": true }))
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn settings(base: &str) -> Settings {
        let vars: HashMap<&str, String> = [
            ("GROQ_API_KEY", "gsk_test".to_string()),
            ("TELEGRAM_TOKEN", "T0KEN".to_string()),
            ("TELEGRAM_CHAT_ID", "-10042".to_string()),
            ("BINANCE_BASE_URL", format!("{base}/fapi/v1")),
            ("GROQ_BASE_URL", format!("{base}/openai/v1")),
            ("TELEGRAM_API_BASE", base.to_string()),
        ]
        .into_iter()
        .collect();
        Settings::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_cycle() {
        let recorded = Recorded::default();
        let base = stub_upstreams(recorded.clone()).await;
        let settings = settings(&base);
        let http = Client::new();

        let exchange = build_exchange(&settings, &http);
        let provider = build_provider(&settings, &http);
        let cycle = build_cycle(&settings, &http, exchange, provider);

        let outcome = cycle.run_once().await;
        assert_eq!(outcome, CycleOutcome::Delivered { candles: 100 });

        let queries = recorded.kline_queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0]["symbol"], "BTCUSDT");
        assert_eq!(queries[0]["interval"], "15m");
        assert_eq!(queries[0]["limit"], "100");

        let prompts = recorded.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0]["model"], "meta-llama/llama-4-maverick-17b-128e-instruct");
        let prompt = prompts[0]["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("BTCUSDT"));
        assert!(prompt.contains("above 60%"));

        let posts = recorded.chat_posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["chat_id"], "-10042");
        assert_eq!(posts[0]["parse_mode"], "Markdown");
        assert_eq!(posts[0]["text"], format!("{REPORT_HEADER}\n\n{LITERAL}"));
    }

    #[tokio::test]
    async fn test_exchange_health_check_uses_configured_base() {
        let app = Router::new().route("/fapi/v1/ping", get(|| async { Json(json!({})) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let settings = settings(&format!("http://{addr}"));
        let http = Client::new();

        assert!(build_exchange(&settings, &http).health_check().await);

        let mut unreachable = settings.clone();
        unreachable.binance_base_url = "http://127.0.0.1:9".into();
        assert!(!build_exchange(&unreachable, &http).health_check().await);
    }

    #[tokio::test]
    async fn test_exchange_outage_skips_without_chat_post() {
        let recorded = Recorded::default();
        let base = stub_upstreams(recorded.clone()).await;
        let mut settings = settings(&base);
        settings.binance_base_url = format!("{base}/missing");
        let http = Client::new();

        let cycle = build_cycle(
            &settings,
            &http,
            build_exchange(&settings, &http),
            build_provider(&settings, &http),
        );
        let outcome = cycle.run_once().await;

        assert!(matches!(outcome, CycleOutcome::Skipped { .. }));
        assert!(recorded.prompts.lock().unwrap().is_empty());
        assert!(recorded.chat_posts.lock().unwrap().is_empty());
    }
}
