//! Shared test doubles and in-process HTTP stubs

use std::sync::Mutex;

use agent_core::{
    AgentError, Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo},
};
use async_trait::async_trait;
use axum::Router;
use serde_json::{Value, json};

use crate::notify::Notifier;

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

/// Exchange-shaped kline rows: strings for prices, trailing unused fields
pub fn synthetic_rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            let open = 50_000 + i * 10;
            json!([
                1_700_000_000_000_u64 + (i as u64) * 900_000,
                format!("{open}.00"),
                format!("{}.50", open + 20),
                format!("{}.25", open - 20),
                format!("{}.75", open + 5),
                format!("{}.125", 100 + i),
                1_700_000_000_000_u64 + (i as u64) * 900_000 + 899_999,
                "0",
                42,
                "0",
                "0",
                "0"
            ])
        })
        .collect()
}

/// Provider returning a fixed reply (or error) and recording prompts
pub struct ScriptedProvider {
    reply: std::result::Result<String, String>,
    pub prompts: Mutex<Vec<(Vec<Message>, GenerationOptions)>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self { reply: Ok(text.into()), prompts: Mutex::default() }
    }

    pub fn failing(msg: &str) -> Self {
        Self { reply: Err(msg.into()), prompts: Mutex::default() }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn health_check(&self) -> agent_core::Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> agent_core::Result<Completion> {
        self.prompts.lock().unwrap().push((messages.to_vec(), options.clone()));
        match &self.reply {
            Ok(text) => Ok(Completion {
                content: text.clone(),
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            }),
            Err(msg) => Err(AgentError::Provider(msg.clone())),
        }
    }

    async fn list_models(&self) -> agent_core::Result<Vec<ModelInfo>> {
        Ok(Vec::new())
    }
}

/// Notifier capturing every message
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
