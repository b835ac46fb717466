//! OpenAI-backed text generation
//!
//! The whole built prompt (persona preamble, history, cue) travels as a
//! single user message; the backend is otherwise opaque to the core.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use std::time::Duration;
use tokio::time::timeout;

use super::TextGenerator;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

pub struct OpenAiGenerator {
    model: String,
}

impl OpenAiGenerator {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = vec![ChatCompletionMessage {
            role: ChatCompletionMessageRole::User,
            content: Some(prompt.to_string()),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }];

        let completion = timeout(
            REQUEST_TIMEOUT,
            ChatCompletion::builder(&self.model, messages).create(),
        )
        .await
        .map_err(|_| {
            anyhow!(
                "OpenAI request timed out after {} seconds",
                REQUEST_TIMEOUT.as_secs()
            )
        })??;

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow!("no completion content from model {}", self.model))
    }
}
