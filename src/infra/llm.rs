use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::prompt::Prompt;
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

const TEMPERATURE: f32 = 0.5;

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            api_base,
            model,
        }
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn generate_commit_message(&self, prompt: &Prompt) -> AppResult<String> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.as_str(),
            }],
        };

        let response = self
            .http
            .post(self.chat_endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to call API: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "API responded with {status}: {body}"
            )));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse API response: {err}"))
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::LanguageModel("API response contained no choices".to_string())
            })?;

        Ok(clean_message(&content))
    }
}

// Tags models put on an opening fence around plain commit messages.
const FENCE_TAGS: [&str; 6] = ["text", "plaintext", "txt", "markdown", "md", "gitcommit"];

/// Strips whitespace, a surrounding code fence, and wrapping quotes the model
/// sometimes adds around the message. Interior content is left untouched.
fn clean_message(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with("```") && text.ends_with("```") && text.len() > 6 {
        text = text.trim_start_matches("```");
        // Drop the rest of the fence line only when it is empty or a known
        // language tag; anything else is message content on the fence line.
        if let Some((first, rest)) = text.split_once('\n') {
            let tag = first.trim();
            if tag.is_empty() || FENCE_TAGS.contains(&tag.to_lowercase().as_str()) {
                text = rest;
            }
        }
        text = text.trim_end_matches("```").trim();
    }

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = &text[1..text.len() - 1];
    }

    text.trim().to_string()
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
