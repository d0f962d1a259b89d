pub mod parser;

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::config::AiConfig;
use parser::{parse_ideas, BlogIdea};

pub const IDEA_PROMPT: &str = "Give me 2 blog ideas. Each should have a title and a summary. \
Format every idea exactly as:\n1. **Title: <title>**\nSummary: <summary>";

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request to the generative API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generative API answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generative API returned no text")]
    EmptyResponse,
    #[error("no ideas could be parsed from the response")]
    NoIdeas,
}

/// Client for the Gemini `generateContent` endpoint
pub struct IdeaClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, joined
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl IdeaClient {
    pub fn new(config: &AiConfig) -> Result<IdeaClient, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(IdeaClient {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        })
    }

    /// Sends `prompt` and returns the generated text
    pub async fn generate_text(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateResponse>()
            .await?
            .into_text()
            .ok_or(AiError::EmptyResponse)
    }

    /// Asks for blog ideas with [`IDEA_PROMPT`]; fails if none parse
    pub async fn blog_ideas(&self) -> Result<Vec<BlogIdea>, AiError> {
        let text = self.generate_text(IDEA_PROMPT).await?;
        let ideas = parse_ideas(&text);
        if ideas.is_empty() {
            log::warn!("could not parse ideas from generated text: {:?}", text);
            return Err(AiError::NoIdeas);
        }

        Ok(ideas)
    }
}
