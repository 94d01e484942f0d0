//! Narrative text from a generative text service
//!
//! Supplies the mission briefing at startup and codec dialogue whenever a radio
//! call opens. Speaks the `models/{model}:generateContent` JSON API. Nothing here
//! is allowed to fail the game: every public `*_or_fallback` call resolves to
//! displayable text.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::settings::NarrativeConfig;

/// Shown on the title screen until the briefing resolves
pub const BRIEFING_PLACEHOLDER: &str = "Decrypting mission parameters...";
/// Shown on the codec until the dialogue resolves
pub const DIALOGUE_PLACEHOLDER: &str = "Initializing secure link...";

pub const BRIEFING_FALLBACK: &str = "Mission briefing unavailable. Proceed with caution.";
/// Service answered with no text
pub const DIALOGUE_FALLBACK: &str = "Stay low, keep your eyes open.";
/// Service unreachable or errored
pub const DIALOGUE_JAMMED: &str = "Connection lost. Intermittent jamming detected.";

const BRIEFING_SYSTEM: &str = "You are Colonel Kapten, a veteran military commander. \
Your tone is gruff, professional, and urgent. Use military terminology.";
const BRIEFING_PROMPT: &str = "Write a short, high-tension mission briefing for a Metal Gear \
style game. The operation is called \"Silent Kapten\". The target is an underground research \
facility holding a prototype EMP device. Keep it under 100 words.";

const CODEC_SYSTEM: &str =
    "You are Colonel Kapten. You are providing radio support via Codec. Be helpful but brief.";

fn codec_prompt(situation: &str) -> String {
    format!(
        "The operative is in this situation: {}. Provide a short tactical tip or story flavor \
         as Colonel Kapten. Keep it under 50 words.",
        situation
    )
}

/// Async client for the narrative service
#[derive(Debug, Clone)]
pub struct NarrativeClient {
    client: Client,
    config: NarrativeConfig,
}

impl NarrativeClient {
    pub fn new(config: NarrativeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Endpoint for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one system + user prompt and return the generated text (may be empty)
    pub async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GameError::NotConfigured("no API key".into()))?;

        let request = GenerateRequest::new(system, prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GameError::Narrative(format!("API error {}: {}", status, error_text)));
        }

        let completion: GenerateResponse = response.json().await?;
        Ok(completion.text())
    }

    pub async fn briefing(&self) -> Result<String> {
        self.generate(BRIEFING_SYSTEM, BRIEFING_PROMPT).await
    }

    pub async fn radio_dialogue(&self, situation: &str) -> Result<String> {
        self.generate(CODEC_SYSTEM, &codec_prompt(situation)).await
    }

    pub async fn briefing_or_fallback(&self) -> String {
        resolve_briefing(self.briefing().await)
    }

    pub async fn radio_dialogue_or_fallback(&self, situation: &str) -> String {
        resolve_dialogue(self.radio_dialogue(situation).await)
    }
}

/// Briefing text to display for a fetch result
pub fn resolve_briefing(result: Result<String>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => BRIEFING_FALLBACK.to_string(),
        Err(e) => {
            log::warn!("Briefing fetch failed: {}", e);
            BRIEFING_FALLBACK.to_string()
        }
    }
}

/// Codec text to display for a fetch result
pub fn resolve_dialogue(result: Result<String>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => DIALOGUE_FALLBACK.to_string(),
        Err(e) => {
            log::warn!("Codec fetch failed: {}", e);
            DIALOGUE_JAMMED.to_string()
        }
    }
}

// generateContent wire format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn new(system: &str, prompt: &str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system.into(),
                }],
            },
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, empty if there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
