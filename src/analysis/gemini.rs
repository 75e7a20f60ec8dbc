use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

use super::types::Sentiment;
use crate::config::GeminiConfig;

/// Remote sentiment analysis through the Gemini `generateContent` API.
pub struct GeminiAnalyzer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct SentimentResponse {
    sentiment: String,
    confidence: f32,
}

const SYSTEM_PROMPT: &str = r#"You classify the sentiment of citizen complaints submitted to the city government of Medan, Indonesia. Complaints are usually written in Indonesian and describe public infrastructure, sanitation, traffic, safety or public service problems.

Sentiment categories:
- positif: praise, thanks, satisfaction with a service
- negatif: dissatisfaction, frustration, reports of damage, danger or neglect
- netral: factual report or question with no clear emotional valence

confidence: 0.0-1.0, how sure you are of the label.

Respond ONLY with JSON:
{"sentiment": "<positif|negatif|netral>", "confidence": <0.0-1.0>}"#;

impl GeminiAnalyzer {
    /// Returns `None` when no API key is configured.
    pub fn new(config: &GeminiConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Some(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        }))
    }

    /// Sentiment label and confidence on a 0-100 scale.
    pub async fn analyze(&self, text: &str) -> Result<(Sentiment, f32)> {
        let _permit = self.semaphore.acquire().await?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let prompt = format!("{}\n\nComplaint:\n\"{}\"", SYSTEM_PROMPT, text);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 64,
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Gemini API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API returned {}: {}", status, body);
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text = gemini_resp
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_ref())
            .and_then(|p| p.first())
            .and_then(|p| p.text.as_ref())
            .context("Empty Gemini response")?;

        let result = parse_reply(text)?;
        debug!("Gemini sentiment: {} ({:.1}%)", result.0, result.1);
        Ok(result)
    }
}

fn parse_reply(text: &str) -> Result<(Sentiment, f32)> {
    let parsed: SentimentResponse =
        serde_json::from_str(text).context("Failed to parse sentiment JSON from Gemini")?;

    let sentiment = Sentiment::from_label(&parsed.sentiment);
    if sentiment == Sentiment::Unknown {
        anyhow::bail!("Gemini returned unknown sentiment {:?}", parsed.sentiment);
    }

    // Models occasionally answer on a percentage scale
    let confidence = if parsed.confidence <= 1.0 {
        parsed.confidence * 100.0
    } else {
        parsed.confidence
    };

    Ok((sentiment, confidence.clamp(0.0, 100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            model: "gemini-test".to_string(),
            base_url: "http://127.0.0.1:1/".to_string(),
            max_concurrent: 0,
            timeout_secs: 1,
            api_key: api_key.map(str::to_string),
        }
    }

    #[test]
    fn no_api_key_means_no_remote() {
        assert!(GeminiAnalyzer::new(&config(None)).unwrap().is_none());
    }

    #[test]
    fn base_url_is_normalised() {
        let analyzer = GeminiAnalyzer::new(&config(Some("k"))).unwrap().unwrap();
        assert_eq!(analyzer.base_url, "http://127.0.0.1:1");
        assert_eq!(analyzer.semaphore.available_permits(), 1);
    }

    #[test]
    fn reply_confidence_is_scaled_to_percent() {
        let (s, c) = parse_reply(r#"{"sentiment": "negatif", "confidence": 0.87}"#).unwrap();
        assert_eq!(s, Sentiment::Negative);
        assert!((c - 87.0).abs() < 1e-3);

        let (_, c) = parse_reply(r#"{"sentiment": "Netral", "confidence": 64}"#).unwrap();
        assert!((c - 64.0).abs() < 1e-3);
    }

    #[test]
    fn unusable_reply_is_an_error() {
        assert!(parse_reply("not json").is_err());
        assert!(parse_reply(r#"{"sentiment": "marah", "confidence": 0.5}"#).is_err());
    }

    #[tokio::test]
    async fn request_errors_do_not_expose_the_api_key() {
        let analyzer = GeminiAnalyzer::new(&config(Some("secret-test-key")))
            .unwrap()
            .unwrap();
        let err = analyzer.analyze("jalan banjir setiap hujan").await.unwrap_err();
        let rendered = format!("{:#} {:?}", err, err);
        assert!(!rendered.contains("secret-test-key"), "{rendered}");
    }
}
