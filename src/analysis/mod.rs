pub mod gemini;
pub mod rules;
pub mod types;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::GeminiConfig;

pub use gemini::GeminiAnalyzer;
pub use rules::classify;
pub use types::{Classification, Priority, Sentiment};

/// Classifies complaint text. Sentiment comes from the remote analyzer when
/// one is configured and reachable; priority always comes from the shared
/// rule table. Remote failures degrade to the local priority-only result.
#[derive(Clone)]
pub struct Analyzer {
    remote: Option<Arc<GeminiAnalyzer>>,
}

impl Analyzer {
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let remote = GeminiAnalyzer::new(config)?.map(Arc::new);
        match &remote {
            Some(_) => info!("Sentiment analyzer: Gemini ({})", config.model),
            None => info!("Sentiment analyzer: local keyword rules only (GEMINI_API_KEY not set)"),
        }
        Ok(Self { remote })
    }

    pub fn local_only() -> Self {
        Self { remote: None }
    }

    pub async fn analyze(&self, text: &str) -> Classification {
        let local = classify(text);
        if rules::is_too_short(text) {
            return local;
        }

        let Some(remote) = &self.remote else {
            return local;
        };

        match remote.analyze(text).await {
            Ok((sentiment, confidence)) => {
                Classification::with_sentiment(local.priority, sentiment, confidence)
            }
            Err(e) => {
                warn!("Remote sentiment analysis failed, using local rules: {:#}", e);
                local
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_remote() -> Analyzer {
        let config = GeminiConfig {
            model: "gemini-test".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
            max_concurrent: 1,
            timeout_secs: 1,
            api_key: Some("test-key".to_string()),
        };
        Analyzer::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn local_only_matches_rule_table() {
        let analyzer = Analyzer::local_only();
        let c = analyzer.analyze("jalan rusak parah dekat sekolah").await;
        assert_eq!(c, classify("jalan rusak parah dekat sekolah"));
        assert_eq!(c.priority, Priority::High);
        assert_eq!(c.sentiment, Sentiment::Unknown);
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_local_priority() {
        let analyzer = unreachable_remote();
        assert!(analyzer.remote.is_some());

        let c = analyzer.analyze("ada kecelakaan di jalan tol").await;
        assert_eq!(c.priority, Priority::Urgent);
        assert_eq!(c.sentiment, Sentiment::Unknown);
        assert_eq!(c.confidence, None);
    }

    #[tokio::test]
    async fn short_text_never_reaches_remote() {
        let analyzer = unreachable_remote();
        let c = analyzer.analyze("banjir").await;
        assert_eq!(c, Classification::priority_only(Priority::Low));
    }
}
