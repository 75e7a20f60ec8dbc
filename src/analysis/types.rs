use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotional valence of a complaint description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sentiment {
    #[serde(rename = "Positif")]
    Positive,
    #[serde(rename = "Negatif")]
    Negative,
    #[serde(rename = "Netral")]
    Neutral,
    #[default]
    #[serde(rename = "Tidak Diketahui")]
    Unknown,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positif",
            Sentiment::Negative => "Negatif",
            Sentiment::Neutral => "Netral",
            Sentiment::Unknown => "Tidak Diketahui",
        }
    }

    /// Lenient parse used for remote analyzer output. Anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positif" | "positive" => Sentiment::Positive,
            "negatif" | "negative" => Sentiment::Negative,
            "netral" | "neutral" => Sentiment::Neutral,
            _ => Sentiment::Unknown,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Priority tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    #[default]
    #[serde(rename = "Rendah")]
    Low,
    #[serde(rename = "Sedang")]
    Medium,
    #[serde(rename = "Tinggi")]
    High,
    #[serde(rename = "Sangat Mendesak")]
    Urgent,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Rendah",
            Priority::Medium => "Sedang",
            Priority::High => "Tinggi",
            Priority::Urgent => "Sangat Mendesak",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::Urgent, Priority::High, Priority::Medium, Priority::Low]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised label: {0:?}")]
pub struct UnknownLabel(pub String);

/// Output of the classifier. `confidence` is 0-100 and only present when
/// `sentiment` is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub confidence: Option<f32>,
    pub priority: Priority,
}

impl Classification {
    /// Priority-only result, as produced by the local path.
    pub fn priority_only(priority: Priority) -> Self {
        Self {
            sentiment: Sentiment::Unknown,
            confidence: None,
            priority,
        }
    }

    pub fn with_sentiment(priority: Priority, sentiment: Sentiment, confidence: f32) -> Self {
        if sentiment == Sentiment::Unknown {
            return Self::priority_only(priority);
        }
        Self {
            sentiment,
            confidence: Some(confidence.clamp(0.0, 100.0)),
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_by_severity() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn wire_labels_are_indonesian() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"Sangat Mendesak\"");
        assert_eq!(serde_json::to_string(&Sentiment::Unknown).unwrap(), "\"Tidak Diketahui\"");
        let p: Priority = serde_json::from_str("\"Tinggi\"").unwrap();
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn sentiment_label_parse_is_lenient() {
        assert_eq!(Sentiment::from_label(" Negatif "), Sentiment::Negative);
        assert_eq!(Sentiment::from_label("positive"), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("marah"), Sentiment::Unknown);
    }

    #[test]
    fn unknown_sentiment_drops_confidence() {
        let c = Classification::with_sentiment(Priority::High, Sentiment::Unknown, 80.0);
        assert_eq!(c.confidence, None);
        let c = Classification::with_sentiment(Priority::High, Sentiment::Negative, 140.0);
        assert_eq!(c.confidence, Some(100.0));
    }
}
