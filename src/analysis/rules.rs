//! Keyword rule table shared by every classification path.
//!
//! Tiers are checked most severe first and the first tier with a matching
//! keyword wins. Matching is plain case-insensitive substring containment:
//! no tokenisation, so a keyword inside a longer word still counts.

use super::types::{Classification, Priority};

/// Descriptions shorter than this (in characters) are not classified.
pub const MIN_TEXT_CHARS: usize = 10;

pub const PRIORITY_RULES: &[(Priority, &[&str])] = &[
    (
        Priority::Urgent,
        &[
            "kebakaran",
            "kecelakaan",
            "darurat",
            "mendesak",
            "bahaya",
            "tewas",
            "luka",
            "kritis",
        ],
    ),
    (
        Priority::High,
        &[
            "rusak parah",
            "mengganggu",
            "penting",
            "segera",
            "mogok",
            "macet total",
            "banjir",
        ],
    ),
    (
        Priority::Medium,
        &[
            "perlu perbaikan",
            "gangguan",
            "kurang",
            "lubang",
            "kotor",
            "sampah menumpuk",
        ],
    ),
];

pub fn is_too_short(text: &str) -> bool {
    text.chars().count() < MIN_TEXT_CHARS
}

/// Priority from keywords alone. Does not apply the length threshold.
pub fn priority_for(text: &str) -> Priority {
    let text = text.to_lowercase();
    PRIORITY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(priority, _)| *priority)
        .unwrap_or(Priority::Low)
}

/// Local classification: priority only, sentiment left unknown.
pub fn classify(text: &str) -> Classification {
    if is_too_short(text) {
        return Classification::priority_only(Priority::Low);
    }
    Classification::priority_only(priority_for(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::Sentiment;

    #[test]
    fn short_text_is_low_and_unknown() {
        for text in ["", "banjir", "kebakaran", "123456789"] {
            let c = classify(text);
            assert_eq!(c.priority, Priority::Low, "{text:?}");
            assert_eq!(c.sentiment, Sentiment::Unknown);
            assert_eq!(c.confidence, None);
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 9 chars, 18 bytes
        assert!(is_too_short("ééééééééé"));
        assert!(!is_too_short("éééééééééé"));
    }

    #[test]
    fn urgent_beats_every_lower_tier() {
        let c = classify("ada kebakaran, jalan banjir dan lubang besar");
        assert_eq!(c.priority, Priority::Urgent);
    }

    #[test]
    fn flood_without_urgent_terms_is_high() {
        assert_eq!(classify("jalan utama banjir sejak pagi").priority, Priority::High);
    }

    #[test]
    fn pothole_alone_is_medium() {
        assert_eq!(classify("ada lubang di depan pasar").priority, Priority::Medium);
    }

    #[test]
    fn no_keyword_is_low() {
        assert_eq!(
            classify("pelayanan kelurahan ramah, terima kasih").priority,
            Priority::Low
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(classify("KEBAKARAN besar").priority, Priority::Urgent);
        assert_eq!(classify("Macet Total di simpang").priority, Priority::High);
    }

    #[test]
    fn keyword_inside_longer_word_matches() {
        // "melukai" contains "luka"
        assert_eq!(classify("anjing liar melukai warga").priority, Priority::Urgent);
    }

    #[test]
    fn rule_table_is_ordered_most_severe_first() {
        let tiers: Vec<Priority> = PRIORITY_RULES.iter().map(|(p, _)| *p).collect();
        let expected: Vec<Priority> = Priority::all()
            .iter()
            .copied()
            .filter(|p| *p != Priority::Low)
            .collect();
        assert_eq!(tiers, expected);
        assert!(tiers.windows(2).all(|w| w[0] > w[1]));
    }
}
