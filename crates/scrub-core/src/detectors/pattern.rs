//! Regex-based entity detector.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scrub_common::{EntityCandidate, Result, ScrubError};

use super::EntityDetector;

/// One recognizer: entity type, pattern, and the fixed confidence its
/// matches are reported with.
struct Recognizer {
    entity_type: &'static str,
    pattern: &'static Lazy<Regex>,
    confidence: f64,
}

static RE_US_SSN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap());

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static RE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\(\d{3}\)\s?|\b\d{3}[-. ])\d{3}[-. ]\d{4}\b").unwrap()
});

static RE_MRN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bMRN[:#\s-]*\d{6,10}\b").unwrap());

static RE_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:RX|Rx)[:#\s-]*\d{6,10}\b").unwrap());

static RE_INSURANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Insurance|Member)\s+ID[:\s-]*[A-Z0-9]{6,15}\b").unwrap()
});

static RE_IP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());

static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bhttps?://[^\s<>]+").unwrap());

// Table order is fixed so detection is deterministic before sorting.
static RECOGNIZERS: &[Recognizer] = &[
    Recognizer {
        entity_type: "US_SSN",
        pattern: &RE_US_SSN,
        confidence: 0.85,
    },
    Recognizer {
        entity_type: "EMAIL_ADDRESS",
        pattern: &RE_EMAIL,
        confidence: 0.9,
    },
    Recognizer {
        entity_type: "PHONE_NUMBER",
        pattern: &RE_PHONE,
        confidence: 0.7,
    },
    Recognizer {
        entity_type: "MEDICAL_RECORD_NUMBER",
        pattern: &RE_MRN,
        confidence: 0.85,
    },
    Recognizer {
        entity_type: "PRESCRIPTION_NUMBER",
        pattern: &RE_RX,
        confidence: 0.8,
    },
    Recognizer {
        entity_type: "INSURANCE_ID",
        pattern: &RE_INSURANCE,
        confidence: 0.75,
    },
    Recognizer {
        entity_type: "IP_ADDRESS",
        pattern: &RE_IP,
        confidence: 0.6,
    },
    Recognizer {
        entity_type: "URL",
        pattern: &RE_URL,
        confidence: 0.6,
    },
];

/// Detects PII via a fixed table of regex recognizers.
///
/// Byte offsets from the regex engine are converted to char offsets
/// before candidates leave this module; everything downstream works in
/// chars.
#[derive(Default)]
pub struct PatternDetector;

impl PatternDetector {
    pub fn new() -> Self {
        Self
    }

    /// Entity types this detector can produce.
    pub fn supported_entities() -> Vec<&'static str> {
        RECOGNIZERS.iter().map(|r| r.entity_type).collect()
    }
}

impl EntityDetector for PatternDetector {
    fn detect(
        &self,
        text: &str,
        enabled: &BTreeSet<String>,
        min_confidence: f64,
    ) -> Result<Vec<EntityCandidate>> {
        // Byte offset of every char boundary, plus the end sentinel.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let to_char = |byte: usize| -> Result<usize> {
            boundaries.binary_search(&byte).map_err(|_| {
                ScrubError::Detection(format!("match offset {byte} not on a char boundary"))
            })
        };

        let mut candidates = Vec::new();
        for recognizer in RECOGNIZERS {
            if !enabled.contains(recognizer.entity_type) || recognizer.confidence < min_confidence
            {
                continue;
            }
            for found in recognizer.pattern.find_iter(text) {
                candidates.push(EntityCandidate::new(
                    recognizer.entity_type,
                    to_char(found.start())?,
                    to_char(found.end())?,
                    recognizer.confidence,
                ));
            }
        }

        candidates.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.end.cmp(&b.end))
                .then(a.entity_type.cmp(&b.entity_type))
        });
        Ok(candidates)
    }
}
