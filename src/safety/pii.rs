use regex::Regex;
use serde::Serialize;

/// PII categories this scrubber knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    Email,
    Phone,
    Ssn,
    CreditCard,
}

/// Result of a scrub pass.
#[derive(Debug, Clone)]
pub struct ScrubResult {
    /// Text with every match replaced by its category's redaction token.
    pub text: String,
    /// Every category that had at least one match (not a per-match count).
    pub pii_detected: Vec<PiiCategory>,
    /// True iff at least one category matched.
    pub was_scrubbed: bool,
}

/// A compiled PII detector with its redaction token.
struct PiiDetector {
    category: PiiCategory,
    regex: Regex,
    replacement: &'static str,
}

/// Removes personally identifiable information from text.
///
/// Detectors are evaluated independently in a fixed order and all apply to
/// the same text. Redaction tokens contain no digits or address characters,
/// so scrubbing already-scrubbed text is a no-op.
pub struct PiiScrubber {
    detectors: Vec<PiiDetector>,
}

impl PiiScrubber {
    pub fn new() -> Self {
        Self {
            detectors: build_detectors(),
        }
    }

    pub fn scrub(&self, text: &str) -> ScrubResult {
        let mut scrubbed = text.to_string();
        let mut pii_detected = Vec::new();

        for detector in &self.detectors {
            if detector.regex.is_match(&scrubbed) {
                scrubbed = detector
                    .regex
                    .replace_all(&scrubbed, detector.replacement)
                    .into_owned();
                pii_detected.push(detector.category);
            }
        }

        if !pii_detected.is_empty() {
            tracing::warn!("PII detected and scrubbed: {pii_detected:?}");
        }

        ScrubResult {
            text: scrubbed,
            was_scrubbed: !pii_detected.is_empty(),
            pii_detected,
        }
    }
}

impl Default for PiiScrubber {
    fn default() -> Self {
        Self::new()
    }
}

fn build_detectors() -> Vec<PiiDetector> {
    vec![
        PiiDetector {
            category: PiiCategory::Email,
            regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .expect("email pattern must compile"),
            replacement: "[EMAIL_REDACTED]",
        },
        PiiDetector {
            category: PiiCategory::Phone,
            regex: Regex::new(r"\b(?:\+?1[-.]?)?\(?[0-9]{3}\)?[-.]?[0-9]{3}[-.]?[0-9]{4}\b")
                .expect("phone pattern must compile"),
            replacement: "[PHONE_REDACTED]",
        },
        PiiDetector {
            category: PiiCategory::Ssn,
            regex: Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern must compile"),
            replacement: "[SSN_REDACTED]",
        },
        PiiDetector {
            category: PiiCategory::CreditCard,
            regex: Regex::new(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b")
                .expect("credit card pattern must compile"),
            replacement: "[CC_REDACTED]",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_untouched() {
        let scrubber = PiiScrubber::new();
        let result = scrubber.scrub("Paris is the capital of France.");
        assert_eq!(result.text, "Paris is the capital of France.");
        assert!(!result.was_scrubbed);
        assert!(result.pii_detected.is_empty());
    }

    #[test]
    fn test_email_redacted() {
        let scrubber = PiiScrubber::new();
        let result = scrubber.scrub("Contact alice@example.com for details");
        assert_eq!(result.text, "Contact [EMAIL_REDACTED] for details");
        assert_eq!(result.pii_detected, vec![PiiCategory::Email]);
    }

    #[test]
    fn test_phone_separator_conventions() {
        let scrubber = PiiScrubber::new();
        for phone in ["555-123-4567", "555.123.4567", "+1-555-123-4567", "5551234567"] {
            let result = scrubber.scrub(&format!("call {phone} now"));
            assert!(
                result.text.contains("[PHONE_REDACTED]"),
                "{phone} should be redacted, got: {}",
                result.text
            );
        }
    }

    #[test]
    fn test_ssn_redacted() {
        let scrubber = PiiScrubber::new();
        let result = scrubber.scrub("SSN 123-45-6789 on file");
        assert_eq!(result.text, "SSN [SSN_REDACTED] on file");
        assert_eq!(result.pii_detected, vec![PiiCategory::Ssn]);
    }

    #[test]
    fn test_credit_card_grouped_digits() {
        let scrubber = PiiScrubber::new();
        for cc in ["4111 1111 1111 1111", "4111-1111-1111-1111"] {
            let result = scrubber.scrub(&format!("card {cc}"));
            assert!(result.text.contains("[CC_REDACTED]"), "{cc} should be redacted");
            assert!(result.pii_detected.contains(&PiiCategory::CreditCard));
        }
    }

    #[test]
    fn test_all_four_categories_in_one_text() {
        let scrubber = PiiScrubber::new();
        let text = "Email alice@example.com, phone 555-123-4567, \
                    SSN 123-45-6789, card 4111 1111 1111 1111";
        let result = scrubber.scrub(text);

        assert!(!result.text.contains("alice@example.com"));
        assert!(!result.text.contains("555-123-4567"));
        assert!(!result.text.contains("123-45-6789"));
        assert!(!result.text.contains("4111 1111 1111 1111"));
        assert_eq!(
            result.pii_detected,
            vec![
                PiiCategory::Email,
                PiiCategory::Phone,
                PiiCategory::Ssn,
                PiiCategory::CreditCard,
            ]
        );
        assert!(result.was_scrubbed);
    }

    #[test]
    fn test_categories_listed_once_despite_multiple_matches() {
        let scrubber = PiiScrubber::new();
        let result = scrubber.scrub("a@b.com and c@d.org");
        assert_eq!(result.pii_detected, vec![PiiCategory::Email]);
    }

    #[test]
    fn test_scrub_is_idempotent() {
        let scrubber = PiiScrubber::new();
        let once = scrubber.scrub("reach me at alice@example.com or 555-123-4567");
        let twice = scrubber.scrub(&once.text);
        assert_eq!(twice.text, once.text);
        assert!(!twice.was_scrubbed);
    }
}
