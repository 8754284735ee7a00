#![allow(clippy::expect_used)]

use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

lazy_static! {
    static ref DATE_REGEX: Regex =
        Regex::new(r"\b(?:\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})\b").expect("date pattern");
    static ref MRN_REGEX: Regex = Regex::new(r"\bMRN[-:\s]?\d{4,}\b").expect("mrn pattern");
    static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern");
    static ref PHONE_REGEX: Regex =
        Regex::new(r"\b(?:\+1[-.\s]?)?\d{3}[-.\s]\d{3}[-.\s]\d{4}\b").expect("phone pattern");
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern");
}

/// Which identifiers are scrubbed from free text before it reaches a log line
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_dates: bool,
    pub redact_record_numbers: bool,
    pub redact_ssn: bool,
    pub redact_phones: bool,
    pub redact_emails: bool,
    /// Replace matches with a short stable hash so entries can still be correlated
    pub hash_for_correlation: bool,
}

impl RedactionConfig {
    /// Pass text through untouched
    pub fn none() -> Self {
        Self {
            redact_dates: false,
            redact_record_numbers: false,
            redact_ssn: false,
            redact_phones: false,
            redact_emails: false,
            hash_for_correlation: false,
        }
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_dates: true,
            redact_record_numbers: true,
            redact_ssn: true,
            redact_phones: true,
            redact_emails: true,
            hash_for_correlation: false,
        }
    }
}

/// PHI redactor for admission reasons and other clinician-entered text
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// Build the redactor the logger configuration asks for
    pub fn from_logger_config(config: &crate::LoggerConfig) -> Self {
        if config.redaction_enabled {
            Self::default()
        } else {
            Self::new(RedactionConfig::none())
        }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Dates go first so a date of birth is never mistaken for a phone number
        if self.config.redact_dates {
            result = self.replace(&DATE_REGEX, &result, "DATE", "[DATE]");
        }
        if self.config.redact_record_numbers {
            result = self.replace(&MRN_REGEX, &result, "MRN", "MRN[REDACTED]");
        }
        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", "***-**-****");
        }
        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", "***-***-****");
        }
        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", "***@***");
        }

        result
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                if self.config.hash_for_correlation {
                    format!("{}[{}]", label, hash_value(caps.get(0).map_or("", |m| m.as_str())))
                } else {
                    mask.to_string()
                }
            })
            .into_owned()
    }
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let prefix: Vec<u8> = digest.iter().take(6).copied().collect();
    general_purpose::STANDARD_NO_PAD.encode(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_reason_redaction() {
        let redactor = PiiRedactor::default();

        let redacted = redactor.redact("Chest pain, DOB 1961-04-12, MRN 0042317");
        assert_eq!(redacted, "Chest pain, DOB [DATE], MRN[REDACTED]");
    }

    #[test]
    fn test_contact_details_redaction() {
        let redactor = PiiRedactor::default();

        let redacted = redactor.redact("Next of kin 555-123-4567 / kin@example.com");
        assert_eq!(redacted, "Next of kin ***-***-**** / ***@***");
    }

    #[test]
    fn test_hashed_redaction_is_stable() {
        let redactor = PiiRedactor::new(RedactionConfig {
            hash_for_correlation: true,
            ..Default::default()
        });

        let first = redactor.redact("SSN 123-45-6789");
        let second = redactor.redact("SSN 123-45-6789");
        assert_eq!(first, second);
        assert!(first.starts_with("SSN SSN["));
        assert!(!first.contains("6789"));
    }

    #[test]
    fn test_disabled_redaction_passes_through() {
        let config = crate::LoggerConfig {
            redaction_enabled: false,
            ..Default::default()
        };
        let redactor = PiiRedactor::from_logger_config(&config);

        assert_eq!(redactor.redact("DOB 01/02/1990"), "DOB 01/02/1990");
    }
}
