//! Record transforms
//!
//! A transform is a total, deterministic, side-effect-free mapping from one
//! submitted record to a normalized record plus diagnostics. Determinism is
//! what makes queued batches safe to reprocess.

use serde::{de::DeserializeOwned, Serialize};

use crate::core::address::types::{AddressRecord, Diagnostic, RecognitionRecord};
use crate::core::batch::ItemStatus;
use crate::utils::error::Result;

/// Output of a transform applied to a single record
#[derive(Debug, Clone)]
pub struct Transformed<T> {
    /// Per-record outcome status
    pub status: ItemStatus,
    /// The normalized / recognized record
    pub output: T,
    /// Diagnostics, ordered
    pub messages: Vec<Diagnostic>,
}

/// Deterministic per-record transform consumed by the batch lifecycle engine.
///
/// Implementations may be fallible; the engine never aborts a batch on a
/// record-level failure, it records an `error` item instead.
pub trait Transform: Send + Sync {
    /// Raw record type, stored verbatim as the item's `original`
    type Input: Serialize + DeserializeOwned + Send + Sync;
    /// Normalized record type, stored as the item's `result`
    type Output: Serialize + Send;

    /// Transform one record
    fn apply(&self, input: &Self::Input) -> Result<Transformed<Self::Output>>;
}

/// Normalize one address record.
///
/// Every string field is trimmed; free-text fields are uppercased, `email`
/// is lowercased, `country_code` is uppercased. The residential indicator is
/// already coerced at parse time and passes through.
pub fn normalize_address(record: &AddressRecord) -> AddressRecord {
    AddressRecord {
        name: upper(&record.name),
        phone: upper(&record.phone),
        email: lower(&record.email),
        company_name: upper(&record.company_name),
        address_line1: upper(&record.address_line1),
        address_line2: upper(&record.address_line2),
        address_line3: upper(&record.address_line3),
        city_locality: upper(&record.city_locality),
        state_province: upper(&record.state_province),
        postal_code: upper(&record.postal_code),
        country_code: upper(&record.country_code),
        address_residential_indicator: record.address_residential_indicator,
    }
}

fn upper(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|s| s.trim().to_uppercase())
}

fn lower(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|s| s.trim().to_lowercase())
}

/// Validation transform: normalization plus the domestic postal-code rule.
///
/// The per-record status is always `verified` in the base policy; the status
/// hook exists so stricter policies can downgrade records without changing
/// the contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationTransform;

impl Transform for ValidationTransform {
    type Input = AddressRecord;
    type Output = AddressRecord;

    fn apply(&self, input: &AddressRecord) -> Result<Transformed<AddressRecord>> {
        let normalized = normalize_address(input);
        let mut messages = Vec::new();

        let domestic = input
            .country_code
            .as_deref()
            .map(|code| code.trim().eq_ignore_ascii_case("US"))
            .unwrap_or(false);
        let postal_missing = input
            .postal_code
            .as_deref()
            .map(|postal| postal.trim().is_empty())
            .unwrap_or(true);

        // Postal code is recommended, not mandatory, for the domestic market.
        if domestic && postal_missing {
            messages.push(Diagnostic::warning(
                "missing_postal_code",
                "postal_code is recommended for US",
            ));
        }

        Ok(Transformed {
            status: ItemStatus::Verified,
            output: normalized,
            messages,
        })
    }
}

/// Recognition transform: normalizes whatever address fields were supplied
/// alongside the text. A request without address fields recognizes to an
/// empty record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecognitionTransform;

impl Transform for RecognitionTransform {
    type Input = RecognitionRecord;
    type Output = AddressRecord;

    fn apply(&self, input: &RecognitionRecord) -> Result<Transformed<AddressRecord>> {
        let address = input.address.clone().unwrap_or_default();
        let recognized = normalize_address(&address);

        Ok(Transformed {
            status: ItemStatus::Completed,
            output: recognized,
            messages: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::types::{MessageLevel, ResidentialIndicator};

    #[test]
    fn test_validation_normalizes_example_record() {
        let input: AddressRecord = serde_json::from_str(
            r#"{"address_line1": "1 main st", "country_code": "us", "address_residential_indicator": null}"#,
        )
        .unwrap();

        let transformed = ValidationTransform.apply(&input).unwrap();

        assert_eq!(transformed.status, ItemStatus::Verified);
        assert_eq!(
            transformed.output.address_line1.as_deref(),
            Some("1 MAIN ST")
        );
        assert_eq!(transformed.output.country_code.as_deref(), Some("US"));
        assert_eq!(
            transformed.output.address_residential_indicator,
            ResidentialIndicator::Unknown
        );
        assert_eq!(transformed.messages.len(), 1);
        assert_eq!(transformed.messages[0].code, "missing_postal_code");
        assert_eq!(transformed.messages[0].level, MessageLevel::Warning);
    }

    #[test]
    fn test_validation_lowercases_email_and_trims() {
        let input = AddressRecord {
            email: Some("  John.Doe@Example.COM ".to_string()),
            name: Some(" john doe ".to_string()),
            ..Default::default()
        };

        let transformed = ValidationTransform.apply(&input).unwrap();

        assert_eq!(
            transformed.output.email.as_deref(),
            Some("john.doe@example.com")
        );
        assert_eq!(transformed.output.name.as_deref(), Some("JOHN DOE"));
    }

    #[test]
    fn test_no_warning_when_postal_code_present() {
        let input = AddressRecord {
            country_code: Some("US".to_string()),
            postal_code: Some("78701".to_string()),
            ..Default::default()
        };

        let transformed = ValidationTransform.apply(&input).unwrap();
        assert!(transformed.messages.is_empty());
    }

    #[test]
    fn test_no_warning_for_foreign_address_without_postal_code() {
        let input = AddressRecord {
            country_code: Some("DE".to_string()),
            ..Default::default()
        };

        let transformed = ValidationTransform.apply(&input).unwrap();
        assert!(transformed.messages.is_empty());
        assert_eq!(transformed.status, ItemStatus::Verified);
    }

    #[test]
    fn test_blank_postal_code_counts_as_missing() {
        let input = AddressRecord {
            country_code: Some("us".to_string()),
            postal_code: Some("   ".to_string()),
            ..Default::default()
        };

        let transformed = ValidationTransform.apply(&input).unwrap();
        assert_eq!(transformed.messages.len(), 1);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let input = AddressRecord {
            address_line1: Some("742 evergreen terrace".to_string()),
            country_code: Some("us".to_string()),
            ..Default::default()
        };

        let first = ValidationTransform.apply(&input).unwrap();
        let second = ValidationTransform.apply(&input).unwrap();
        assert_eq!(first.output, second.output);
        assert_eq!(first.messages, second.messages);
    }

    #[test]
    fn test_recognition_normalizes_embedded_address() {
        let input = RecognitionRecord {
            text: "ship to 1 main st".to_string(),
            address: Some(AddressRecord {
                address_line1: Some("1 main st".to_string()),
                country_code: Some("us".to_string()),
                email: Some("A@B.COM".to_string()),
                ..Default::default()
            }),
        };

        let transformed = RecognitionTransform.apply(&input).unwrap();

        assert_eq!(transformed.status, ItemStatus::Completed);
        assert_eq!(
            transformed.output.address_line1.as_deref(),
            Some("1 MAIN ST")
        );
        assert_eq!(transformed.output.country_code.as_deref(), Some("US"));
        assert_eq!(transformed.output.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_recognition_without_address_yields_empty_record() {
        let input = RecognitionRecord {
            text: "no structure at all".to_string(),
            address: None,
        };

        let transformed = RecognitionTransform.apply(&input).unwrap();
        assert_eq!(transformed.output.address_line1, None);
        assert_eq!(
            transformed.output.address_residential_indicator,
            ResidentialIndicator::Unknown
        );
    }
}
