//! Typed address records
//!
//! The field set is fixed and known ahead of time, so records cross the core
//! boundary as plain structs with explicitly optional fields rather than
//! dynamic maps.

use serde::{Deserialize, Deserializer, Serialize};

/// Tri-state residential indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResidentialIndicator {
    /// Residential status unknown
    #[default]
    Unknown,
    /// Residential address
    Yes,
    /// Commercial address
    No,
}

impl ResidentialIndicator {
    /// Coerce arbitrary text to a valid indicator; anything unrecognized
    /// becomes `Unknown`.
    pub fn coerce(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "yes" => ResidentialIndicator::Yes,
            "no" => ResidentialIndicator::No,
            _ => ResidentialIndicator::Unknown,
        }
    }

    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidentialIndicator::Unknown => "unknown",
            ResidentialIndicator::Yes => "yes",
            ResidentialIndicator::No => "no",
        }
    }
}

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    /// Informational
    #[default]
    Info,
    /// Non-fatal advisory
    Warning,
    /// Record-level failure
    Error,
}

/// Diagnostic message attached to a transformed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Machine-readable code, e.g. `missing_postal_code`
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Severity
    #[serde(default)]
    pub level: MessageLevel,
}

impl Diagnostic {
    /// Create a warning-level diagnostic
    pub fn warning(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            level: MessageLevel::Warning,
        }
    }

    /// Create an error-level diagnostic
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            level: MessageLevel::Error,
        }
    }
}

/// One address record, every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub address_line3: Option<String>,
    #[serde(default)]
    pub city_locality: Option<String>,
    #[serde(default)]
    pub state_province: Option<String>,
    /// Accepts a JSON string or integer
    #[serde(default, deserialize_with = "deserialize_postal_code")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    /// Absent, null, or unrecognized input parses to `unknown`
    #[serde(default, deserialize_with = "deserialize_residential_indicator")]
    pub address_residential_indicator: ResidentialIndicator,
}

/// One recognition request: free text plus any already-known address fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionRecord {
    /// Text to recognize an address from
    #[serde(default)]
    pub text: String,
    /// Known address values, if any
    #[serde(default)]
    pub address: Option<AddressRecord>,
}

fn deserialize_residential_indicator<'de, D>(
    deserializer: D,
) -> Result<ResidentialIndicator, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => ResidentialIndicator::coerce(&s),
        _ => ResidentialIndicator::Unknown,
    })
}

fn deserialize_postal_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "invalid postal_code value: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residential_indicator_coercion() {
        assert_eq!(
            ResidentialIndicator::coerce(" Yes "),
            ResidentialIndicator::Yes
        );
        assert_eq!(ResidentialIndicator::coerce("NO"), ResidentialIndicator::No);
        assert_eq!(
            ResidentialIndicator::coerce("maybe"),
            ResidentialIndicator::Unknown
        );
        assert_eq!(
            ResidentialIndicator::coerce(""),
            ResidentialIndicator::Unknown
        );
    }

    #[test]
    fn test_record_parses_null_indicator_to_unknown() {
        let record: AddressRecord = serde_json::from_str(
            r#"{"address_line1": "1 main st", "address_residential_indicator": null}"#,
        )
        .unwrap();
        assert_eq!(
            record.address_residential_indicator,
            ResidentialIndicator::Unknown
        );
    }

    #[test]
    fn test_record_parses_absent_indicator_to_unknown() {
        let record: AddressRecord = serde_json::from_str(r#"{"city_locality": "Austin"}"#).unwrap();
        assert_eq!(
            record.address_residential_indicator,
            ResidentialIndicator::Unknown
        );
    }

    #[test]
    fn test_record_parses_junk_indicator_to_unknown() {
        let record: AddressRecord =
            serde_json::from_str(r#"{"address_residential_indicator": "EXTREMELY"}"#).unwrap();
        assert_eq!(
            record.address_residential_indicator,
            ResidentialIndicator::Unknown
        );
    }

    #[test]
    fn test_postal_code_accepts_integer() {
        let record: AddressRecord = serde_json::from_str(r#"{"postal_code": 78701}"#).unwrap();
        assert_eq!(record.postal_code.as_deref(), Some("78701"));
    }

    #[test]
    fn test_postal_code_accepts_string_and_null() {
        let record: AddressRecord =
            serde_json::from_str(r#"{"postal_code": "78701-1234"}"#).unwrap();
        assert_eq!(record.postal_code.as_deref(), Some("78701-1234"));

        let record: AddressRecord = serde_json::from_str(r#"{"postal_code": null}"#).unwrap();
        assert_eq!(record.postal_code, None);
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = AddressRecord {
            address_line1: Some("1 Main St".to_string()),
            country_code: Some("US".to_string()),
            address_residential_indicator: ResidentialIndicator::Yes,
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["address_residential_indicator"], "yes");
        let back: AddressRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_recognition_record_defaults() {
        let record: RecognitionRecord =
            serde_json::from_str(r#"{"text": "ship to 1 main st austin tx"}"#).unwrap();
        assert!(record.address.is_none());
    }
}
