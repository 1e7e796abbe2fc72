//! Decode options.
//!
//! Options deserialize from JSON with every field optional:
//!
//! ```json
//! {"enum_decoding": "lenient", "fallback_to_v1": false}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};

/// How out-of-range status/content codes are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumDecoding {
    /// Unknown codes fail the batch with a decode error.
    #[default]
    Strict,
    /// Unknown codes become the enum's default variant and are logged.
    Lenient,
}

/// Options shared by all decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Handling of unknown status/content codes
    pub enum_decoding: EnumDecoding,
    /// Retry with the V1 layout when a batch does not verify as V2
    pub fallback_to_v1: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            enum_decoding: EnumDecoding::Strict,
            fallback_to_v1: true,
        }
    }
}

impl DecodeOptions {
    /// Parse options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ManifestError::config(format!("Failed to parse decode options: {}", e)))
    }

    /// Set the enum decoding mode.
    pub fn with_enum_decoding(mut self, mode: EnumDecoding) -> Self {
        self.enum_decoding = mode;
        self
    }

    /// Enable or disable the V2 -> V1 fallback.
    pub fn with_fallback_to_v1(mut self, enabled: bool) -> Self {
        self.fallback_to_v1 = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.enum_decoding, EnumDecoding::Strict);
        assert!(options.fallback_to_v1);
    }

    #[test]
    fn test_from_json_partial() {
        let options = DecodeOptions::from_json_str(r#"{"enum_decoding": "lenient"}"#).unwrap();
        assert_eq!(options.enum_decoding, EnumDecoding::Lenient);
        assert!(options.fallback_to_v1);

        let options = DecodeOptions::from_json_str("{}").unwrap();
        assert_eq!(options, DecodeOptions::default());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = DecodeOptions::from_json_str(r#"{"enum_decoding": "loose"}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Config(_)));
    }

    #[test]
    fn test_builders_roundtrip_json() {
        let options = DecodeOptions::default()
            .with_enum_decoding(EnumDecoding::Lenient)
            .with_fallback_to_v1(false);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"enum_decoding":"lenient","fallback_to_v1":false}"#);
        assert_eq!(DecodeOptions::from_json_str(&json).unwrap(), options);
    }
}
