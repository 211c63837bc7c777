// Path: crates/types/src/serde_helpers.rs

//! Serde adapters used on the JSON wire.
//!
//! Amounts travel as decimal strings (the same shape the counterparty services
//! produce for arbitrary-precision integers). Raw byte strings travel either as
//! hex or as standard base64, depending on the document.

/// Serializes a `u128` amount as a decimal string and accepts either a string or
/// a JSON number on input.
pub mod amount_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes the amount as a decimal string.
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    /// Deserializes a decimal string (or a small JSON number) into a `u128`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s
                .trim()
                .parse::<u128>()
                .map_err(|e| de::Error::custom(format!("invalid amount '{}': {}", s, e))),
            Repr::Number(n) => Ok(u128::from(n)),
        }
    }
}

/// Serializes a byte vector as a lowercase hex string.
pub mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes the bytes as lowercase hex.
    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(value))
    }

    /// Deserializes a hex string, with or without a `0x` prefix.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let trimmed = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(trimmed).map_err(de::Error::custom)
    }
}

/// Serializes a byte vector as standard, padded base64.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serializes the bytes as base64.
    pub fn serialize<S: Serializer>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    /// Deserializes a base64 string; `null` is accepted as empty bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            None => Ok(Vec::new()),
            Some(s) => STANDARD.decode(s.as_bytes()).map_err(de::Error::custom),
        }
    }
}

/// Serializes a string-keyed map of byte vectors with standard base64 values.
pub mod base64_map {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::ser::SerializeMap;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    /// Serializes each value as base64, in key order.
    pub fn serialize<S: Serializer>(
        value: &BTreeMap<String, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for (key, bytes) in value {
            map.serialize_entry(key, &STANDARD.encode(bytes))?;
        }
        map.end()
    }

    /// Deserializes a map of base64 strings; `null` is accepted as an empty map.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Vec<u8>>, D::Error> {
        let raw: Option<BTreeMap<String, String>> = Option::deserialize(deserializer)?;
        raw.unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                STANDARD
                    .decode(value.as_bytes())
                    .map(|bytes| (key, bytes))
                    .map_err(de::Error::custom)
            })
            .collect()
    }
}
