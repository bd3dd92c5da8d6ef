//! JSON decoding of response bodies
//!
//! Unknown fields are ignored and missing ones fall back to their defaults;
//! the response types carry the matching `serde` attributes.

use crate::error::TransportResult;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

/// Decode a raw response body
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> TransportResult<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Accept a count sent either as a JSON number or a numeric string
pub(crate) fn count_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
        Null,
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) if s.trim().is_empty() => Ok(0),
        Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
        Raw::Null => Ok(0),
    }
}

/// Accept a status sent either as a JSON number or a numeric string
pub(crate) fn status_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Null,
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
        Raw::Null => Ok(0),
    }
}
