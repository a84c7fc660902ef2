//! Lenient decoding for platform counters.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(i64),
    Text(String),
}

/// Decodes a counter given as a JSON number, a decimal string, or `null`.
///
/// `null` decodes to 0. Pair with `#[serde(default)]` so an absent field is 0
/// as well.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawCount>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawCount::Number(n)) => Ok(n),
        Some(RawCount::Text(s)) => s.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}
