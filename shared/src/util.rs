//! Serde helpers

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Deserialize `null` as `T::default()`.
///
/// The record API stores optional text columns and sub-collections as
/// nullable, so `"address": null` reads as an empty string.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A stored number as it may come back from the record API
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LooseNumber::Int(i) => Some(*i as f64),
            LooseNumber::Float(f) => Some(*f),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok(),
            LooseNumber::Other(_) => None,
        };
        value.filter(|f| f.is_finite())
    }
}

/// Deserialize a number that may have been stored as a numeric string.
///
/// `null` and values that are not a number read as `0.0`; the form
/// validates them again before anything is written back.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).unwrap_or_default())
}

/// Whole-number variant of [`lenient_f64`] (`"2023"`, `2023`, `2023.0`)
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    let int = match value {
        Some(LooseNumber::Int(i)) => i32::try_from(i).ok(),
        Some(other) => other.as_f64().and_then(|f| {
            (f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64)
                .then_some(f as i32)
        }),
        None => None,
    };
    Ok(int.unwrap_or_default())
}
