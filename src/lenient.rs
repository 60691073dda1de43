//! Forgiving field readers for payloads produced by other services.
//!
//! Used through `#[serde(deserialize_with = "...")]`. Every reader first
//! takes the raw JSON value, so a field of the wrong type falls back to its
//! default instead of failing the enclosing document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::{IndividualSignal, RangeSignal};
use crate::spc::SignalType;

/// A number, or a string holding one. Non-finite values are rejected.
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// A non-negative integer. Integral floats such as `2.0` are accepted.
pub(crate) fn as_count(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    as_f64(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= usize::MAX as f64)
        .map(|v| v as usize)
}

pub(crate) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(as_f64(&Value::deserialize(deserializer)?).unwrap_or(0.0))
}

pub(crate) fn opt_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(as_f64(&Value::deserialize(deserializer)?))
}

pub(crate) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    Ok(as_count(&Value::deserialize(deserializer)?).unwrap_or(0))
}

pub(crate) fn counts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<usize>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| items.iter().filter_map(as_count).collect())
        .unwrap_or_default())
}

pub(crate) fn opt_bool<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// Any `T`, or `None` when the value does not fit.
pub(crate) fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(error) => {
            tracing::warn!(error = %error, "ignoring unreadable field");
            Ok(None)
        }
    }
}

/// Signal entries without a readable index or direction are skipped.
pub(crate) fn individual_signals<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<IndividualSignal>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(entries(&value)
        .filter_map(|entry| {
            let signal_type = match entry.get("type")?.as_str()? {
                "high" => SignalType::High,
                "low" => SignalType::Low,
                _ => return None,
            };
            Some(IndividualSignal {
                index: as_count(entry.get("index")?)?,
                value: entry.get("value").and_then(as_f64).unwrap_or(0.0),
                signal_type,
            })
        })
        .collect())
}

pub(crate) fn range_signals<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<RangeSignal>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(entries(&value)
        .filter_map(|entry| {
            Some(RangeSignal {
                index: as_count(entry.get("index")?)?,
                value: entry.get("value").and_then(as_f64).unwrap_or(0.0),
            })
        })
        .collect())
}

fn entries(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_count() {
        assert_eq!(as_count(&json!(3)), Some(3));
        assert_eq!(as_count(&json!(3.0)), Some(3));
        assert_eq!(as_count(&json!("4")), Some(4));
        assert_eq!(as_count(&json!(2.5)), None);
        assert_eq!(as_count(&json!(-1)), None);
        assert_eq!(as_count(&json!(null)), None);
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(as_f64(&json!(1.5)), Some(1.5));
        assert_eq!(as_f64(&json!(" 2 ")), Some(2.0));
        assert_eq!(as_f64(&json!("inf")), None);
        assert_eq!(as_f64(&json!(true)), None);
    }
}
