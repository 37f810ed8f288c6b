//! Record-level tolerant deserializers for profile documents.
//!
//! Profile documents are written by several front ends and hand-edited
//! fixtures, so a single malformed field must not reject the whole document.
//! Each helper here swallows the bad value and yields "absent" instead.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(raw) => Some(raw),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(index, error = %err, "skipping malformed list entry");
                None
            }
        })
        .collect())
}

pub(crate) fn section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }

    match serde_json::from_value::<T>(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            debug!(error = %err, "ignoring malformed profile section");
            Ok(None)
        }
    }
}

pub(crate) fn map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(entries) = value else {
        return Ok(BTreeMap::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, item)| match serde_json::from_value::<T>(item) {
            Ok(parsed) => Some((key, parsed)),
            Err(err) => {
                debug!(key = %key, error = %err, "skipping malformed map entry");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "list")]
        values: Vec<u8>,
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let probe: Probe = serde_json::from_value(json!({ "amount": " 1,250.5 " })).expect("parses");
        assert_eq!(probe.amount, Some(1250.5));
    }

    #[test]
    fn malformed_values_become_absent() {
        let probe: Probe = serde_json::from_value(json!({
            "amount": { "nested": true },
            "values": [1, "two", 3, -4]
        }))
        .expect("parses");
        assert_eq!(probe.amount, None);
        assert_eq!(probe.values, vec![1, 3]);
    }

    #[test]
    fn non_array_lists_are_empty() {
        let probe: Probe = serde_json::from_value(json!({ "values": "n/a" })).expect("parses");
        assert!(probe.values.is_empty());
    }
}
