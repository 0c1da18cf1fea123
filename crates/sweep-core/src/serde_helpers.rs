//! Shared serde helper functions used across multiple modules.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Serde default function that returns `true`.
///
/// Used for boolean switches that should default to enabled.
pub fn default_true() -> bool {
    true
}

/// Deserialize a value, falling back to its default when it is null or has
/// an unexpected shape.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserialize a list element by element, dropping elements that do not
/// deserialize. Anything other than an array yields an empty list.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match T::deserialize(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Skipping unreadable schema entry #{}: {}", idx, e);
                None
            }
        })
        .collect())
}
