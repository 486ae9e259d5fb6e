//! Field decoders for payloads whose fields are not always the type they
//! should be.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Decodes a field as `T`, falling back to `T::default()` when the value is
/// null or has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}
