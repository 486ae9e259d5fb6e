use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User preferences that the web client used to keep in browser storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub favorite_plants: BTreeSet<String>,
    pub read_notifications: BTreeSet<String>,
}
