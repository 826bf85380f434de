use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Query string parameters. Lookups also match the key with its first
/// letter capitalized, so `user_id` finds `User_id`.
#[derive(Debug, Default)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val);
        }

        let mut chars = key.chars();
        let first = chars.next()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        let key2: String = first.to_ascii_uppercase().to_string() + chars.as_str();
        self.map.get(&key2).map(|x| x.as_str())
    }
}
