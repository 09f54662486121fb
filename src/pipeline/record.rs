use crate::parser::fold_case;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key of the synthetic field holding every non-field line of a record
pub const BODY_FIELD: &str = "data";

/// One archival record: reserved fields plus the accumulated body text.
///
/// Serializes as a flat JSON object in insertion order, with `"data"` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl Record {
    pub fn new() -> Self {
        let mut fields = IndexMap::new();
        fields.insert(BODY_FIELD.to_string(), String::new());
        Record { fields }
    }

    /// Store a field under its original key casing, replacing any earlier value
    pub fn set_field(&mut self, key: &str, value: &str) {
        match self.fields.get_mut(key) {
            Some(existing) => {
                existing.clear();
                existing.push_str(value);
            }
            None => {
                self.fields.insert(key.to_string(), value.to_string());
            }
        }
    }

    pub fn append_body(&mut self, line: &str) {
        self.fields
            .entry(BODY_FIELD.to_string())
            .or_default()
            .push_str(line);
    }

    pub fn body(&self) -> &str {
        self.fields.get(BODY_FIELD).map(String::as_str).unwrap_or("")
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Case-insensitive lookup; the first matching key wins
    pub fn field_ci(&self, key: &str) -> Option<&str> {
        self.field(key).or_else(|| {
            let wanted = fold_case(key);
            self.fields
                .iter()
                .find(|(k, _)| fold_case(k) == wanted)
                .map(|(_, v)| v.as_str())
        })
    }

    /// Number of stored reserved fields, not counting the body
    pub fn field_count(&self) -> usize {
        self.fields.keys().filter(|k| *k != BODY_FIELD).count()
    }

    /// True when nothing but an empty body was accumulated
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0 && self.body().is_empty()
    }
}
