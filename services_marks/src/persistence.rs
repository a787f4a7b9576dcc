//! Persisted form of the global mark mapping
//!
//! Stored by the host's storage collaborator as versioned JSON, keyed by the
//! mark letter.

use crate::{GlobalMark, MarkError, MarkKey, MarkScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMarksData {
    pub version: u32,
    pub marks: BTreeMap<char, GlobalMark>,
}

impl GlobalMarksData {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            marks: BTreeMap::new(),
        }
    }

    pub fn from_marks(marks: &BTreeMap<MarkKey, GlobalMark>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            marks: marks
                .iter()
                .map(|(key, mark)| (key.as_char(), mark.clone()))
                .collect(),
        }
    }

    /// Registry form; entries whose key is not an uppercase letter are dropped
    pub fn into_marks(self) -> BTreeMap<MarkKey, GlobalMark> {
        self.marks
            .into_iter()
            .filter_map(|(c, mark)| {
                MarkKey::new(c)
                    .filter(|key| key.scope() == MarkScope::Global)
                    .map(|key| (key, mark))
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, MarkError> {
        serde_json::to_string(self).map_err(|e| MarkError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, MarkError> {
        let data: GlobalMarksData =
            serde_json::from_str(text).map_err(|e| MarkError::Corrupt(e.to_string()))?;
        if data.version != Self::CURRENT_VERSION {
            return Err(MarkError::UnsupportedVersion(data.version));
        }
        Ok(data)
    }
}

impl Default for GlobalMarksData {
    fn default() -> Self {
        Self::new()
    }
}
