//! Context filtering for `:buffer`

use core_types::{ContextId, ContextInfo};
use serde::{Deserialize, Serialize};

/// Title shown for contexts without one
pub const UNTITLED: &str = "Untitled Tab";

const TITLE_MAX: usize = 80;
const URL_MAX: usize = 70;

/// One numbered entry of a `:buffer` result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferEntry {
    pub id: ContextId,
    pub title: String,
    pub url: String,
    /// 1-based number the user types to pick this entry
    pub display_index: usize,
}

/// Contexts whose title or location contains `query`, case-insensitively
///
/// Listing order is preserved; an empty query matches everything.
pub fn filter_contexts(contexts: &[ContextInfo], query: &str) -> Vec<BufferEntry> {
    let needle = query.trim().to_lowercase();
    contexts
        .iter()
        .filter(|c| {
            c.title.to_lowercase().contains(&needle) || c.url.to_lowercase().contains(&needle)
        })
        .enumerate()
        .map(|(i, c)| BufferEntry {
            id: c.id,
            title: if c.title.is_empty() {
                UNTITLED.to_string()
            } else {
                c.title.clone()
            },
            url: c.url.clone(),
            display_index: i + 1,
        })
        .collect()
}

/// First 80 characters of a title
pub fn truncate_title(title: &str) -> String {
    title.chars().take(TITLE_MAX).collect()
}

/// Locations longer than 70 characters keep 67 and gain `...`
pub fn truncate_url(url: &str) -> String {
    if url.chars().count() > URL_MAX {
        let mut short: String = url.chars().take(URL_MAX - 3).collect();
        short.push_str("...");
        short
    } else {
        url.to_string()
    }
}
