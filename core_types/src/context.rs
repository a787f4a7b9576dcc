//! Context listings returned by the tab service

use crate::ContextId;
use serde::{Deserialize, Serialize};

/// One open context as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextInfo {
    pub id: ContextId,
    pub title: String,
    pub url: String,
    /// Position within its window's strip
    pub index: usize,
    pub active: bool,
    pub pinned: bool,
}

impl ContextInfo {
    pub fn new(id: ContextId, title: impl Into<String>, url: impl Into<String>, index: usize) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            index,
            active: false,
            pinned: false,
        }
    }

    pub fn activated(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}

/// Which contexts a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextScope {
    #[default]
    CurrentWindow,
    AllWindows,
}

impl ContextScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextScope::CurrentWindow => "current_window",
            ContextScope::AllWindows => "all_windows",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "current_window" => Some(ContextScope::CurrentWindow),
            "all_windows" => Some(ContextScope::AllWindows),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_info_builders() {
        let info = ContextInfo::new(ContextId::new(1), "Alpha", "https://alpha.test/", 0)
            .activated()
            .pinned();
        assert!(info.active);
        assert!(info.pinned);
        assert_eq!(info.index, 0);
    }

    #[test]
    fn test_scope_roundtrip() {
        for scope in [ContextScope::CurrentWindow, ContextScope::AllWindows] {
            assert_eq!(ContextScope::parse(scope.as_str()), Some(scope));
        }
        assert_eq!(ContextScope::parse("everywhere"), None);
    }
}
