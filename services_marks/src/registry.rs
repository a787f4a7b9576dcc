//! Local and global mark storage

use core_types::{ContextId, ScrollPosition, UrlMatchPolicy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Which tier a mark key addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkScope {
    Local,
    Global,
}

/// A mark letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarkKey(char);

impl MarkKey {
    /// Accepts ASCII letters only
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_alphabetic().then_some(Self(c))
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    pub fn scope(&self) -> MarkScope {
        if self.0.is_ascii_uppercase() {
            MarkScope::Global
        } else {
            MarkScope::Local
        }
    }
}

impl fmt::Display for MarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-only mark
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMark {
    pub url: String,
    pub position: ScrollPosition,
}

/// Persisted mark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMark {
    pub url: String,
    pub position: ScrollPosition,
    /// Context the mark was set from, if known
    #[serde(default)]
    pub owner: Option<ContextId>,
    /// `owner` was destroyed; set once, cleared only by overwriting the mark
    #[serde(default)]
    pub stale: bool,
    /// Host milliseconds when set
    pub timestamp: u64,
}

impl GlobalMark {
    /// The owner, unless it has gone stale
    pub fn live_owner(&self) -> Option<ContextId> {
        if self.stale {
            None
        } else {
            self.owner
        }
    }
}

/// Mark lookup and persistence errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarkError {
    #[error("Mark '{0}' not set")]
    NotSet(MarkKey),

    #[error("Mark '{key}' belongs to {recorded}")]
    UrlMismatch { key: MarkKey, recorded: String },

    #[error("Corrupt global marks: {0}")]
    Corrupt(String),

    #[error("Unsupported global marks version: {0}")]
    UnsupportedVersion(u32),

    #[error("Failed to serialize global marks: {0}")]
    SerializationFailed(String),
}

/// Both mark tiers
#[derive(Debug, Clone, Default)]
pub struct MarkRegistry {
    local: BTreeMap<MarkKey, LocalMark>,
    global: BTreeMap<MarkKey, GlobalMark>,
    /// Global keys written since start; a late persisted load must not
    /// overwrite them
    written: BTreeSet<MarkKey>,
    policy: UrlMatchPolicy,
}

impl MarkRegistry {
    pub fn new(policy: UrlMatchPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> UrlMatchPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: UrlMatchPolicy) {
        self.policy = policy;
    }

    /// Records a local mark, overwriting unconditionally
    pub fn set_local(&mut self, key: MarkKey, url: impl Into<String>, position: ScrollPosition) {
        self.local.insert(
            key,
            LocalMark {
                url: url.into(),
                position,
            },
        );
    }

    /// Records (upserts) a global mark, clearing any stale flag
    pub fn set_global(
        &mut self,
        key: MarkKey,
        url: impl Into<String>,
        position: ScrollPosition,
        owner: Option<ContextId>,
        timestamp: u64,
    ) -> &GlobalMark {
        self.written.insert(key);
        self.global.insert(
            key,
            GlobalMark {
                url: url.into(),
                position,
                owner,
                stale: false,
                timestamp,
            },
        );
        &self.global[&key]
    }

    /// Position to restore for a local mark
    ///
    /// Only succeeds while the current location still matches the recorded
    /// one under the registry's policy.
    pub fn goto_local(&self, key: MarkKey, current_url: &str) -> Result<ScrollPosition, MarkError> {
        let mark = self.local.get(&key).ok_or(MarkError::NotSet(key))?;
        if self.policy.matches(&mark.url, current_url) {
            Ok(mark.position)
        } else {
            Err(MarkError::UrlMismatch {
                key,
                recorded: mark.url.clone(),
            })
        }
    }

    pub fn local(&self, key: MarkKey) -> Option<&LocalMark> {
        self.local.get(&key)
    }

    pub fn global(&self, key: MarkKey) -> Result<&GlobalMark, MarkError> {
        self.global.get(&key).ok_or(MarkError::NotSet(key))
    }

    pub fn global_marks(&self) -> &BTreeMap<MarkKey, GlobalMark> {
        &self.global
    }

    /// Flags every global mark owned by `context` as stale
    ///
    /// Returns the number of marks newly flagged.
    pub fn context_destroyed(&mut self, context: ContextId) -> usize {
        let mut flagged = 0;
        for mark in self.global.values_mut() {
            if mark.owner == Some(context) && !mark.stale {
                mark.stale = true;
                flagged += 1;
            }
        }
        flagged
    }

    /// Merges persisted global marks; marks written this session win
    pub fn load_global(&mut self, marks: BTreeMap<MarkKey, GlobalMark>) {
        for (key, mark) in marks {
            if key.scope() == MarkScope::Global && !self.written.contains(&key) {
                self.global.insert(key, mark);
            }
        }
    }

    /// Forgets local marks
    pub fn clear_local(&mut self) {
        self.local.clear();
    }
}
