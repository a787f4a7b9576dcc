//! Asynchronous collaborator messages
//!
//! Each request carries a [`RequestId`]; the host answers exactly once with
//! a [`HostResult`] for that id.

use crate::{Duration, HostError};
use core_types::{ContextId, ContextInfo, ContextScope, RequestId, ScrollPosition};
use serde::{Deserialize, Serialize};

/// A queued request for a host collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRequest {
    pub id: RequestId,
    pub kind: RequestKind,
}

impl HostRequest {
    /// Creates a request with a fresh id
    pub fn new(kind: RequestKind) -> Self {
        Self {
            id: RequestId::new(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestKind {
    Tabs(TabRequest),
    Storage(StorageRequest),
    Clipboard(ClipboardRequest),
    /// Reply with `TimerFired` after `delay`
    Timer { delay: Duration },
    /// Scroll another context's document
    ScrollContext {
        context: ContextId,
        position: ScrollPosition,
    },
}

impl RequestKind {
    /// Short name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Tabs(tab) => tab.name(),
            RequestKind::Storage(StorageRequest::Get { .. }) => "storage.get",
            RequestKind::Storage(StorageRequest::Set { .. }) => "storage.set",
            RequestKind::Clipboard(ClipboardRequest::ReadText) => "clipboard.read",
            RequestKind::Clipboard(ClipboardRequest::WriteText(_)) => "clipboard.write",
            RequestKind::Timer { .. } => "timer",
            RequestKind::ScrollContext { .. } => "tabs.scroll",
        }
    }
}

/// Which context a tab operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabTarget {
    /// The context hosting this engine
    Current,
    Id(ContextId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativeDirection {
    Previous,
    Next,
}

impl RelativeDirection {
    pub fn offset(&self) -> isize {
        match self {
            RelativeDirection::Previous => -1,
            RelativeDirection::Next => 1,
        }
    }
}

/// Tab orchestration operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabRequest {
    /// Reply: `Hosted` with the context hosting this engine
    Identify,
    /// Reply: `Contexts`
    List { scope: ContextScope },
    Activate(ContextId),
    Close(TabTarget),
    Duplicate(TabTarget),
    Reload { target: TabTarget, bypass_cache: bool },
    TogglePin(TabTarget),
    /// Reply: `Opened`
    OpenAndFocus { url: String },
    SwitchRelative { direction: RelativeDirection },
    RestoreMostRecentlyClosed,
}

impl TabRequest {
    pub fn name(&self) -> &'static str {
        match self {
            TabRequest::Identify => "tabs.identify",
            TabRequest::List { .. } => "tabs.list",
            TabRequest::Activate(_) => "tabs.activate",
            TabRequest::Close(_) => "tabs.close",
            TabRequest::Duplicate(_) => "tabs.duplicate",
            TabRequest::Reload { .. } => "tabs.reload",
            TabRequest::TogglePin(_) => "tabs.toggle_pin",
            TabRequest::OpenAndFocus { .. } => "tabs.open",
            TabRequest::SwitchRelative { .. } => "tabs.switch_relative",
            TabRequest::RestoreMostRecentlyClosed => "tabs.restore",
        }
    }
}

/// Persistent key-value storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageRequest {
    /// Reply: `Value`
    Get { key: String },
    Set { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardRequest {
    /// Reply: `Text`
    ReadText,
    WriteText(String),
}

/// Successful collaborator reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostReply {
    Done,
    Contexts(Vec<ContextInfo>),
    Opened(ContextId),
    Hosted(ContextId),
    Value(Option<String>),
    Text(String),
    TimerFired,
}

pub type HostResult = Result<HostReply, HostError>;

/// Context lifecycle notifications from the tab service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextEvent {
    Activated(ContextId),
    /// The context finished loading its document
    Loaded(ContextId),
    Removed(ContextId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_fresh() {
        let a = HostRequest::new(RequestKind::Clipboard(ClipboardRequest::ReadText));
        let b = HostRequest::new(RequestKind::Clipboard(ClipboardRequest::ReadText));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_request_names() {
        let kind = RequestKind::Tabs(TabRequest::Reload {
            target: TabTarget::Current,
            bypass_cache: true,
        });
        assert_eq!(kind.name(), "tabs.reload");
        assert_eq!(RequestKind::Tabs(TabRequest::Identify).name(), "tabs.identify");
        assert_eq!(
            RequestKind::Storage(StorageRequest::Get { key: "k".into() }).name(),
            "storage.get"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = HostRequest::new(RequestKind::Tabs(TabRequest::OpenAndFocus {
            url: "https://a.test/".into(),
        }));
        let json = serde_json::to_string(&request).unwrap();
        let back: HostRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(RelativeDirection::Previous.offset(), -1);
        assert_eq!(RelativeDirection::Next.offset(), 1);
    }
}
