//! Continuations for in-flight host requests
//!
//! Every queued request is registered here with what to do when its reply
//! arrives. Mode-sensitive continuations also carry the mode epoch they were
//! issued under; a reply that arrives after the epoch moved on is stale.

use core_types::{ContextId, RequestId};
use services_marks::MarkKey;
use services_notification::NotificationId;
use std::collections::HashMap;

/// What to do with a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Startup load of the enabled flag
    LoadEnabled,
    /// Startup load of the persisted global marks
    LoadGlobalMarks,
    /// Startup load of the persisted settings overrides
    LoadSettings,
    /// Startup query for the context hosting the engine
    Identify,
    /// Nothing to resume; failures are logged under `request`
    FireAndForget { request: &'static str },
    /// `<C-6>`; forgets `context` if activation fails
    ActivatePrevious { context: ContextId },
    /// `g0` / `g$` listing
    SwitchToEdge { last: bool },
    /// `p` / `P` clipboard read
    ClipboardOpen { new_context: bool },
    /// Global mark goto: context listing
    GlobalMarkList { key: MarkKey },
    /// Global mark goto: activation of an existing context
    GlobalMarkActivate { key: MarkKey, context: ContextId },
    /// Global mark goto: a new context was opened for the mark
    GlobalMarkOpened { key: MarkKey },
    /// Load fallback timer of a deferred mark scroll
    MarkScrollTimeout { token: u64 },
    /// `:buffer` listing
    CommandLineContexts,
    /// `:buffer` activation of `context`
    CommandLineSwitch { context: ContextId },
    /// Delayed close after a direct switch
    CommandLineClose,
    /// Expiry of a command-line message
    CommandLineMessage(NotificationId),
    /// Expiry of a status message
    StatusExpiry(NotificationId),
}

/// How a reply resumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resumed {
    Run(Continuation),
    /// Issued under an earlier mode epoch
    Stale(Continuation),
    /// Never registered, or already answered
    Unknown,
}

#[derive(Debug, Default)]
pub struct PendingRequests {
    entries: HashMap<RequestId, (Continuation, Option<u64>)>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a continuation, optionally bound to a mode epoch
    pub fn register(&mut self, id: RequestId, continuation: Continuation, epoch: Option<u64>) {
        self.entries.insert(id, (continuation, epoch));
    }

    /// Removes the continuation for `id` and checks it against `epoch`
    pub fn take(&mut self, id: RequestId, epoch: u64) -> Resumed {
        match self.entries.remove(&id) {
            None => Resumed::Unknown,
            Some((continuation, Some(issued))) if issued != epoch => Resumed::Stale(continuation),
            Some((continuation, _)) => Resumed::Run(continuation),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
