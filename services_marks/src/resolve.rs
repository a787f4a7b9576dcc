//! Global mark resolution and deferred scrolling

use crate::GlobalMark;
use core_types::{ContextId, ContextInfo, ScrollPosition};

/// Where a global mark should be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalTarget {
    /// Activate this open context, then scroll it
    Existing(ContextId),
    /// Open the mark's location, scroll once it has loaded
    OpenNew(String),
}

/// Picks the context for a global mark from a context listing
///
/// Prefers the mark's owner when it is not stale and still shows the mark's
/// location, then any other context showing the location, then a new
/// context. A stale owner is never selected.
pub fn resolve_global_target(mark: &GlobalMark, contexts: &[ContextInfo]) -> GlobalTarget {
    let stale_owner = if mark.stale { mark.owner } else { None };
    let mut matching = contexts
        .iter()
        .filter(|c| c.url == mark.url && Some(c.id) != stale_owner);

    if let Some(owner) = mark.live_owner() {
        if let Some(found) = contexts.iter().find(|c| c.id == owner && c.url == mark.url) {
            return GlobalTarget::Existing(found.id);
        }
    }

    match matching.next() {
        Some(first) => GlobalTarget::Existing(first.id),
        None => GlobalTarget::OpenNew(mark.url.clone()),
    }
}

/// A scroll to issue against another context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOrder {
    pub context: ContextId,
    pub position: ScrollPosition,
}

#[derive(Debug, Clone)]
struct PendingScroll {
    token: u64,
    order: ScrollOrder,
}

/// Scrolls waiting for a freshly opened context to load
///
/// Each entry is released by whichever comes first, the context's load
/// signal or its fallback timer. Releasing removes the entry, so the later
/// signal finds nothing.
#[derive(Debug, Clone, Default)]
pub struct PendingScrolls {
    entries: Vec<PendingScroll>,
    next_token: u64,
}

impl PendingScrolls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a deferred scroll; the token identifies its fallback timer
    pub fn add(&mut self, context: ContextId, position: ScrollPosition) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        self.entries.push(PendingScroll {
            token,
            order: ScrollOrder { context, position },
        });
        token
    }

    /// The context finished loading
    pub fn on_loaded(&mut self, context: ContextId) -> Vec<ScrollOrder> {
        let mut released = Vec::new();
        self.entries.retain(|entry| {
            if entry.order.context == context {
                released.push(entry.order);
                false
            } else {
                true
            }
        });
        released
    }

    /// The fallback timer for `token` fired
    pub fn on_timeout(&mut self, token: u64) -> Option<ScrollOrder> {
        let index = self.entries.iter().position(|e| e.token == token)?;
        Some(self.entries.remove(index).order)
    }

    /// The context went away before loading
    pub fn cancel(&mut self, context: ContextId) {
        self.entries.retain(|e| e.order.context != context);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(owner: Option<u64>, stale: bool) -> GlobalMark {
        GlobalMark {
            url: "https://docs.test/guide".into(),
            position: ScrollPosition::new(0.0, 800.0),
            owner: owner.map(ContextId::new),
            stale,
            timestamp: 0,
        }
    }

    fn ctx(id: u64, url: &str) -> ContextInfo {
        ContextInfo::new(ContextId::new(id), "t", url, id as usize)
    }

    #[test]
    fn test_prefers_live_owner() {
        let contexts = vec![
            ctx(1, "https://docs.test/guide"),
            ctx(2, "https://docs.test/guide"),
        ];
        assert_eq!(
            resolve_global_target(&mark(Some(2), false), &contexts),
            GlobalTarget::Existing(ContextId::new(2))
        );
    }

    #[test]
    fn test_stale_owner_is_skipped_even_if_listed() {
        let contexts = vec![
            ctx(1, "https://docs.test/guide"),
            ctx(2, "https://docs.test/guide"),
        ];
        assert_eq!(
            resolve_global_target(&mark(Some(2), true), &contexts),
            GlobalTarget::Existing(ContextId::new(1))
        );
    }

    #[test]
    fn test_stale_owner_listed_first_is_not_selected() {
        let contexts = vec![
            ctx(2, "https://docs.test/guide"),
            ctx(5, "https://docs.test/guide"),
        ];
        assert_eq!(
            resolve_global_target(&mark(Some(2), true), &contexts),
            GlobalTarget::Existing(ContextId::new(5))
        );

        let only_stale = vec![ctx(2, "https://docs.test/guide")];
        assert_eq!(
            resolve_global_target(&mark(Some(2), true), &only_stale),
            GlobalTarget::OpenNew("https://docs.test/guide".into())
        );
    }

    #[test]
    fn test_owner_showing_other_location_is_skipped() {
        let contexts = vec![ctx(2, "https://elsewhere.test/"), ctx(3, "https://docs.test/guide")];
        assert_eq!(
            resolve_global_target(&mark(Some(2), false), &contexts),
            GlobalTarget::Existing(ContextId::new(3))
        );
    }

    #[test]
    fn test_opens_new_when_no_context_matches() {
        let contexts = vec![ctx(1, "https://elsewhere.test/")];
        assert_eq!(
            resolve_global_target(&mark(None, false), &contexts),
            GlobalTarget::OpenNew("https://docs.test/guide".into())
        );
    }

    #[test]
    fn test_pending_scroll_load_first() {
        let mut pending = PendingScrolls::new();
        let ctx = ContextId::new(7);
        let token = pending.add(ctx, ScrollPosition::new(0.0, 5.0));

        assert_eq!(pending.on_loaded(ctx).len(), 1);
        assert_eq!(pending.on_timeout(token), None);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_pending_scroll_timeout_first() {
        let mut pending = PendingScrolls::new();
        let ctx = ContextId::new(7);
        let token = pending.add(ctx, ScrollPosition::new(0.0, 5.0));

        assert_eq!(
            pending.on_timeout(token),
            Some(ScrollOrder {
                context: ctx,
                position: ScrollPosition::new(0.0, 5.0)
            })
        );
        assert!(pending.on_loaded(ctx).is_empty());
    }

    #[test]
    fn test_pending_scroll_tokens_are_distinct() {
        let mut pending = PendingScrolls::new();
        let first = pending.add(ContextId::new(1), ScrollPosition::ORIGIN);
        let second = pending.add(ContextId::new(1), ScrollPosition::ORIGIN);
        assert_ne!(first, second);

        pending.on_timeout(first);
        assert_eq!(pending.len(), 1);
        pending.cancel(ContextId::new(1));
        assert!(pending.is_empty());
    }
}
