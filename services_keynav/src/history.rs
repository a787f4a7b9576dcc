//! Recently activated contexts

use core_types::ContextId;

/// Current and previously activated context, for `<C-6>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextHistory {
    current: Option<ContextId>,
    previous: Option<ContextId>,
}

impl ContextHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ContextId> {
        self.current
    }

    pub fn previous(&self) -> Option<ContextId> {
        self.previous
    }

    pub fn on_activated(&mut self, context: ContextId) {
        match self.current {
            Some(current) if current != context => self.previous = Some(current),
            _ => {
                if self.previous == Some(context) {
                    self.previous = None;
                }
            }
        }
        self.current = Some(context);
    }

    pub fn on_removed(&mut self, context: ContextId) {
        if self.previous == Some(context) {
            self.previous = None;
        }
        if self.current == Some(context) {
            self.current = None;
        }
    }

    /// Forgets `context` as the previous one after it failed to activate
    pub fn forget_previous(&mut self, context: ContextId) {
        if self.previous == Some(context) {
            self.previous = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_previous() {
        let mut history = ContextHistory::new();
        history.on_activated(ContextId::new(1));
        assert_eq!(history.previous(), None);
        history.on_activated(ContextId::new(2));
        assert_eq!(history.previous(), Some(ContextId::new(1)));
        history.on_activated(ContextId::new(1));
        assert_eq!(history.previous(), Some(ContextId::new(2)));
        assert_eq!(history.current(), Some(ContextId::new(1)));
    }

    #[test]
    fn test_reactivating_current_keeps_previous() {
        let mut history = ContextHistory::new();
        history.on_activated(ContextId::new(1));
        history.on_activated(ContextId::new(2));
        history.on_activated(ContextId::new(2));
        assert_eq!(history.previous(), Some(ContextId::new(1)));
    }

    #[test]
    fn test_removal_clears() {
        let mut history = ContextHistory::new();
        history.on_activated(ContextId::new(1));
        history.on_activated(ContextId::new(2));
        history.on_removed(ContextId::new(1));
        assert_eq!(history.previous(), None);
        history.on_removed(ContextId::new(2));
        assert_eq!(history.current(), None);
    }

    #[test]
    fn test_forget_previous() {
        let mut history = ContextHistory::new();
        history.on_activated(ContextId::new(1));
        history.on_activated(ContextId::new(2));
        history.forget_previous(ContextId::new(3));
        assert_eq!(history.previous(), Some(ContextId::new(1)));
        history.forget_previous(ContextId::new(1));
        assert_eq!(history.previous(), None);
    }
}
