//! Input-focus suppression

use input_types::FocusEvent;

/// Tracks whether a page input holds focus
///
/// While it does, keys belong to the page. The engine's own inputs never
/// suppress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusTracker {
    suppressed: bool,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Applies a focus observation; returns true if suppression changed
    pub fn apply(&mut self, event: &FocusEvent) -> bool {
        let (target, focused) = match event {
            FocusEvent::In(target) => (target, true),
            FocusEvent::Out(target) => (target, false),
        };
        if !target.is_editable() || target.owned_by_engine {
            return false;
        }
        let changed = self.suppressed != focused;
        self.suppressed = focused;
        changed
    }

    pub fn clear(&mut self) {
        self.suppressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input_types::{ElementKind, FocusTarget};

    #[test]
    fn test_page_inputs_suppress() {
        let mut focus = FocusTracker::new();
        assert!(focus.apply(&FocusEvent::In(FocusTarget::page(ElementKind::TextArea))));
        assert!(focus.is_suppressed());
        assert!(focus.apply(&FocusEvent::Out(FocusTarget::page(ElementKind::TextArea))));
        assert!(!focus.is_suppressed());
    }

    #[test]
    fn test_engine_inputs_and_plain_elements_do_not() {
        let mut focus = FocusTracker::new();
        assert!(!focus.apply(&FocusEvent::In(FocusTarget::engine(ElementKind::Input))));
        assert!(!focus.apply(&FocusEvent::In(FocusTarget::page(ElementKind::Other))));
        assert!(!focus.is_suppressed());
    }
}
