//! Single-line search input

use input_types::{Key, KeyEvent};
use serde::{Deserialize, Serialize};

/// What a key did to the search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarInput {
    /// The text changed (or the key was swallowed by the bar)
    Edited,
    /// Enter was pressed
    Submit,
    /// The bar has no use for the key
    Ignored,
}

/// The visible search surface
///
/// Opened with the previous query prefilled and selected, so the first typed
/// character replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchBar {
    input: String,
    selected: bool,
    status: Option<String>,
}

impl SearchBar {
    pub fn new(prefill: &str) -> Self {
        Self {
            input: prefill.to_string(),
            selected: !prefill.is_empty(),
            status: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while the prefilled text is still selected
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn insert(&mut self, c: char) {
        if self.selected {
            self.input.clear();
            self.selected = false;
        }
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        if self.selected {
            self.input.clear();
            self.selected = false;
        } else {
            self.input.pop();
        }
    }

    /// Applies one key press
    pub fn handle_key(&mut self, event: &KeyEvent) -> BarInput {
        if event.modifiers.is_ctrl() || event.modifiers.is_meta() {
            return BarInput::Ignored;
        }
        match event.key {
            Key::Enter => BarInput::Submit,
            Key::Backspace => {
                self.backspace();
                BarInput::Edited
            }
            Key::Char(c) => {
                self.insert(c);
                BarInput::Edited
            }
            _ => BarInput::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefill_is_replaced_by_first_char() {
        let mut bar = SearchBar::new("alpha");
        assert!(bar.is_selected());
        bar.insert('b');
        assert_eq!(bar.input(), "b");
        bar.insert('e');
        assert_eq!(bar.input(), "be");
    }

    #[test]
    fn test_backspace_on_selection_clears() {
        let mut bar = SearchBar::new("alpha");
        bar.backspace();
        assert_eq!(bar.input(), "");
        assert!(!bar.is_selected());
    }

    #[test]
    fn test_empty_prefill_is_not_selected() {
        let mut bar = SearchBar::new("");
        assert!(!bar.is_selected());
        bar.insert('x');
        bar.insert('y');
        bar.backspace();
        assert_eq!(bar.input(), "x");
    }

    #[test]
    fn test_handle_key() {
        let mut bar = SearchBar::new("");
        assert_eq!(bar.handle_key(&KeyEvent::typed('Q')), BarInput::Edited);
        assert_eq!(bar.input(), "Q");
        assert_eq!(
            bar.handle_key(&KeyEvent::pressed(Key::Enter, Default::default())),
            BarInput::Submit
        );
        assert_eq!(
            bar.handle_key(&KeyEvent::pressed(Key::Up, Default::default())),
            BarInput::Ignored
        );
    }
}
