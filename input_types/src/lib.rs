#![no_std]

//! # Input Types
//!
//! This crate defines the input events the keynav engine interprets.
//!
//! ## Philosophy
//!
//! - **Events, not DOM objects**: Input is structured events, already reduced
//!   to the produced character and the modifier state
//! - **Focus is an observation**: The host reports focus changes; the engine
//!   never inspects the document to discover them
//! - **Testable**: Events are serializable and can be written in vim key
//!   notation (`"gg"`, `"<C-d>"`, `"<S-Esc>"`) for tests
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Hardware scan codes or keyboard layouts
//! - Pointer, touch or wheel input
//! - A complete DOM event model (just what the engine needs)

extern crate alloc;

pub mod notation;

pub use notation::{parse_keys, NotationError};

use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Input event
///
/// Either a keyboard state change or a focus observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Keyboard event
    Key(KeyEvent),
    /// Focus moved into or out of a document element
    Focus(FocusEvent),
}

impl InputEvent {
    /// Creates a key event
    pub fn key(event: KeyEvent) -> Self {
        Self::Key(event)
    }

    /// Returns true if this is a key event
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// Returns the key event if this is a key event
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(event) => Some(event),
            Self::Focus(_) => None,
        }
    }
}

/// Keyboard event
///
/// `key` carries the produced character for printable keys, so shifted
/// symbols arrive as the symbol itself (`$`, `!`, `:`) with SHIFT set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was pressed/released
    pub key: Key,
    /// Modifier keys that were active
    pub modifiers: Modifiers,
    /// Event state (pressed, released, repeat)
    pub state: KeyState,
}

impl KeyEvent {
    /// Creates a new key event
    pub fn new(key: Key, modifiers: Modifiers, state: KeyState) -> Self {
        Self {
            key,
            modifiers,
            state,
        }
    }

    /// Creates a key pressed event
    pub fn pressed(key: Key, modifiers: Modifiers) -> Self {
        Self::new(key, modifiers, KeyState::Pressed)
    }

    /// Creates a key released event
    pub fn released(key: Key, modifiers: Modifiers) -> Self {
        Self::new(key, modifiers, KeyState::Released)
    }

    /// Creates the press event a US keyboard produces when typing `c`
    ///
    /// Uppercase letters and shifted symbols carry SHIFT.
    pub fn typed(c: char) -> Self {
        let modifiers = if c.is_ascii_uppercase() || is_shifted_symbol(c) {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        Self::pressed(Key::Char(c), modifiers)
    }

    /// Returns true if this is a press event
    pub fn is_pressed(&self) -> bool {
        self.state == KeyState::Pressed
    }

    /// Returns true if this is a release event
    pub fn is_released(&self) -> bool {
        self.state == KeyState::Released
    }

    /// Returns true if this is a repeat event
    pub fn is_repeat(&self) -> bool {
        self.state == KeyState::Repeat
    }

    /// Returns the produced character, if any
    pub fn char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) => Some(c),
            _ => None,
        }
    }
}

fn is_shifted_symbol(c: char) -> bool {
    matches!(
        c,
        '!' | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '&'
            | '*'
            | '('
            | ')'
            | '_'
            | '+'
            | '{'
            | '}'
            | '|'
            | ':'
            | '"'
            | '<'
            | '>'
            | '?'
            | '~'
    )
}

/// Key state
///
/// Represents whether a key was pressed, released, or is repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    /// Key was pressed down
    Pressed,
    /// Key was released
    Released,
    /// Key is auto-repeating
    Repeat,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

/// Logical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character, as produced with the active modifiers
    Char(char),
    Escape,
    Enter,
    Backspace,
    Tab,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function key F1..F12
    Function(u8),
    /// A modifier key pressed on its own
    Modifier(ModifierKey),
    /// Unknown/unmapped key
    Unknown,
}

impl Key {
    /// True for keys that only change modifier state
    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Modifier(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Function(n) => write!(f, "F{}", n),
            Key::Modifier(m) => write!(f, "{:?}", m),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Modifier keys reported as standalone key events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Shift,
    Control,
    Alt,
    Meta,
}

/// Modifier keys
///
/// Bitflags representing modifier key states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Control key
    pub const CTRL: Self = Self { bits: 1 << 0 };
    /// Alt key
    pub const ALT: Self = Self { bits: 1 << 1 };
    /// Shift key
    pub const SHIFT: Self = Self { bits: 1 << 2 };
    /// Meta/Super/Windows key
    pub const META: Self = Self { bits: 1 << 3 };

    /// Creates a new modifier set with no modifiers
    pub fn none() -> Self {
        Self::NONE
    }

    /// Creates a new modifier set from bits
    pub fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Returns the raw bits
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Adds a modifier
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Checks if a modifier is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if Ctrl is pressed
    pub fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    /// Checks if Alt is pressed
    pub fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    /// Checks if Shift is pressed
    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    /// Checks if Meta is pressed
    pub fn is_meta(&self) -> bool {
        self.contains(Self::META)
    }

    /// Returns true if no modifiers are pressed
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if self.is_ctrl() {
            parts.push("Ctrl");
        }
        if self.is_alt() {
            parts.push("Alt");
        }
        if self.is_shift() {
            parts.push("Shift");
        }
        if self.is_meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// Focus observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusEvent {
    In(FocusTarget),
    Out(FocusTarget),
}

/// The element focus moved into or out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTarget {
    pub kind: ElementKind,
    /// True for the engine's own search and command inputs
    pub owned_by_engine: bool,
}

impl FocusTarget {
    pub fn page(kind: ElementKind) -> Self {
        Self {
            kind,
            owned_by_engine: false,
        }
    }

    pub fn engine(kind: ElementKind) -> Self {
        Self {
            kind,
            owned_by_engine: true,
        }
    }

    /// True when typed text belongs to this element
    pub fn is_editable(&self) -> bool {
        self.kind.is_editable()
    }
}

/// Coarse element classification for focus tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Input,
    TextArea,
    Select,
    ContentEditable,
    Other,
}

impl ElementKind {
    pub fn is_editable(&self) -> bool {
        !matches!(self, ElementKind::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_input_event_key() {
        let key_event = KeyEvent::pressed(Key::Char('a'), Modifiers::none());
        let event = InputEvent::key(key_event.clone());

        assert!(event.is_key());
        assert_eq!(event.as_key(), Some(&key_event));
    }

    #[test]
    fn test_focus_event_is_not_key() {
        let event = InputEvent::Focus(FocusEvent::In(FocusTarget::page(ElementKind::Input)));
        assert!(!event.is_key());
        assert_eq!(event.as_key(), None);
    }

    #[test]
    fn test_typed_sets_shift_for_uppercase_and_symbols() {
        assert!(KeyEvent::typed('G').modifiers.is_shift());
        assert!(KeyEvent::typed('$').modifiers.is_shift());
        assert!(KeyEvent::typed(':').modifiers.is_shift());
        assert!(KeyEvent::typed('g').modifiers.is_empty());
        assert!(KeyEvent::typed('/').modifiers.is_empty());
        assert!(KeyEvent::typed('\'').modifiers.is_empty());
    }

    #[test]
    fn test_key_event_states() {
        let event = KeyEvent::pressed(Key::Escape, Modifiers::CTRL);
        assert!(event.is_pressed());
        assert!(!event.is_released());

        let event = KeyEvent::released(Key::Escape, Modifiers::NONE);
        assert!(event.is_released());
        assert!(!event.is_repeat());
    }

    #[test]
    fn test_modifiers_combination() {
        let mods = Modifiers::CTRL.with(Modifiers::SHIFT);
        assert!(mods.is_ctrl());
        assert!(mods.is_shift());
        assert!(!mods.is_alt());
        assert_eq!(mods.to_string(), "Ctrl+Shift");
        assert_eq!(Modifiers::NONE.to_string(), "none");
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::Char('x').to_string(), "x");
        assert_eq!(Key::Char(' ').to_string(), "Space");
        assert_eq!(Key::Function(5).to_string(), "F5");
        assert_eq!(Key::Escape.to_string(), "Escape");
    }

    #[test]
    fn test_element_kind_editable() {
        assert!(ElementKind::Input.is_editable());
        assert!(ElementKind::ContentEditable.is_editable());
        assert!(!ElementKind::Other.is_editable());
    }

    #[test]
    fn test_key_event_serialization() {
        let event = KeyEvent::typed('G');
        let json = serde_json::to_string(&event).unwrap();
        let back: KeyEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
