//! Vim-style key notation
//!
//! Plain characters stand for themselves; `<...>` names a special key or a
//! modified chord: `<C-d>`, `<S-Esc>`, `<CR>`, `<BS>`, `<Esc>`, `<Tab>`,
//! `<Space>`, `<lt>` (a literal `<`), `<Shift>` (the Shift key alone).

use crate::{Key, KeyEvent, KeyState, ModifierKey, Modifiers};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Notation parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// `<` without a closing `>`
    Unterminated(String),
    /// Unknown name inside `<...>`
    UnknownKey(String),
    /// Unknown modifier prefix inside `<...>`
    UnknownModifier(char),
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unterminated(s) => write!(f, "unterminated key notation: <{}", s),
            Self::UnknownKey(s) => write!(f, "unknown key name: {}", s),
            Self::UnknownModifier(c) => write!(f, "unknown modifier: {}", c),
        }
    }
}

/// Parses a notation string into the press events it stands for
pub fn parse_keys(input: &str) -> Result<Vec<KeyEvent>, NotationError> {
    let mut events = Vec::new();
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            events.push(KeyEvent::typed(c));
            continue;
        }

        let mut name = String::new();
        let mut closed = false;
        for n in chars.by_ref() {
            if n == '>' {
                closed = true;
                break;
            }
            name.push(n);
        }
        if !closed {
            return Err(NotationError::Unterminated(name));
        }
        events.push(parse_bracketed(&name)?);
    }

    Ok(events)
}

fn parse_bracketed(name: &str) -> Result<KeyEvent, NotationError> {
    let mut modifiers = Modifiers::NONE;
    let mut rest = name;

    // Modifier prefixes: "C-", "S-", "A-", "M-"
    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        let prefix = rest.as_bytes()[0] as char;
        let modifier = match prefix.to_ascii_uppercase() {
            'C' => Modifiers::CTRL,
            'S' => Modifiers::SHIFT,
            'A' => Modifiers::ALT,
            'M' => Modifiers::META,
            other => return Err(NotationError::UnknownModifier(other)),
        };
        modifiers = modifiers.with(modifier);
        rest = &rest[2..];
    }

    let key = match rest.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Key::Escape,
        "cr" | "enter" | "return" => Key::Enter,
        "bs" | "backspace" => Key::Backspace,
        "tab" => Key::Tab,
        "del" | "delete" => Key::Delete,
        "space" => Key::Char(' '),
        "lt" => Key::Char('<'),
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "shift" => Key::Modifier(ModifierKey::Shift),
        "ctrl" | "control" => Key::Modifier(ModifierKey::Control),
        "alt" => Key::Modifier(ModifierKey::Alt),
        "meta" => Key::Modifier(ModifierKey::Meta),
        _ => {
            let mut it = rest.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => {
                    let typed = KeyEvent::typed(c);
                    return Ok(KeyEvent::new(
                        typed.key,
                        typed.modifiers.with(modifiers),
                        KeyState::Pressed,
                    ));
                }
                _ => {
                    if let Some(n) = parse_function_key(rest) {
                        Key::Function(n)
                    } else {
                        return Err(NotationError::UnknownKey(String::from(rest)));
                    }
                }
            }
        }
    };

    Ok(KeyEvent::pressed(key, modifiers))
}

fn parse_function_key(name: &str) -> Option<u8> {
    let digits = name.strip_prefix('F').or_else(|| name.strip_prefix('f'))?;
    let n: u8 = digits.parse().ok()?;
    (1..=12).contains(&n).then_some(n)
}
