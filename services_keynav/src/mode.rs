//! Modes and the key routing table

use input_types::{Key, KeyEvent};
use serde::{Deserialize, Serialize};

/// The single active interpretation context for keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    /// Hint labels are shown; typed characters pick one
    Follow,
    /// The next letter records a mark
    MarkSet,
    /// The next letter jumps to a mark
    MarkGoto,
    /// The search bar has the keyboard
    SearchInput,
    /// The command line has the keyboard
    CommandLine,
    /// The command line is waiting for the number of a listed context
    BufferSelection,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Follow => "FOLLOW",
            Mode::MarkSet => "MARK-SET",
            Mode::MarkGoto => "MARK-GOTO",
            Mode::SearchInput => "SEARCH",
            Mode::CommandLine => "COMMAND",
            Mode::BufferSelection => "SELECT",
        }
    }

    /// True for the modes the command line owns
    pub fn is_command_line(&self) -> bool {
        matches!(self, Mode::CommandLine | Mode::BufferSelection)
    }
}

/// Which single-key table a key press is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTier {
    Control,
    /// Shifted letters; shifted punctuation is already a distinct character
    Shift,
    Plain,
}

impl ModifierTier {
    /// Alt and Meta chords have no bindings
    pub fn of(event: &KeyEvent) -> Option<Self> {
        let modifiers = event.modifiers;
        if modifiers.is_alt() || modifiers.is_meta() {
            return None;
        }
        if modifiers.is_ctrl() {
            return Some(ModifierTier::Control);
        }
        match event.key {
            Key::Char(c) if modifiers.is_shift() && c.is_alphabetic() => Some(ModifierTier::Shift),
            _ => Some(ModifierTier::Plain),
        }
    }
}

/// What the cancellation key cancels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancel {
    /// Drop all hints
    Follow,
    /// Close the search bar
    Search,
    /// Leave mark-set or mark-goto
    Mark,
    /// Blur the focused page input and stop suppressing keys
    Suppression,
    /// Forget a pending key sequence; the key itself is not consumed
    Prefix,
}

/// Ambient state routing depends on besides the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteContext {
    pub enabled: bool,
    /// A page input has focus
    pub suppressed: bool,
    pub prefix_pending: bool,
}

/// Where a key event goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not ours; the page handles it
    Pass,
    /// Flip the enabled flag
    Toggle,
    /// Cancellation key; every variant returns to Normal
    Cancel(Cancel),
    Follow,
    /// A letter for mark-set/mark-goto
    Mark,
    /// A non-letter in a mark mode: back to Normal, then route again
    AbandonMark,
    Search,
    CommandLine,
    /// Extends the pending key sequence
    Prefix,
    Single(ModifierTier),
}

impl Route {
    /// Mode after the route is taken, where the table alone decides it
    pub fn next_mode(&self, current: Mode) -> Mode {
        match self {
            Route::Cancel(_) | Route::AbandonMark => Mode::Normal,
            _ => current,
        }
    }
}

/// Routes one key event
///
/// Order: toggle chord, cancellation key, input-focus suppression, the
/// active mode, the pending sequence, then the single-key tables.
pub fn route(mode: Mode, event: &KeyEvent, context: RouteContext) -> Route {
    if event.is_released() || event.key.is_modifier() {
        return Route::Pass;
    }

    if event.key == Key::Escape && event.modifiers.is_shift() {
        return Route::Toggle;
    }

    if !context.enabled {
        return Route::Pass;
    }

    if event.key == Key::Escape {
        return match mode {
            Mode::Follow => Route::Cancel(Cancel::Follow),
            Mode::SearchInput => Route::Cancel(Cancel::Search),
            Mode::MarkSet | Mode::MarkGoto => Route::Cancel(Cancel::Mark),
            Mode::CommandLine | Mode::BufferSelection => Route::CommandLine,
            Mode::Normal if context.suppressed => Route::Cancel(Cancel::Suppression),
            Mode::Normal => Route::Cancel(Cancel::Prefix),
        };
    }

    if context.suppressed {
        return Route::Pass;
    }

    match mode {
        Mode::Follow => Route::Follow,
        Mode::MarkSet | Mode::MarkGoto => match event.char() {
            Some(c) if c.is_ascii_alphabetic() => Route::Mark,
            _ => Route::AbandonMark,
        },
        Mode::SearchInput => Route::Search,
        Mode::CommandLine | Mode::BufferSelection => Route::CommandLine,
        Mode::Normal if context.prefix_pending => Route::Prefix,
        Mode::Normal => match ModifierTier::of(event) {
            Some(tier) => Route::Single(tier),
            None => Route::Pass,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input_types::{parse_keys, Modifiers};

    const IDLE: RouteContext = RouteContext {
        enabled: true,
        suppressed: false,
        prefix_pending: false,
    };

    fn key(notation: &str) -> KeyEvent {
        let mut keys = parse_keys(notation).unwrap();
        assert_eq!(keys.len(), 1);
        keys.remove(0)
    }

    #[test]
    fn test_toggle_wins_in_every_mode() {
        for mode in [Mode::Normal, Mode::Follow, Mode::SearchInput, Mode::BufferSelection] {
            assert_eq!(route(mode, &key("<S-Esc>"), IDLE), Route::Toggle);
        }
        let disabled = RouteContext {
            enabled: false,
            ..IDLE
        };
        assert_eq!(route(Mode::Normal, &key("<S-Esc>"), disabled), Route::Toggle);
        assert_eq!(route(Mode::Normal, &key("j"), disabled), Route::Pass);
    }

    #[test]
    fn test_escape_per_mode() {
        let esc = key("<Esc>");
        assert_eq!(route(Mode::Follow, &esc, IDLE), Route::Cancel(Cancel::Follow));
        assert_eq!(route(Mode::SearchInput, &esc, IDLE), Route::Cancel(Cancel::Search));
        assert_eq!(route(Mode::MarkGoto, &esc, IDLE), Route::Cancel(Cancel::Mark));
        assert_eq!(route(Mode::CommandLine, &esc, IDLE), Route::CommandLine);
        assert_eq!(route(Mode::Normal, &esc, IDLE), Route::Cancel(Cancel::Prefix));

        let suppressed = RouteContext {
            suppressed: true,
            ..IDLE
        };
        assert_eq!(
            route(Mode::Normal, &esc, suppressed),
            Route::Cancel(Cancel::Suppression)
        );
    }

    #[test]
    fn test_suppression_passes_everything_but_escape() {
        let suppressed = RouteContext {
            suppressed: true,
            ..IDLE
        };
        assert_eq!(route(Mode::Normal, &key("j"), suppressed), Route::Pass);
        assert_eq!(route(Mode::Normal, &key("<C-d>"), suppressed), Route::Pass);
    }

    #[test]
    fn test_mode_dispatch() {
        assert_eq!(route(Mode::Follow, &key("x"), IDLE), Route::Follow);
        assert_eq!(route(Mode::MarkSet, &key("A"), IDLE), Route::Mark);
        assert_eq!(route(Mode::MarkSet, &key("1"), IDLE), Route::AbandonMark);
        assert_eq!(route(Mode::SearchInput, &key("j"), IDLE), Route::Search);
        assert_eq!(route(Mode::BufferSelection, &key("2"), IDLE), Route::CommandLine);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(route(Mode::Normal, &key("j"), IDLE), Route::Single(ModifierTier::Plain));
        assert_eq!(route(Mode::Normal, &key("G"), IDLE), Route::Single(ModifierTier::Shift));
        assert_eq!(route(Mode::Normal, &key("$"), IDLE), Route::Single(ModifierTier::Plain));
        assert_eq!(route(Mode::Normal, &key("<C-6>"), IDLE), Route::Single(ModifierTier::Control));
        assert_eq!(route(Mode::Normal, &key("<A-j>"), IDLE), Route::Pass);
    }

    #[test]
    fn test_prefix_pending() {
        let pending = RouteContext {
            prefix_pending: true,
            ..IDLE
        };
        assert_eq!(route(Mode::Normal, &key("g"), pending), Route::Prefix);
    }

    #[test]
    fn test_releases_and_modifier_keys_pass() {
        let release = KeyEvent::released(Key::Char('j'), Modifiers::NONE);
        assert_eq!(route(Mode::Normal, &release, IDLE), Route::Pass);
        assert_eq!(route(Mode::MarkGoto, &key("<Shift>"), IDLE), Route::Pass);
    }

    #[test]
    fn test_next_mode() {
        assert_eq!(
            Route::Cancel(Cancel::Follow).next_mode(Mode::Follow),
            Mode::Normal
        );
        assert_eq!(Route::AbandonMark.next_mode(Mode::MarkSet), Mode::Normal);
        assert_eq!(Route::Follow.next_mode(Mode::Follow), Mode::Follow);
    }
}
