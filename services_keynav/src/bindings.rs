//! Key tables

use crate::mode::ModifierTier;

/// A command the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ScrollDown,
    ScrollUp,
    ScrollLeft,
    ScrollRight,
    ScrollLeftmost,
    ScrollRightmost,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    ScrollTop,
    ScrollBottom,
    CloseContext,
    ClosePinnedContext,
    RestoreContext,
    Reload,
    HardReload,
    PreviousContext,
    NextContext,
    FirstContext,
    LastContext,
    LastActiveContext,
    HistoryBack,
    HistoryForward,
    CopyUrl,
    OpenClipboard,
    OpenClipboardInNewContext,
    Follow,
    FollowInNewContext,
    SearchStart,
    SearchNext,
    SearchPrevious,
    MarkSet,
    MarkGoto,
    CommandLine,
    ParentDirectory,
    SiteRoot,
    FocusInput,
    ViewSource,
    TogglePin,
    Duplicate,
    PreviousPage,
    NextPage,
}

/// A single-key table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Run(Action),
    /// The key begins a two-key sequence
    StartSequence,
}

const CONTROL: &[(char, Action)] = &[
    ('u', Action::HalfPageUp),
    ('d', Action::HalfPageDown),
    ('b', Action::PageUp),
    ('f', Action::PageDown),
    ('6', Action::LastActiveContext),
];

const SHIFT: &[(char, Action)] = &[
    ('G', Action::ScrollBottom),
    ('R', Action::HardReload),
    ('K', Action::PreviousContext),
    ('J', Action::NextContext),
    ('H', Action::HistoryBack),
    ('L', Action::HistoryForward),
    ('P', Action::OpenClipboardInNewContext),
    ('F', Action::FollowInNewContext),
    ('N', Action::SearchPrevious),
];

const PLAIN: &[(char, Action)] = &[
    ('j', Action::ScrollDown),
    ('k', Action::ScrollUp),
    ('h', Action::ScrollLeft),
    ('l', Action::ScrollRight),
    ('0', Action::ScrollLeftmost),
    ('$', Action::ScrollRightmost),
    ('d', Action::CloseContext),
    ('u', Action::RestoreContext),
    ('r', Action::Reload),
    ('y', Action::CopyUrl),
    ('p', Action::OpenClipboard),
    ('f', Action::Follow),
    ('/', Action::SearchStart),
    ('n', Action::SearchNext),
    ('m', Action::MarkSet),
    ('\'', Action::MarkGoto),
    (':', Action::CommandLine),
];

/// First keys of the two-key sequences
pub const SEQUENCE_STARTERS: &[char] = &['g', 'z', '[', ']', '!'];

/// Two-key sequences
pub const SEQUENCES: &[(&str, Action)] = &[
    ("gg", Action::ScrollTop),
    ("g0", Action::FirstContext),
    ("g$", Action::LastContext),
    ("gu", Action::ParentDirectory),
    ("gU", Action::SiteRoot),
    ("gi", Action::FocusInput),
    ("gf", Action::ViewSource),
    ("zp", Action::TogglePin),
    ("zd", Action::Duplicate),
    ("[[", Action::PreviousPage),
    ("]]", Action::NextPage),
    ("!d", Action::ClosePinnedContext),
];

/// Looks up a key press in the table for its modifier tier
pub fn lookup(tier: ModifierTier, c: char) -> Option<Binding> {
    let table = match tier {
        ModifierTier::Control => CONTROL,
        ModifierTier::Shift => SHIFT,
        ModifierTier::Plain => {
            if SEQUENCE_STARTERS.contains(&c) {
                return Some(Binding::StartSequence);
            }
            PLAIN
        }
    };
    table
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, action)| Binding::Run(*action))
}

/// The sequence `keys` spells, if complete
pub fn sequence(keys: &str) -> Option<Action> {
    SEQUENCES
        .iter()
        .find(|(sequence, _)| *sequence == keys)
        .map(|(_, action)| *action)
}

/// True if some sequence is longer than `keys` and starts with it
pub fn is_strict_prefix(keys: &str) -> bool {
    SEQUENCES
        .iter()
        .any(|(sequence, _)| sequence.len() > keys.len() && sequence.starts_with(keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_are_disjoint_per_tier() {
        for table in [CONTROL, SHIFT, PLAIN] {
            let keys: HashSet<char> = table.iter().map(|(k, _)| *k).collect();
            assert_eq!(keys.len(), table.len());
        }
        for (key, _) in PLAIN {
            assert!(!SEQUENCE_STARTERS.contains(key));
        }
    }

    #[test]
    fn test_same_letter_differs_by_tier() {
        assert_eq!(
            lookup(ModifierTier::Plain, 'd'),
            Some(Binding::Run(Action::CloseContext))
        );
        assert_eq!(
            lookup(ModifierTier::Control, 'd'),
            Some(Binding::Run(Action::HalfPageDown))
        );
        assert_eq!(lookup(ModifierTier::Shift, 'D'), None);
    }

    #[test]
    fn test_sequence_starters() {
        for c in SEQUENCE_STARTERS {
            assert_eq!(lookup(ModifierTier::Plain, *c), Some(Binding::StartSequence));
            assert!(is_strict_prefix(&c.to_string()));
        }
        assert_eq!(lookup(ModifierTier::Control, 'g'), None);
    }

    #[test]
    fn test_every_sequence_starts_with_a_starter() {
        for (keys, _) in SEQUENCES {
            let first = keys.chars().next().unwrap();
            assert!(SEQUENCE_STARTERS.contains(&first));
            assert_eq!(keys.chars().count(), 2);
            assert!(!is_strict_prefix(keys));
        }
    }

    #[test]
    fn test_sequence_lookup() {
        assert_eq!(sequence("gU"), Some(Action::SiteRoot));
        assert_eq!(sequence("gu"), Some(Action::ParentDirectory));
        assert_eq!(sequence("gx"), None);
    }
}
