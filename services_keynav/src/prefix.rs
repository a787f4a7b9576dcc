//! Pending two-key sequences

use crate::bindings::{self, Action};

/// Result of extending the buffer by one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOutcome {
    /// A full sequence; the buffer is now empty
    Complete(Action),
    /// Still a strict prefix of some sequence
    Pending,
    /// Not a prefix of any sequence; the buffer is now empty
    Invalid,
}

/// Keys typed so far of a multi-key command
///
/// Only ever holds a strict prefix of an entry in [`bindings::SEQUENCES`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPrefixBuffer {
    keys: String,
}

impl KeyPrefixBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.keys
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Appends a key and tests the buffer against the sequence table
    pub fn push(&mut self, c: char) -> PrefixOutcome {
        self.keys.push(c);
        if let Some(action) = bindings::sequence(&self.keys) {
            self.keys.clear();
            return PrefixOutcome::Complete(action);
        }
        if bindings::is_strict_prefix(&self.keys) {
            PrefixOutcome::Pending
        } else {
            self.keys.clear();
            PrefixOutcome::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::SEQUENCES;
    use proptest::prelude::*;

    #[test]
    fn test_complete_sequence() {
        let mut buffer = KeyPrefixBuffer::new();
        assert_eq!(buffer.push('g'), PrefixOutcome::Pending);
        assert_eq!(buffer.as_str(), "g");
        assert_eq!(buffer.push('g'), PrefixOutcome::Complete(Action::ScrollTop));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_invalid_clears_within_one_key() {
        let mut buffer = KeyPrefixBuffer::new();
        buffer.push('z');
        assert_eq!(buffer.push('j'), PrefixOutcome::Invalid);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_non_starter_is_invalid_immediately() {
        let mut buffer = KeyPrefixBuffer::new();
        assert_eq!(buffer.push('q'), PrefixOutcome::Invalid);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_every_sequence_executes_once() {
        for (keys, action) in SEQUENCES {
            let mut buffer = KeyPrefixBuffer::new();
            let outcomes: Vec<_> = keys.chars().map(|c| buffer.push(c)).collect();
            assert_eq!(
                outcomes,
                vec![PrefixOutcome::Pending, PrefixOutcome::Complete(*action)]
            );
        }
    }

    proptest! {
        #[test]
        fn buffer_never_outgrows_longest_sequence(keys in proptest::collection::vec(any::<char>(), 0..64)) {
            let longest = SEQUENCES.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0);
            let mut buffer = KeyPrefixBuffer::new();
            for c in keys {
                let outcome = buffer.push(c);
                prop_assert!(buffer.as_str().chars().count() < longest);
                if outcome != PrefixOutcome::Pending {
                    prop_assert!(buffer.is_empty());
                }
            }
        }
    }
}
