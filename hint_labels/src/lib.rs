//! # Hint Labels
//!
//! Maps a candidate index to a short label typed to select it in follow mode.
//!
//! ## Philosophy
//!
//! - **Pure**: A label depends only on the alphabet and the index
//! - **Prefix-free**: No label is a prefix of another, so typing a label
//!   character by character always narrows to one match or none
//! - **Short first**: Low indices get the shortest labels
//!
//! ## Scheme
//!
//! The alphabet is split into *terminal* characters (the leading part) and
//! *extension* characters (the trailing part). A label is zero or more
//! extension characters followed by exactly one terminal. Labels are numbered
//! tier by tier: every one-character label, then every two-character label,
//! and so on. Inside a tier the extension prefix is a fixed-width base-`m`
//! numeral (`m` extension characters, no carry into a longer tier), so the
//! numbering has no gaps and no zero-digit ambiguity.
//!
//! With the default 26-character alphabet there are 14 one-character labels
//! (the home and top rows) and 168 two-character labels.

use std::collections::HashSet;
use thiserror::Error;

/// Default hint characters, home row first
pub const DEFAULT_HINT_CHARS: &str = "asdfghjklqwertyuiopzxcvbnm";

/// Alphabet validation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("hint alphabet is empty")]
    Empty,

    #[error("hint alphabet needs at least two characters")]
    TooShort,

    #[error("hint alphabet repeats '{0}'")]
    Duplicate(char),
}

/// A validated hint alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintAlphabet {
    terminals: Vec<char>,
    extensions: Vec<char>,
}

impl HintAlphabet {
    /// Validates `chars` and splits it into terminals and extensions
    ///
    /// Characters are lowercased; whitespace is not allowed to count as a
    /// hint character and is skipped.
    pub fn new(chars: &str) -> Result<Self, AlphabetError> {
        let alphabet: Vec<char> = chars
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        if alphabet.is_empty() {
            return Err(AlphabetError::Empty);
        }
        if alphabet.len() < 2 {
            return Err(AlphabetError::TooShort);
        }

        let mut seen = HashSet::with_capacity(alphabet.len());
        for &ch in &alphabet {
            if !seen.insert(ch) {
                return Err(AlphabetError::Duplicate(ch));
            }
        }

        let extension_count = ((alphabet.len() - 1) / 2).max(1);
        let split = alphabet.len() - extension_count;
        Ok(Self {
            terminals: alphabet[..split].to_vec(),
            extensions: alphabet[split..].to_vec(),
        })
    }

    /// Total number of characters
    pub fn len(&self) -> usize {
        self.terminals.len() + self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// True when `c` can appear in a label
    pub fn contains(&self, c: char) -> bool {
        self.terminals.contains(&c) || self.extensions.contains(&c)
    }

    /// Returns the label for `index`
    pub fn label(&self, index: usize) -> String {
        let t = self.terminals.len();
        let m = self.extensions.len();

        let mut rem = index;
        let mut head_len = 0usize;
        let mut tier_size = t;
        while rem >= tier_size {
            rem -= tier_size;
            head_len += 1;
            tier_size = tier_size.saturating_mul(m);
        }

        let terminal = self.terminals[rem % t];
        let mut q = rem / t;

        let mut head = vec![self.extensions[0]; head_len];
        for slot in head.iter_mut().rev() {
            *slot = self.extensions[q % m];
            q /= m;
        }

        let mut label: String = head.into_iter().collect();
        label.push(terminal);
        label
    }

    /// Returns the labels for indices `0..n`
    pub fn labels(&self, n: usize) -> Vec<String> {
        (0..n).map(|i| self.label(i)).collect()
    }
}

impl Default for HintAlphabet {
    fn default() -> Self {
        let extension_count = 12;
        let chars: Vec<char> = DEFAULT_HINT_CHARS.chars().collect();
        let split = chars.len() - extension_count;
        Self {
            terminals: chars[..split].to_vec(),
            extensions: chars[split..].to_vec(),
        }
    }
}
