//! Location comparison used by session-scoped marks

use serde::{Deserialize, Serialize};

/// How a recorded location is compared with the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlMatchPolicy {
    /// Byte-for-byte equality
    #[default]
    Exact,
    /// Equality after dropping the `#fragment`
    IgnoreFragment,
}

impl UrlMatchPolicy {
    pub fn matches(&self, recorded: &str, current: &str) -> bool {
        match self {
            UrlMatchPolicy::Exact => recorded == current,
            UrlMatchPolicy::IgnoreFragment => strip_fragment(recorded) == strip_fragment(current),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlMatchPolicy::Exact => "exact",
            UrlMatchPolicy::IgnoreFragment => "ignore_fragment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "exact" => Some(UrlMatchPolicy::Exact),
            "ignore_fragment" => Some(UrlMatchPolicy::IgnoreFragment),
            _ => None,
        }
    }
}

fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map(|(base, _)| base).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_rejects_fragment_change() {
        let policy = UrlMatchPolicy::Exact;
        assert!(policy.matches("https://a.test/x", "https://a.test/x"));
        assert!(!policy.matches("https://a.test/x", "https://a.test/x#top"));
        assert!(!policy.matches("https://a.test/x", "https://a.test/x?q=1"));
    }

    #[test]
    fn test_ignore_fragment_accepts_fragment_change_only() {
        let policy = UrlMatchPolicy::IgnoreFragment;
        assert!(policy.matches("https://a.test/x#a", "https://a.test/x#b"));
        assert!(policy.matches("https://a.test/x", "https://a.test/x#b"));
        assert!(!policy.matches("https://a.test/x", "https://a.test/x?q=1"));
        assert!(!policy.matches("https://a.test/x", "https://a.test/y"));
    }
}
