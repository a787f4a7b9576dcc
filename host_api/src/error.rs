//! Host error types

use thiserror::Error;

/// Errors reported by host collaborators
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The collaborator refused the operation
    #[error("{0}")]
    Rejected(String),

    /// The collaborator is not available in this host
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// A URL could not be used for navigation
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The referenced context or element no longer exists
    #[error("No such target: {0}")]
    NoSuchTarget(String),

    /// Timeout occurred
    #[error("Operation timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_bare_message() {
        let err = HostError::Rejected("Invalid tab ID: 9".to_string());
        assert_eq!(err.to_string(), "Invalid tab ID: 9");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(HostError::Timeout.to_string(), "Operation timed out");
        assert_eq!(
            HostError::InvalidUrl("nope".to_string()).to_string(),
            "Invalid URL: nope"
        );
    }
}
