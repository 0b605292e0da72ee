//! Feed client error types.

/// Errors from the real-time feed path.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeedError::UpstreamStatus { status: 429 };
        assert_eq!(err.to_string(), "upstream returned status 429");
    }
}
