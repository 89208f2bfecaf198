use dnsgraph_core::GraphError;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single upstream request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Too many requests (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },
    #[error("Upstream returned status {status}")]
    Status { status: u16 },
    #[error("Record not found")]
    NotFound,
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),
    #[error("Failed to reach {link}: {reason}")]
    UpstreamUnavailable { link: String, reason: String },
    #[error("Still rate limited on {link} after {attempts} attempts")]
    UpstreamRateLimited { link: String, attempts: u32 },
    #[error("Invalid graph element: {0}")]
    InvalidGraphElement(#[from] GraphError),
    #[error("Unexpected {kind} record at {link}")]
    UnexpectedRecord { link: String, kind: String },
}

impl ResolveError {
    pub fn unavailable(link: &str, reason: impl ToString) -> Self {
        ResolveError::UpstreamUnavailable {
            link: link.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ResolveError::unavailable("/domains/example.com", FetchError::NotFound);
        assert_eq!(err.to_string(), "Failed to reach /domains/example.com: Record not found");
        let err: ResolveError = GraphError::SelfLoop("domain~a.com".into()).into();
        assert!(matches!(err, ResolveError::InvalidGraphElement(_)));
    }
}
