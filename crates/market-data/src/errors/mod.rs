//! Error types and retry classification for the acquisition layer.
//!
//! This module provides:
//! - [`FetchError`]: the error enum for all fetch operations
//! - [`RetryClass`]: classification for determining retry behavior
//!
//! The HTTP boundary converts statuses into these variants exactly once;
//! retry logic consults [`FetchError::retry_class`] and never inspects
//! error message text.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching market data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// A transport-level failure (connection refused, timeout, DNS).
    /// Retryable with backoff.
    #[error("network error: {message}")]
    Network {
        /// Description of the underlying transport failure
        message: String,
    },

    /// The source rate limited the request (HTTP 429).
    /// Retryable with backoff, logged distinctly for observability.
    #[error("rate limited by {provider}")]
    RateLimited {
        /// The source that rate limited the request
        provider: String,
    },

    /// The source returned an unsuccessful HTTP status other than 404/429.
    /// Retryable with backoff.
    #[error("http status {code} from {provider}")]
    Status {
        /// The source that returned the status
        provider: String,
        /// The HTTP status code
        code: u16,
    },

    /// The requested URL does not exist (HTTP 404).
    /// Terminal for that URL; the scraper may switch category exactly once.
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404
        url: String,
    },

    /// The source answered but does not know the symbol.
    /// Terminal - retrying the same symbol won't help.
    #[error("symbol not found: {symbol}")]
    SymbolNotFound {
        /// The symbol that failed to resolve
        symbol: String,
    },

    /// The payload could not be parsed. Terminal.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the parse failure
        message: String,
    },

    /// Every source (primary, alias variants, scraper) failed for a symbol.
    #[error("all sources exhausted for {symbol}")]
    SourceExhausted {
        /// The symbol that exhausted all sources
        symbol: String,
    },
}

impl FetchError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::WithBackoff`]: transient, retry with exponential backoff
    /// - [`RetryClass::Never`]: terminal, retrying the same request won't help
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Network { .. } | Self::RateLimited { .. } | Self::Status { .. } => {
                RetryClass::WithBackoff
            }
            Self::NotFound { .. }
            | Self::SymbolNotFound { .. }
            | Self::Parse { .. }
            | Self::SourceExhausted { .. } => RetryClass::Never,
        }
    }

    /// True for rate-limit conditions, which retry like any transient
    /// failure but are logged distinctly.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network {
            message: err.to_string(),
        }
    }
}
