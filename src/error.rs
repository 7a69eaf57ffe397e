//! Error types for chanbuf.
//!
//! Most of this crate is infallible by design: buffering, lifecycle, event,
//! and widget operations perform no I/O and cannot fail. Only the status-bar
//! gather path surfaces errors, either because the caller canceled it or
//! because a provider implementation reported a failure.

use thiserror::Error;

/// Main error type for chanbuf operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The operation was canceled via its cancellation token.
    #[error("Operation canceled")]
    Cancelled,

    /// A status-bar item provider failed.
    ///
    /// Returned by provider implementations; the service itself swallows
    /// these per-provider (logging them and substituting an empty list)
    /// rather than failing the whole gather.
    #[error("Provider '{provider}' failed: {message}")]
    Provider {
        /// View type of the failing provider.
        provider: String,
        /// Provider-supplied failure description.
        message: String,
    },
}

/// Result type alias using chanbuf's Error.
pub type Result<T> = std::result::Result<T, Error>;
