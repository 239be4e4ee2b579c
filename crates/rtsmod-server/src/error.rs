//! Error types for the server binary.

/// Top-level error for the server binary.
///
/// Wraps a startup failure so `main` can propagate with `?`. Nothing that
/// happens after startup is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: rtsmod_core::config::ConfigError,
    },
}
