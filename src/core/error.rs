//! Error types for pool resolution.

use thiserror::Error;

/// Errors produced while building a resolver or serving a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// The default pool memory limit could not be parsed.
    #[error("invalid memory limit spec: '{0}'")]
    InvalidMemSpec(String),
    /// Resolver configuration is inconsistent or unreadable.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A required engine entry point could not be bound.
    #[error("engine binding failed: {0}")]
    EngineBinding(String),
    /// The engine raised while being constructed or started.
    #[error("engine startup failed: {0}")]
    EngineStartup(String),
    /// The engine raised while serving a request.
    #[error("engine call failed: {0}")]
    EngineCall(String),
    /// A request or response could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ResolverError {
    /// Whether the error can only occur during startup and leaves the resolver
    /// unable to serve any request.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidMemSpec(_) | Self::Config(_) | Self::EngineBinding(_) | Self::EngineStartup(_)
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
