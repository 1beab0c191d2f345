//! The foreign-call boundary to an external policy engine.
//!
//! An engine lives in another runtime and exports four entry points:
//! a two-path constructor, a `start` initializer, and two byte-in/byte-out
//! lookups. A bridge binds those entry points and hands back a handle to the
//! constructed engine instance.

use std::path::Path;

use thiserror::Error;

use crate::core::ResolverError;

/// Entry point constructing an engine from the allocation and site paths.
pub const CONSTRUCT: &str = "construct";
/// Entry point initializing a constructed engine.
pub const START: &str = "start";
/// Entry point resolving a requested pool.
pub const RESOLVE_REQUEST_POOL: &str = "resolveRequestPool";
/// Entry point returning a pool's limits.
pub const GET_POOL_CONFIG: &str = "getPoolConfig";

/// Entry points an engine must export to be usable.
pub const REQUIRED_ENTRY_POINTS: [&str; 4] = [CONSTRUCT, START, RESOLVE_REQUEST_POOL, GET_POOL_CONFIG];

/// Failure raised on the far side of, or while crossing, the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeFault {
    /// The engine runtime could not be reached at all.
    #[error("engine unavailable: {0}")]
    Unavailable(String),
    /// A required entry point is not exported by the engine.
    #[error("missing entry point `{0}`")]
    MissingEntryPoint(String),
    /// The engine raised an exception.
    #[error("engine exception: {0}")]
    Exception(String),
    /// The boundary itself failed (I/O, protocol).
    #[error("transport failure: {0}")]
    Transport(String),
}

impl BridgeFault {
    /// Classify a fault raised while binding, constructing or starting.
    #[must_use]
    pub fn into_startup_error(self) -> ResolverError {
        match self {
            Self::Unavailable(_) | Self::MissingEntryPoint(_) => ResolverError::EngineBinding(self.to_string()),
            Self::Exception(_) | Self::Transport(_) => ResolverError::EngineStartup(self.to_string()),
        }
    }

    /// Classify a fault raised while serving a request.
    #[must_use]
    pub fn into_call_error(self) -> ResolverError {
        ResolverError::EngineCall(self.to_string())
    }
}

/// Binds an external engine and constructs an instance of it.
pub trait EngineBridge: Send + Sync {
    /// Bind every entry point in [`REQUIRED_ENTRY_POINTS`] and construct the
    /// engine over the two configuration paths. The instance is not started.
    ///
    /// # Errors
    ///
    /// [`BridgeFault::Unavailable`] or [`BridgeFault::MissingEntryPoint`] when
    /// binding fails, any other fault when construction raises.
    fn connect(&self, allocation_path: &Path, site_path: &Path) -> Result<Box<dyn EngineHandle>, BridgeFault>;
}

/// Long-lived handle to a constructed engine instance.
///
/// Implementations serialize access internally if their transport cannot be
/// shared between threads.
pub trait EngineHandle: Send + Sync {
    /// Initialize the engine. Called exactly once, before any lookup.
    ///
    /// # Errors
    ///
    /// Any fault raised by the engine.
    fn start(&self) -> Result<(), BridgeFault>;

    /// Invoke the pool-resolution entry point.
    ///
    /// # Errors
    ///
    /// Any fault raised by the engine or the transport.
    fn resolve_request_pool(&self, request: &[u8]) -> Result<Vec<u8>, BridgeFault>;

    /// Invoke the pool-config entry point.
    ///
    /// # Errors
    ///
    /// Any fault raised by the engine or the transport.
    fn get_pool_config(&self, request: &[u8]) -> Result<Vec<u8>, BridgeFault>;
}
