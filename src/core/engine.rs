//! Policy engines answering pool lookups.

use std::path::Path;

use crate::core::wire::{self, PoolConfigParams, ResolveRequestPoolParams};
use crate::core::{PoolConfig, ResolveResult, ResolverError, ResolverMode, DEFAULT_POOL_NAME};
use crate::infra::{EngineBridge, EngineHandle};

/// Source of pool resolutions and pool limits.
///
/// Implementations are read-only once built and may be called from any
/// number of threads at once.
pub trait PolicyEngine: Send + Sync {
    /// Which mode this engine serves.
    fn mode(&self) -> ResolverMode;

    /// Resolve the pool a user's request runs in.
    ///
    /// # Errors
    ///
    /// Engine-specific; the local engine never fails.
    fn resolve_request_pool(&self, params: &ResolveRequestPoolParams) -> Result<ResolveResult, ResolverError>;

    /// Look up a pool's admission limits.
    ///
    /// # Errors
    ///
    /// Engine-specific; the local engine never fails.
    fn get_pool_config(&self, params: &PoolConfigParams) -> Result<PoolConfig, ResolverError>;
}

/// Serves a single pool with static limits.
#[derive(Debug, Clone)]
pub struct LocalDefaultEngine {
    limits: PoolConfig,
}

impl LocalDefaultEngine {
    /// Create an engine answering every lookup with `limits`.
    #[must_use]
    pub const fn new(limits: PoolConfig) -> Self {
        Self { limits }
    }
}

impl PolicyEngine for LocalDefaultEngine {
    fn mode(&self) -> ResolverMode {
        ResolverMode::DefaultOnly
    }

    fn resolve_request_pool(&self, _params: &ResolveRequestPoolParams) -> Result<ResolveResult, ResolverError> {
        Ok(ResolveResult {
            resolved_pool: DEFAULT_POOL_NAME.to_string(),
            has_access: true,
        })
    }

    fn get_pool_config(&self, _params: &PoolConfigParams) -> Result<PoolConfig, ResolverError> {
        Ok(self.limits)
    }
}

/// Forwards lookups to a started external engine.
pub struct DelegatedEngine {
    handle: Box<dyn EngineHandle>,
}

impl DelegatedEngine {
    /// Bind, construct and start the engine behind `bridge`.
    ///
    /// # Errors
    ///
    /// [`ResolverError::EngineBinding`] if an entry point is missing,
    /// [`ResolverError::EngineStartup`] if construction or `start` raises.
    pub fn connect(bridge: &dyn EngineBridge, allocation_path: &Path, site_path: &Path) -> Result<Self, ResolverError> {
        let handle = bridge
            .connect(allocation_path, site_path)
            .map_err(crate::infra::BridgeFault::into_startup_error)?;
        tracing::info!(
            allocation_path = %allocation_path.display(),
            site_path = %site_path.display(),
            "policy engine bound"
        );
        handle
            .start()
            .map_err(crate::infra::BridgeFault::into_startup_error)?;
        tracing::info!("policy engine started");
        Ok(Self::from_started(handle))
    }

    /// Wrap a handle whose `start` has already succeeded.
    #[must_use]
    pub fn from_started(handle: Box<dyn EngineHandle>) -> Self {
        Self { handle }
    }
}

impl PolicyEngine for DelegatedEngine {
    fn mode(&self) -> ResolverMode {
        ResolverMode::Delegated
    }

    fn resolve_request_pool(&self, params: &ResolveRequestPoolParams) -> Result<ResolveResult, ResolverError> {
        let request = wire::encode(params)?;
        let response = self.handle.resolve_request_pool(&request).map_err(|fault| {
            tracing::warn!(user = %params.user, pool = %params.requested_pool, %fault, "resolve request pool failed");
            fault.into_call_error()
        })?;
        wire::decode(&response)
    }

    fn get_pool_config(&self, params: &PoolConfigParams) -> Result<PoolConfig, ResolverError> {
        let request = wire::encode(params)?;
        let response = self.handle.get_pool_config(&request).map_err(|fault| {
            tracing::warn!(pool = %params.pool, %fault, "get pool config failed");
            fault.into_call_error()
        })?;
        wire::decode(&response)
    }
}
