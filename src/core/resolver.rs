//! The process-wide pool resolver.

use std::fmt;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::core::engine::{DelegatedEngine, LocalDefaultEngine, PolicyEngine};
use crate::core::mem_spec::default_mem_limit;
use crate::core::wire::{PoolConfigParams, ResolveRequestPoolParams};
use crate::core::{PoolConfig, ResolveResult, ResolverError, ResolverMode};
use crate::infra::EngineBridge;
use crate::util::meminfo::physical_mem;

/// Resolves request pools and their limits.
///
/// Built once at startup and passed to whatever needs it. Cloning shares the
/// underlying engine; all methods take `&self` and are safe to call from many
/// threads.
#[derive(Clone)]
pub struct PoolResolver {
    engine: Arc<dyn PolicyEngine>,
}

impl fmt::Debug for PoolResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolResolver").field("mode", &self.mode()).finish()
    }
}

impl PoolResolver {
    /// Build a resolver from configuration.
    ///
    /// With both configuration paths empty the resolver serves the default pool
    /// and `bridge` is ignored. Otherwise the engine behind `bridge` is bound,
    /// constructed and started.
    ///
    /// # Errors
    ///
    /// Every error is fatal: the caller should log it and exit.
    /// - [`ResolverError::Config`] for inconsistent paths or a missing bridge.
    /// - [`ResolverError::InvalidMemSpec`] for an unparseable default memory limit.
    /// - [`ResolverError::EngineBinding`] / [`ResolverError::EngineStartup`]
    ///   when the engine cannot be brought up.
    pub fn new(cfg: &ResolverConfig, bridge: Option<&dyn EngineBridge>) -> Result<Self, ResolverError> {
        Self::build(cfg, bridge, physical_mem)
    }

    pub(crate) fn build<F>(
        cfg: &ResolverConfig,
        bridge: Option<&dyn EngineBridge>,
        physical_mem: F,
    ) -> Result<Self, ResolverError>
    where
        F: FnOnce() -> u64,
    {
        cfg.validate()?;
        let engine: Arc<dyn PolicyEngine> = match cfg.mode() {
            ResolverMode::DefaultOnly => {
                let mem_limit = default_mem_limit(&cfg.default_pool_mem_limit, physical_mem()).inspect_err(|_| {
                    tracing::error!(
                        spec = %cfg.default_pool_mem_limit,
                        "unable to parse default pool mem limit"
                    );
                })?;
                tracing::debug!(mem_limit, "default pool mem limit resolved");
                Arc::new(LocalDefaultEngine::new(PoolConfig {
                    max_requests: cfg.default_pool_max_requests,
                    max_queued: cfg.default_pool_max_queued,
                    mem_limit,
                }))
            }
            ResolverMode::Delegated => {
                let bridge = bridge.ok_or_else(|| {
                    ResolverError::Config("configuration paths are set but no engine bridge was supplied".into())
                })?;
                let engine = DelegatedEngine::connect(bridge, cfg.allocation_path(), cfg.site_path())
                    .inspect_err(|e| tracing::error!(error = %e, "policy engine startup failed"))?;
                Arc::new(engine)
            }
        };
        tracing::info!(mode = ?engine.mode(), "pool resolver ready");
        Ok(Self { engine })
    }

    /// Wrap an already-built engine.
    #[must_use]
    pub fn from_engine(engine: Arc<dyn PolicyEngine>) -> Self {
        Self { engine }
    }

    /// Mode fixed at construction.
    #[must_use]
    pub fn mode(&self) -> ResolverMode {
        self.engine.mode()
    }

    /// Resolve the pool `user`'s request for `pool` runs in, and whether the
    /// user may submit to it.
    ///
    /// # Errors
    ///
    /// In delegated mode, [`ResolverError::EngineCall`] or
    /// [`ResolverError::Serialization`]. Never fails in default-only mode.
    pub fn resolve_request_pool(&self, pool: &str, user: &str) -> Result<ResolveResult, ResolverError> {
        self.engine.resolve_request_pool(&ResolveRequestPoolParams {
            user: user.to_string(),
            requested_pool: pool.to_string(),
        })
    }

    /// Admission limits of `pool`.
    ///
    /// # Errors
    ///
    /// In delegated mode, [`ResolverError::EngineCall`] or
    /// [`ResolverError::Serialization`]. Never fails in default-only mode.
    pub fn get_pool_config(&self, pool: &str) -> Result<PoolConfig, ResolverError> {
        self.engine.get_pool_config(&PoolConfigParams {
            pool: pool.to_string(),
        })
    }
}
