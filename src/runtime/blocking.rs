//! Tokio adapter keeping foreign calls off the async executor.

use tokio::task::JoinError;

use crate::core::{PoolConfig, PoolResolver, ResolveResult, ResolverError, ResolverMode};

/// Async front for a [`PoolResolver`].
///
/// In delegated mode every lookup blocks on the external engine, so it runs on
/// tokio's blocking pool. Default-only lookups are answered inline.
#[derive(Debug, Clone)]
pub struct AsyncPoolResolver {
    inner: PoolResolver,
}

impl AsyncPoolResolver {
    /// Wrap a resolver.
    #[must_use]
    pub const fn new(inner: PoolResolver) -> Self {
        Self { inner }
    }

    /// The wrapped resolver.
    #[must_use]
    pub const fn inner(&self) -> &PoolResolver {
        &self.inner
    }

    /// Async [`PoolResolver::resolve_request_pool`].
    ///
    /// # Errors
    ///
    /// As the blocking call, plus [`ResolverError::EngineCall`] if the
    /// blocking task panicked or was cancelled.
    pub async fn resolve_request_pool(&self, pool: &str, user: &str) -> Result<ResolveResult, ResolverError> {
        if self.inner.mode() == ResolverMode::DefaultOnly {
            return self.inner.resolve_request_pool(pool, user);
        }
        let inner = self.inner.clone();
        let (pool, user) = (pool.to_string(), user.to_string());
        tokio::task::spawn_blocking(move || inner.resolve_request_pool(&pool, &user))
            .await
            .map_err(join_failed)?
    }

    /// Async [`PoolResolver::get_pool_config`].
    ///
    /// # Errors
    ///
    /// As the blocking call, plus [`ResolverError::EngineCall`] if the
    /// blocking task panicked or was cancelled.
    pub async fn get_pool_config(&self, pool: &str) -> Result<PoolConfig, ResolverError> {
        if self.inner.mode() == ResolverMode::DefaultOnly {
            return self.inner.get_pool_config(pool);
        }
        let inner = self.inner.clone();
        let pool = pool.to_string();
        tokio::task::spawn_blocking(move || inner.get_pool_config(&pool))
            .await
            .map_err(join_failed)?
    }
}

impl From<PoolResolver> for AsyncPoolResolver {
    fn from(inner: PoolResolver) -> Self {
        Self::new(inner)
    }
}

fn join_failed(err: JoinError) -> ResolverError {
    ResolverError::EngineCall(format!("blocking lookup did not complete: {err}"))
}
