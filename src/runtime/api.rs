//! Caller-facing lookup combining resolution and pool limits.

use serde::{Deserialize, Serialize};

use crate::core::{PoolConfig, ResolveResult, ResolverError};
use crate::runtime::AsyncPoolResolver;

/// Everything an admission layer needs to place one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolLookup {
    /// Pool named by the request.
    pub requested_pool: String,
    /// Submitting user.
    pub user: String,
    /// Where the request lands and whether it may.
    pub resolution: ResolveResult,
    /// Limits of the resolved pool; `None` when access was denied.
    pub config: Option<PoolConfig>,
}

/// Resolve `pool` for `user` and, if access is granted, fetch the resolved
/// pool's limits.
///
/// # Errors
///
/// The first error returned by either lookup.
pub async fn lookup(resolver: &AsyncPoolResolver, pool: &str, user: &str) -> Result<PoolLookup, ResolverError> {
    let resolution = resolver.resolve_request_pool(pool, user).await?;
    let config = if resolution.has_access {
        Some(resolver.get_pool_config(&resolution.resolved_pool).await?)
    } else {
        tracing::debug!(user, pool, resolved = %resolution.resolved_pool, "access denied");
        None
    };
    Ok(PoolLookup {
        requested_pool: pool.to_string(),
        user: user.to_string(),
        resolution,
        config,
    })
}
