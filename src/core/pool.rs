//! Pool resolution results and admission limits.

use serde::{Deserialize, Serialize};

use crate::core::mem_spec::UNLIMITED;

/// Pool every request lands in when no configuration files are supplied.
pub const DEFAULT_POOL_NAME: &str = "default-pool";

/// Source of pool answers, fixed when the resolver is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverMode {
    /// Static defaults, single pool.
    DefaultOnly,
    /// Forwarded to an external policy engine.
    Delegated,
}

/// Outcome of resolving a requested pool for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResult {
    /// Pool the request will run in.
    pub resolved_pool: String,
    /// Whether the user may submit to that pool.
    pub has_access: bool,
}

/// Admission-control limits of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum concurrently running requests. Negative means unlimited.
    pub max_requests: i64,
    /// Maximum queued requests. Zero or negative means nothing is queued.
    pub max_queued: i64,
    /// Memory limit in bytes for all running requests. -1 means unlimited.
    pub mem_limit: i64,
}

impl PoolConfig {
    /// Whether the pool caps concurrent requests.
    #[must_use]
    pub const fn limits_requests(&self) -> bool {
        self.max_requests >= 0
    }

    /// Whether requests may wait in a queue once the pool is saturated.
    #[must_use]
    pub const fn allows_queueing(&self) -> bool {
        self.max_queued > 0
    }

    /// Memory limit in bytes, `None` when unlimited.
    #[must_use]
    pub fn mem_limit_bytes(&self) -> Option<u64> {
        if self.mem_limit == UNLIMITED {
            return None;
        }
        u64::try_from(self.mem_limit).ok()
    }
}
