//! Resolver configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ResolverError, ResolverMode};

/// Path to the fair-scheduler allocation file.
pub const ENV_ALLOCATION_PATH: &str = "FAIR_SCHEDULER_ALLOCATION_PATH";
/// Path to the Llama site configuration file.
pub const ENV_SITE_PATH: &str = "LLAMA_SITE_PATH";
/// Default pool concurrent request limit.
pub const ENV_MAX_REQUESTS: &str = "DEFAULT_POOL_MAX_REQUESTS";
/// Default pool memory limit spec.
pub const ENV_MEM_LIMIT: &str = "DEFAULT_POOL_MEM_LIMIT";
/// Default pool queue limit.
pub const ENV_MAX_QUEUED: &str = "DEFAULT_POOL_MAX_QUEUED";
/// Program launched as the external policy engine.
pub const ENV_ENGINE_COMMAND: &str = "POLICY_ENGINE_COMMAND";

/// Startup configuration of a [`crate::core::PoolResolver`].
///
/// The `default_pool_*` values only apply when both file paths are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fair-scheduler allocation file (`fair-scheduler.xml`). Empty when unset.
    pub fair_scheduler_allocation_path: String,
    /// Llama site file (`llama-site.xml`). Requires the allocation path.
    pub llama_site_path: String,
    /// Concurrent requests allowed before queueing. Negative means no limit.
    pub default_pool_max_requests: i64,
    /// Memory limit spec for all running requests, see
    /// [`crate::core::mem_spec::parse_mem_spec`]. Empty means no limit.
    pub default_pool_mem_limit: String,
    /// Requests allowed to queue before rejecting. Zero or negative rejects
    /// as soon as the concurrency limit is reached.
    pub default_pool_max_queued: i64,
    /// Program speaking the engine protocol on stdin/stdout.
    pub engine_command: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fair_scheduler_allocation_path: String::new(),
            llama_site_path: String::new(),
            default_pool_max_requests: -1,
            default_pool_mem_limit: String::new(),
            default_pool_max_queued: 0,
            engine_command: None,
        }
    }
}

impl ResolverConfig {
    /// Mode a resolver built from this configuration runs in.
    #[must_use]
    pub fn mode(&self) -> ResolverMode {
        if self.fair_scheduler_allocation_path.is_empty() && self.llama_site_path.is_empty() {
            ResolverMode::DefaultOnly
        } else {
            ResolverMode::Delegated
        }
    }

    /// Allocation file path.
    #[must_use]
    pub fn allocation_path(&self) -> &Path {
        Path::new(&self.fair_scheduler_allocation_path)
    }

    /// Site file path.
    #[must_use]
    pub fn site_path(&self) -> &Path {
        Path::new(&self.llama_site_path)
    }

    /// Check the configuration is consistent.
    ///
    /// # Errors
    ///
    /// [`ResolverError::Config`] if the site path is set without an
    /// allocation path.
    pub fn validate(&self) -> Result<(), ResolverError> {
        if !self.llama_site_path.is_empty() && self.fair_scheduler_allocation_path.is_empty() {
            return Err(ResolverError::Config(
                "llama_site_path is set but fair_scheduler_allocation_path is not".into(),
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// [`ResolverError::Config`] on malformed JSON or inconsistent values.
    pub fn from_json_str(input: &str) -> Result<Self, ResolverError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| ResolverError::Config(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading a `.env`
    /// file first when one exists.
    ///
    /// # Errors
    ///
    /// [`ResolverError::Config`] on non-integer limits or inconsistent values.
    pub fn from_env() -> Result<Self, ResolverError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ResolverConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ResolverError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let int = |key: &str, default: i64| -> Result<i64, ResolverError> {
            lookup(key).map_or(Ok(default), |raw| {
                raw.trim()
                    .parse()
                    .map_err(|e| ResolverError::Config(format!("{key}='{raw}': {e}")))
            })
        };

        let cfg = Self {
            fair_scheduler_allocation_path: lookup(ENV_ALLOCATION_PATH).unwrap_or_default(),
            llama_site_path: lookup(ENV_SITE_PATH).unwrap_or_default(),
            default_pool_max_requests: int(ENV_MAX_REQUESTS, defaults.default_pool_max_requests)?,
            default_pool_mem_limit: lookup(ENV_MEM_LIMIT).unwrap_or_default(),
            default_pool_max_queued: int(ENV_MAX_QUEUED, defaults.default_pool_max_queued)?,
            engine_command: lookup(ENV_ENGINE_COMMAND).filter(|cmd| !cmd.is_empty()),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
