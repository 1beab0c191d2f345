//! In-process stand-in for an external policy engine.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use request_pool_resolver::config::ResolverConfig;
use request_pool_resolver::core::wire::{decode, encode};
use request_pool_resolver::core::{PoolConfig, PoolConfigParams, ResolveRequestPoolParams, ResolveResult};
use request_pool_resolver::infra::{BridgeFault, EngineBridge, EngineHandle, REQUIRED_ENTRY_POINTS};

/// User the scripted engine denies everywhere.
pub const DENIED_USER: &str = "mallory";

/// Behaviour of the scripted engine.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Entry point left out of the export list.
    pub unexported: Option<&'static str>,
    /// Raise from the constructor.
    pub fail_construct: bool,
    /// Raise from `start`.
    pub fail_start: bool,
    /// Raise from every lookup.
    pub fail_calls: bool,
    /// Answer lookups with bytes that do not decode.
    pub garbage_responses: bool,
}

/// Calls observed by the scripted engine.
#[derive(Debug, Default)]
pub struct Observed {
    pub constructed_with: Mutex<Option<(PathBuf, PathBuf)>>,
    pub starts: AtomicUsize,
    pub calls: AtomicUsize,
}

/// Bridge whose engine places a user in `root.<user>` unless a pool is named,
/// denies [`DENIED_USER`], and sizes pools by name length.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBridge {
    pub script: Script,
    pub observed: Arc<Observed>,
}

impl ScriptedBridge {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            observed: Arc::default(),
        }
    }
}

struct ScriptedHandle {
    script: Script,
    observed: Arc<Observed>,
}

impl EngineBridge for ScriptedBridge {
    fn connect(&self, allocation_path: &Path, site_path: &Path) -> Result<Box<dyn EngineHandle>, BridgeFault> {
        if let Some(missing) = self.script.unexported {
            assert!(REQUIRED_ENTRY_POINTS.contains(&missing));
            return Err(BridgeFault::MissingEntryPoint(missing.to_string()));
        }
        if self.script.fail_construct {
            return Err(BridgeFault::Exception("allocation file not found".into()));
        }
        *self.observed.constructed_with.lock() = Some((allocation_path.to_path_buf(), site_path.to_path_buf()));
        Ok(Box::new(ScriptedHandle {
            script: self.script.clone(),
            observed: Arc::clone(&self.observed),
        }))
    }
}

impl ScriptedHandle {
    fn answer<F>(&self, respond: F) -> Result<Vec<u8>, BridgeFault>
    where
        F: FnOnce() -> Vec<u8>,
    {
        self.observed.calls.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_calls {
            return Err(BridgeFault::Exception("NullPointerException".into()));
        }
        if self.script.garbage_responses {
            return Ok(vec![0xff; 3]);
        }
        Ok(respond())
    }
}

impl EngineHandle for ScriptedHandle {
    fn start(&self) -> Result<(), BridgeFault> {
        self.observed.starts.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_start {
            return Err(BridgeFault::Exception("cannot watch allocation file".into()));
        }
        Ok(())
    }

    fn resolve_request_pool(&self, request: &[u8]) -> Result<Vec<u8>, BridgeFault> {
        let params: ResolveRequestPoolParams =
            decode(request).map_err(|e| BridgeFault::Exception(e.to_string()))?;
        self.answer(|| {
            let resolved_pool = if params.requested_pool.is_empty() {
                format!("root.{}", params.user)
            } else {
                params.requested_pool.clone()
            };
            encode(&ResolveResult {
                resolved_pool,
                has_access: params.user != DENIED_USER,
            })
            .unwrap()
        })
    }

    fn get_pool_config(&self, request: &[u8]) -> Result<Vec<u8>, BridgeFault> {
        let params: PoolConfigParams = decode(request).map_err(|e| BridgeFault::Exception(e.to_string()))?;
        self.answer(|| encode(&pool_config_for(&params.pool)).unwrap())
    }
}

/// Limits the scripted engine reports for `pool`.
pub fn pool_config_for(pool: &str) -> PoolConfig {
    let size = i64::try_from(pool.len()).unwrap();
    PoolConfig {
        max_requests: size,
        max_queued: size * 2,
        mem_limit: size << 20,
    }
}

/// Delegated-mode configuration.
pub fn delegated_config() -> ResolverConfig {
    ResolverConfig {
        fair_scheduler_allocation_path: "/etc/impala/fair-scheduler.xml".into(),
        llama_site_path: "/etc/impala/llama-site.xml".into(),
        ..ResolverConfig::default()
    }
}
