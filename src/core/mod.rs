//! Pool resolution, policy engines, wire format and errors.

pub mod engine;
pub mod error;
pub mod mem_spec;
pub mod pool;
pub mod resolver;
pub mod wire;

pub use engine::{DelegatedEngine, LocalDefaultEngine, PolicyEngine};
pub use error::{AppResult, ResolverError};
pub use mem_spec::{default_mem_limit, parse_mem_spec, MemSpec, UNLIMITED};
pub use pool::{PoolConfig, ResolveResult, ResolverMode, DEFAULT_POOL_NAME};
pub use resolver::PoolResolver;
pub use wire::{PoolConfigParams, ResolveRequestPoolParams};
