//! # Request Pool Resolver
//!
//! Resolves which pool a request runs in and which admission limits apply to
//! that pool.
//!
//! The resolver works in one of two modes, fixed when it is built:
//!
//! - **Default-only**: no allocation or site configuration is supplied. Every
//!   request lands in [`core::DEFAULT_POOL_NAME`] with access granted, and the
//!   pool limits come from static configuration.
//! - **Delegated**: configuration paths are supplied and every lookup is
//!   forwarded to an external policy engine (a fair-scheduler style allocation
//!   loader running in another runtime) through an [`infra::EngineBridge`].
//!
//! The resolver does not enforce the limits it returns. That is the job of the
//! admission-control layer that calls it.
//!
//! ## Default-only mode
//!
//! ```rust,ignore
//! use request_pool_resolver::config::ResolverConfig;
//! use request_pool_resolver::core::PoolResolver;
//!
//! let cfg = ResolverConfig {
//!     default_pool_max_requests: 10,
//!     default_pool_max_queued: 5,
//!     default_pool_mem_limit: "1G".into(),
//!     ..ResolverConfig::default()
//! };
//! let resolver = PoolResolver::new(&cfg, None)?;
//!
//! let resolved = resolver.resolve_request_pool("root.team", "alice")?;
//! assert_eq!(resolved.resolved_pool, "default-pool");
//!
//! let limits = resolver.get_pool_config(&resolved.resolved_pool)?;
//! assert_eq!(limits.mem_limit, 1 << 30);
//! ```
//!
//! ## Delegated mode
//!
//! ```rust,ignore
//! use request_pool_resolver::builders::ResolverBuilder;
//! use request_pool_resolver::infra::ProcessBridge;
//!
//! let resolver = ResolverBuilder::new(cfg)
//!     .with_bridge(ProcessBridge::new("policy-engine"))
//!     .build()?;
//! let limits = resolver.get_pool_config("root.etl")?;
//! ```
//!
//! For complete examples, see:
//! - `tests/default_pool_test.rs` - default-only behaviour
//! - `tests/delegated_engine_test.rs` - delegated mode against a mock engine

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Pool resolution, policy engines, wire format and errors.
pub mod core;
/// Resolver configuration loaded from the environment or JSON.
pub mod config;
/// Builders to construct a resolver from configuration.
pub mod builders;
/// Foreign-call bridges to external policy engines.
pub mod infra;
/// Async adapters over the blocking resolver.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
