//! Resolver configuration loaded from the environment or JSON.

pub mod resolver;

pub use resolver::ResolverConfig;
