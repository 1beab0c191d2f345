//! Builders to construct a resolver from configuration.

pub mod resolver_builder;

pub use resolver_builder::ResolverBuilder;
