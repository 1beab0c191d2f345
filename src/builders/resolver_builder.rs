//! Builder assembling a [`PoolResolver`] from configuration and a bridge.

use crate::config::ResolverConfig;
use crate::core::{PoolResolver, ResolverError, ResolverMode};
use crate::infra::{EngineBridge, ProcessBridge};
use crate::util::meminfo::physical_mem;

/// Collects the inputs of a [`PoolResolver`] and builds it.
pub struct ResolverBuilder {
    config: ResolverConfig,
    bridge: Option<Box<dyn EngineBridge>>,
    physical_mem: Option<u64>,
}

impl ResolverBuilder {
    /// Start from a configuration.
    #[must_use]
    pub const fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            bridge: None,
            physical_mem: None,
        }
    }

    /// Configuration the resolver will be built from.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Bridge used in delegated mode.
    #[must_use]
    pub fn with_bridge(mut self, bridge: impl EngineBridge + 'static) -> Self {
        self.bridge = Some(Box::new(bridge));
        self
    }

    /// Override the physical memory percentage limits are computed against.
    #[must_use]
    pub const fn with_physical_mem(mut self, bytes: u64) -> Self {
        self.physical_mem = Some(bytes);
        self
    }

    /// Build the resolver. In delegated mode with no explicit bridge, the
    /// configured `engine_command` is launched through a [`ProcessBridge`].
    ///
    /// # Errors
    ///
    /// Everything [`PoolResolver::new`] returns, plus
    /// [`ResolverError::Config`] for a blank engine command.
    pub fn build(self) -> Result<PoolResolver, ResolverError> {
        let bridge = match (self.bridge, &self.config.engine_command) {
            (Some(bridge), _) => Some(bridge),
            (None, Some(command)) if self.config.mode() == ResolverMode::Delegated => {
                let bridge = ProcessBridge::from_command_line(command)
                    .map_err(|e| ResolverError::Config(e.to_string()))?;
                Some(Box::new(bridge) as Box<dyn EngineBridge>)
            }
            (None, _) => None,
        };
        let mem_override = self.physical_mem;
        PoolResolver::build(&self.config, bridge.as_deref(), || mem_override.unwrap_or_else(physical_mem))
    }
}
