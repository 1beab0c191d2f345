pub mod meminfo;
pub mod telemetry;

pub use meminfo::physical_mem;
pub use telemetry::init_tracing;
