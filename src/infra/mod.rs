//! Foreign-call bridges to external policy engines.

pub mod bridge;
pub mod process;

pub use bridge::{BridgeFault, EngineBridge, EngineHandle, REQUIRED_ENTRY_POINTS};
pub use process::{EngineReply, EngineRequest, FramedEngine, ProcessBridge};
