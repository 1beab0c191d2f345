//! Request/response pairs exchanged with an external policy engine.
//!
//! Everything crossing the engine boundary is encoded with postcard.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::ResolverError;

/// Request for [`crate::core::PolicyEngine::resolve_request_pool`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequestPoolParams {
    /// Submitting user.
    pub user: String,
    /// Pool named by the request, possibly empty.
    pub requested_pool: String,
}

/// Request for [`crate::core::PolicyEngine::get_pool_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfigParams {
    /// Pool to look up.
    pub pool: String,
}

/// Encode a message for the engine boundary.
///
/// # Errors
///
/// Returns [`ResolverError::Serialization`] if the message cannot be encoded.
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ResolverError> {
    postcard::to_stdvec(message).map_err(|e| ResolverError::Serialization(format!("encode: {e}")))
}

/// Decode a message received from the engine boundary.
///
/// # Errors
///
/// Returns [`ResolverError::Serialization`] if the bytes are not a valid `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ResolverError> {
    postcard::from_bytes(bytes).map_err(|e| ResolverError::Serialization(format!("decode: {e}")))
}
