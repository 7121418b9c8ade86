//! Block wire encoding.
//!
//! bincode in both directions, the same encoding whether a block crosses a
//! process boundary or sits in a store. An encoding failure is
//! unrecoverable: callers propagate the error and never continue with
//! partial data.

use crate::{Block, BlockHeader};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("block encoding failed: {0}")]
    Encode(#[source] bincode::Error),
    #[error("block decoding failed: {0}")]
    Decode(#[source] bincode::Error),
}

/// Full self-describing encoding of a block, header and body together.
pub fn serialize_block<T: Serialize>(block: &Block<T>) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(block).map_err(CodecError::Encode)
}

/// Header-only encoding, for header-relay scenarios. Not the mining input:
/// proof-of-work hashes the fixed-width layout from [`crate::pow::mining_payload`].
pub fn serialize_header(header: &BlockHeader) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(header).map_err(CodecError::Encode)
}

/// Inverse of [`serialize_block`].
pub fn deserialize_block<T: DeserializeOwned>(bytes: &[u8]) -> Result<Block<T>, CodecError> {
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}

/// Inverse of [`serialize_header`].
pub fn deserialize_header(bytes: &[u8]) -> Result<BlockHeader, CodecError> {
    bincode::deserialize(bytes).map_err(CodecError::Decode)
}
