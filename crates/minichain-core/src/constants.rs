pub const HASH_SIZE: usize = 32;
pub const BLOCK_VERSION: u64 = 1;

/// Default difficulty: a mined digest must fall below `2^(256 - bits)`, so
/// at 8 its leading byte is zero and a block takes a few hundred attempts.
pub const POW_TARGET_BITS: u32 = 8;

/// Upper bound of the nonce search space, exclusive: the positive signed
/// 64-bit range.
pub const MAX_NONCE: u64 = i64::MAX as u64;
