//! Proof-of-work search and validation.
//!
//! Difficulty is an explicit parameter of every operation here. The `bits`
//! field a header carries records what it was mined with and is never read
//! back during validation.

use crate::constants::{HASH_SIZE, MAX_NONCE};
use crate::{sha256, Block, BlockHeader, Hash};
use tracing::info;

/// Byte length of the canonical mining payload: four fixed-width integers
/// and two digests.
pub const MINING_PAYLOAD_LEN: usize = 4 * 8 + 2 * HASH_SIZE;

/// The threshold a header digest must fall below: `2^(256 - bits)` as a
/// 32-byte big-endian integer. Larger `bits` means a smaller target and a
/// harder puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target([u8; HASH_SIZE]);

impl Target {
    /// Valid for `bits` in `1..=256`.
    pub fn from_bits(bits: u32) -> Self {
        debug_assert!((1..=256).contains(&bits), "difficulty bits out of range");
        let mut raw = [0u8; HASH_SIZE];
        // Set bit `256 - bits`, counting from the least significant end.
        let bit = 256 - bits;
        raw[31 - (bit / 8) as usize] = 1 << (bit % 8);
        Target(raw)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Big-endian comparison: the digest read as a 256-bit integer must be
    /// strictly below the target.
    pub fn is_met_by(&self, digest: &Hash) -> bool {
        *digest < self.0
    }
}

/// Canonical byte payload for mining and validation: the fixed-width
/// big-endian concatenation of the header fields with the difficulty and
/// nonce supplied by the caller. Deliberately narrower than the codec
/// encoding so the hashed bytes carry no variable-length framing.
pub fn mining_payload(header: &BlockHeader, bits: u32, nonce: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MINING_PAYLOAD_LEN);
    bytes.extend_from_slice(&header.version.to_be_bytes());
    bytes.extend_from_slice(&header.prev_block_hash);
    bytes.extend_from_slice(&header.merkle_root);
    bytes.extend_from_slice(&header.timestamp.to_be_bytes());
    bytes.extend_from_slice(&u64::from(bits).to_be_bytes());
    bytes.extend_from_slice(&nonce.to_be_bytes());
    bytes
}

/// Sequential brute-force search over `0..max_nonce`. Returns the first
/// nonce whose payload digest falls below the target for `bits`, together
/// with that digest, or `None` once the bound is exhausted.
///
/// Single-threaded and uncancellable; a caller that wants a background or
/// time-bounded search wraps this itself.
pub fn mine(header: &BlockHeader, bits: u32, max_nonce: u64) -> Option<(u64, Hash)> {
    let target = Target::from_bits(bits);
    for nonce in 0..max_nonce {
        let digest = sha256(&mining_payload(header, bits, nonce));
        if target.is_met_by(&digest) {
            return Some((nonce, digest));
        }
    }
    None
}

/// Checks the nonce recorded in `header` against the target for `bits`.
/// Pure predicate: a tampered or unmined header shows up as `false`, never
/// as an error.
pub fn validate(header: &BlockHeader, bits: u32) -> bool {
    let digest = sha256(&mining_payload(header, bits, header.nonce));
    Target::from_bits(bits).is_met_by(&digest)
}

/// Engine bound to one block and one precomputed target.
pub struct ProofOfWork<'a, T> {
    block: &'a Block<T>,
    bits: u32,
    target: Target,
}

impl<'a, T> ProofOfWork<'a, T> {
    pub fn new(block: &'a Block<T>, bits: u32) -> Self {
        Self {
            block,
            bits,
            target: Target::from_bits(bits),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Runs the search over the full nonce space.
    pub fn run(&self) -> Option<(u64, Hash)> {
        let found = mine(&self.block.header, self.bits, MAX_NONCE);
        if let Some((nonce, digest)) = &found {
            info!("mined block with nonce {} and hash {}", nonce, hex::encode(digest));
        }
        found
    }

    /// Checks the block's recorded nonce against this engine's target.
    pub fn validate(&self) -> bool {
        let header = &self.block.header;
        let digest = sha256(&mining_payload(header, self.bits, header.nonce));
        self.target.is_met_by(&digest)
    }
}
