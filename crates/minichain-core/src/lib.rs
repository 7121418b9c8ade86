pub mod codec;
pub mod constants;
pub mod pow;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::codec::CodecError;
use crate::constants::{BLOCK_VERSION, HASH_SIZE, MAX_NONCE};

pub type Hash = [u8; HASH_SIZE];

/// SHA-256 of `data` as a fixed 32-byte array.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest[..]);
    out
}

/// Hashing contract the block model consumes from the transaction layer.
///
/// The block model never looks inside a transaction; it only needs a digest
/// per transaction and a digest of the ordered sequence. Signing and
/// validation live with the implementor.
pub trait TxHash: Sized {
    /// Digest of this transaction alone.
    fn hash(&self) -> Hash;

    /// Digest of an ordered transaction sequence; becomes the header's
    /// merkle root. Reordering the sequence must change the result.
    fn sequence_hash(txs: &[Self]) -> Hash;
}

/// SHA-256 over the concatenated per-transaction digests, in sequence order.
/// No separators and no tree structure, so swapping two transactions changes
/// the result. Standalone so the surrounding system can wire it in as its
/// sequence digest or keep its own.
pub fn flat_sequence_hash<T: TxHash>(txs: &[T]) -> Hash {
    let mut joined = Vec::with_capacity(txs.len() * HASH_SIZE);
    for tx in txs {
        joined.extend_from_slice(&tx.hash());
    }
    sha256(&joined)
}

/// Default transaction record. Stands in for a full transaction layer when
/// the crate is used on its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: u64,
    pub timestamp: u64,
}

impl TxHash for Transaction {
    fn hash(&self) -> Hash {
        sha256(&serde_json::to_vec(self).expect("transaction encodes to JSON"))
    }

    fn sequence_hash(txs: &[Self]) -> Hash {
        flat_sequence_hash(txs)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u64,
    pub prev_block_hash: Hash,
    pub merkle_root: Hash,
    pub timestamp: u64,
    /// Difficulty recorded at construction. Informational: proof-of-work
    /// operations take the difficulty as an explicit parameter and never
    /// read it back out of the header.
    pub bits: u32,
    /// Zero until mining assigns it, then never rewritten.
    pub nonce: u64,
}

impl BlockHeader {
    pub fn new<T: TxHash>(txs: &[T], prev_block_hash: Hash, bits: u32) -> Self {
        Self {
            version: BLOCK_VERSION,
            prev_block_hash,
            merkle_root: T::sequence_hash(txs),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("time went backwards")
                .as_secs(),
            bits,
            nonce: 0,
        }
    }
}

/// Ordered transaction sequence of one block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockBody<T> {
    pub transactions: Vec<T>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block<T> {
    pub header: BlockHeader,
    pub body: BlockBody<T>,
}

impl<T: TxHash> Block<T> {
    /// Builds a block and mines it before returning, so the result passes
    /// validation at `bits`. If the nonce space is exhausted the nonce stays
    /// zero and the block simply fails validation; no practical difficulty
    /// gets near that.
    pub fn new(transactions: Vec<T>, prev_block_hash: Hash, bits: u32) -> Self {
        let header = BlockHeader::new(&transactions, prev_block_hash, bits);
        let body = BlockBody { transactions };
        let mut block = Block { header, body };
        if let Some((nonce, _)) = pow::mine(&block.header, bits, MAX_NONCE) {
            block.set_nonce(nonce);
        }
        block
    }

    /// The first block of a chain: a single coinbase transaction on an
    /// all-zero previous hash. The zero hash is the only genesis marker.
    pub fn genesis(coinbase: T, bits: u32) -> Self {
        Self::new(vec![coinbase], [0u8; HASH_SIZE], bits)
    }
}

impl<T> Block<T> {
    pub fn set_nonce(&mut self, nonce: u64) {
        self.header.nonce = nonce;
    }

    pub fn prev_hash(&self) -> Hash {
        self.header.prev_block_hash
    }

    pub fn transactions(&self) -> &[T] {
        &self.body.transactions
    }
}

impl<T: Serialize> Block<T> {
    /// Content hash: SHA-256 over the full serialized block, header and body
    /// together. This is the block's identity for chain linkage, so changing
    /// any transaction changes the hash even where `pow::validate` (which
    /// only sees header fields) would not notice.
    pub fn hash(&self) -> Result<Hash, CodecError> {
        Ok(sha256(&codec::serialize_block(self)?))
    }
}
