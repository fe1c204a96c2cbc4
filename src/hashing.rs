//! Integrity hashing of acquired artifacts.
//!
//! Artifacts can be hundreds of gigabytes, so both digests are computed in a
//! single sequential read pass. The read block size is a multiple of the
//! 64-byte block shared by MD5 and SHA-1 and of the usual 4 KiB storage block,
//! so neither hasher has to re-buffer partial blocks.

pub mod integrity_hasher;

pub use integrity_hasher::{hash_file_path, DigestPair, IntegrityHasher};

/// Default read block size: five 4 KiB storage blocks.
pub const DEFAULT_BLOCK_SIZE: usize = 20480;

/// Every configured block size must be a multiple of this.
pub const BLOCK_ALIGNMENT: usize = 4096;
