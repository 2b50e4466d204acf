//! Error taxonomy for the burst-trie engine and its driver.
//!
//! The original implementation this engine was extracted from aborts
//! the process directly on out-of-memory or arena exhaustion. Idiomatic
//! Rust propagates these as typed errors instead, leaving the decision
//! to abort with the caller — the shipped binary still exits the same
//! way on these paths, but a library caller gets a `Result`.

use thiserror::Error;

/// Errors that can occur while inserting into or growing the trie.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The arena's hard cap on trie-node pages has been reached.
    #[error("trie arena exhausted: all {pages} pages are full")]
    ArenaExhausted { pages: usize },

    /// A key's remainder at some trie level exceeded the two-byte
    /// length prefix's maximum encodable length.
    #[error("key too long to pack: {len} bytes (max {max})", max = crate::length::MAX_LEN)]
    KeyTooLong { len: usize },

    /// Reserved for the (practically unreachable under Rust's default
    /// allocator, which aborts on OOM) allocation-failure path, kept
    /// for parity with the documented error taxonomy.
    #[error("allocation failed")]
    AllocationFailed,
}

/// Errors surfaced by the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("burst threshold {value} is out of range [{min}, {max}]")]
    ThresholdOutOfRange { value: u32, min: u32, max: u32 },

    #[error("file_count ({expected}) does not match the number of files given ({actual})")]
    FileCountMismatch { expected: usize, actual: usize },

    #[error("could not read input file {path}")]
    InputIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
