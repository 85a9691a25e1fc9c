//! Recursive Length Prefix (RLP) encoding, as used by the Ethereum state trie.
//!
//! This crate only encodes. The trie hasher never needs to read RLP back,
//! so there is no `decode` module and no fallible `Result` anywhere here:
//! encoding a well-formed Rust value into RLP cannot fail.
//!
//! ## Modules
//!
//! - [`encode`]: the `RLPEncode` trait, its built-in implementations, and the
//!   `encode_length`/`list_length`/`bytes_length` size helpers
//! - [`structs`]: `Encoder` builder for encoding a fixed sequence of fields
//!   as an RLP list
//! - [`constants`]: RLP protocol constants (`RLP_NULL`, `RLP_EMPTY_LIST`)

pub mod constants;
pub mod encode;
pub mod structs;

pub use constants::{RLP_EMPTY_LIST, RLP_NULL};
pub use encode::{encode, RLPEncode};
