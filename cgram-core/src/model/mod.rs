//! Frequency model.
//!
//! This module provides the n-gram tables built from tokenized text:
//! - Character 3-gram counts over arbitrary strings (`Char3Grams`)
//! - Token counts (`Unigrams`)
//! - Token pair counts, nested per head token (`Bigrams`)
//! - Token triple counts, nested per head token (`Trigrams`)
//! - A shared codec with a JSON and a compact binary encoding (`Persist`)
//!
//! All tables are plain values: they are built independently (per document,
//! per worker) and combined with `merge`, which is commutative and
//! associative.

/// Generic string-keyed count table behind every level.
pub mod count_map;

/// Shared (de)serialization of the frequency tables.
pub mod codec;

/// Character 3-gram extraction and counts.
pub mod char3grams;

/// Token counts.
pub mod unigrams;

/// Token pair counts.
pub mod bigrams;

/// Token triple counts.
pub mod trigrams;

pub use bigrams::Bigrams;
pub use char3grams::{Char3GramIter, Char3Grams, char3grams, each_char3gram};
pub use codec::{Encoding, Persist, decode, encode};
pub use count_map::{Count, CountMap};
pub use trigrams::Trigrams;
pub use unigrams::Unigrams;
