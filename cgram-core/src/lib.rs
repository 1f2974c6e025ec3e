//! Tokenizer and n-gram frequency model for historical text corpora.
//!
//! This crate provides the statistics layer of a corpus pipeline:
//! - A single-pass run tokenizer with two character-class schemes
//! - Token type classification and token type filters
//! - Character 3-gram counts and nested token unigram/bigram/trigram counts
//! - Commutative merging of tables built by independent workers
//! - A JSON and a compact binary encoding for every table
//!
//! Container formats (XML corpora, archives, ...) stay outside: the crate
//! only consumes UTF-8 chunks through [`io::TextSource`].
//!
//! ```
//! use cgram_core::model::Trigrams;
//! use cgram_core::text::Tokenizer;
//!
//! let tokens = Tokenizer::default().split("Leib-Medicus Der Studenten");
//! let trigrams = Trigrams::from_tokens(&tokens);
//! assert_eq!(trigrams.get("Leib").get("-").get("Medicus"), 1);
//! assert_eq!(trigrams.get("nope").get("nope").get("nope"), 0);
//! ```

/// Build settings (`BuildConfig`, `Level`).
pub mod config;

/// Error type and result alias.
pub mod error;

/// Text sources and file helpers.
pub mod io;

/// Frequency tables and their codec.
pub mod model;

/// Chunk → table pipeline, sequential or spread over worker threads.
pub mod pipeline;

/// Character classification and tokenization.
pub mod text;

pub use config::{BuildConfig, Level};
pub use error::{CorpusError, Result};
pub use model::{Bigrams, Char3Grams, Encoding, Persist, Trigrams, Unigrams};
pub use pipeline::{Pipeline, Statistics};
pub use text::{Scheme, Token, TokenType, TokenTypes, Tokenizer};
