//! Tokenization of raw text.
//!
//! - Per code point classification (`classify`, `CharClass`)
//! - Run-based splitting under a configurable `Scheme` (`Tokenizer`)
//! - Tokens and their coarse type (`Token`, `TokenType`, `TokenTypes`)

/// Code point classes and the run-detection schemes built on them.
pub mod class;

/// Single-pass run splitter.
pub mod tokenizer;

/// Token values and token type filters.
pub mod token;

pub use class::{CharClass, Scheme, classify};
pub use token::{Token, TokenType, TokenTypes};
pub use tokenizer::{Tokenizer, Tokens};
