//! Error type shared by the tokenizer, the frequency model and the codec.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = CorpusError> = std::result::Result<T, E>;

/// Failures surfaced by the crate.
///
/// Absent keys are never reported through this type: lookups on missing
/// n-grams answer zero instead.
#[derive(Debug, Error)]
pub enum CorpusError {
	/// The text source failed or produced bytes that are not valid UTF-8.
	#[error("malformed input: {0}")]
	MalformedInput(String),
	/// A persisted payload does not match the expected schema.
	#[error("decode error: {0}")]
	Decode(String),
	/// A structure could not be serialized.
	#[error("encode error: {0}")]
	Encode(String),
	/// Filesystem error with the offending path, when known.
	#[error("io error while processing {path:?}: {source}")]
	Io {
		source: std::io::Error,
		path: Option<PathBuf>,
	},
	/// A build configuration failed validation.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

impl CorpusError {
	/// Wraps an IO error, attaching the path it happened on.
	pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
		Self::Io { source, path }
	}
}

impl From<serde_json::Error> for CorpusError {
	fn from(err: serde_json::Error) -> Self {
		if err.is_io() {
			Self::MalformedInput(err.to_string())
		} else {
			Self::Decode(err.to_string())
		}
	}
}

impl From<postcard::Error> for CorpusError {
	fn from(err: postcard::Error) -> Self {
		match err {
			postcard::Error::SerializeBufferFull
			| postcard::Error::SerializeSeqLengthUnknown
			| postcard::Error::SerdeSerCustom => Self::Encode(err.to_string()),
			_ => Self::Decode(err.to_string()),
		}
	}
}
