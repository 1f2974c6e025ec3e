//! Build configuration for the statistics pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};
use crate::model::Encoding;
use crate::text::{Scheme, TokenTypes};

/// Upper bound on worker threads accepted by [`BuildConfig::validate`].
pub const MAX_WORKERS: usize = 1024;

/// Which frequency table a pipeline builds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
	Char3Grams,
	#[default]
	Unigrams,
	Bigrams,
	Trigrams,
}

impl Level {
	/// Number of keys a full lookup takes at this level.
	pub fn arity(self) -> usize {
		match self {
			Level::Char3Grams | Level::Unigrams => 1,
			Level::Bigrams => 2,
			Level::Trigrams => 3,
		}
	}
}

/// Settings of a statistics build.
///
/// # Fields
/// - `scheme`: character grouping used by the tokenizer
/// - `level`: table to build
/// - `token_types`: tokens whose type is not in the set are skipped
/// - `workers`: worker threads, `0` picks one per CPU
/// - `encoding`: output encoding
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
	pub scheme: Scheme,
	pub level: Level,
	pub token_types: TokenTypes,
	pub workers: usize,
	pub encoding: Encoding,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self {
			scheme: Scheme::default(),
			level: Level::default(),
			token_types: TokenTypes::ALL,
			workers: 0,
			encoding: Encoding::default(),
		}
	}
}

impl BuildConfig {
	/// Returns a builder initialised with [`BuildConfig::default`].
	#[must_use]
	pub fn builder() -> BuildConfigBuilder {
		BuildConfigBuilder::default()
	}

	pub fn validate(&self) -> Result<()> {
		if self.token_types.is_empty() {
			return Err(CorpusError::InvalidConfig(
				"token_types must accept at least one token type".into(),
			));
		}
		if self.workers > MAX_WORKERS {
			return Err(CorpusError::InvalidConfig(format!(
				"workers ({}) exceeds {MAX_WORKERS}",
				self.workers
			)));
		}
		Ok(())
	}

	/// Worker count with `0` resolved to the number of CPUs.
	pub fn resolved_workers(&self) -> usize {
		if self.workers == 0 {
			num_cpus::get().max(1)
		} else {
			self.workers
		}
	}
}

/// Builder for [`BuildConfig`].
#[derive(Clone, Debug, Default)]
pub struct BuildConfigBuilder {
	config: BuildConfig,
}

impl BuildConfigBuilder {
	#[must_use]
	pub fn scheme(mut self, scheme: Scheme) -> Self {
		self.config.scheme = scheme;
		self
	}

	#[must_use]
	pub fn level(mut self, level: Level) -> Self {
		self.config.level = level;
		self
	}

	#[must_use]
	pub fn token_types(mut self, token_types: impl Into<TokenTypes>) -> Self {
		self.config.token_types = token_types.into();
		self
	}

	#[must_use]
	pub fn workers(mut self, workers: usize) -> Self {
		self.config.workers = workers;
		self
	}

	#[must_use]
	pub fn encoding(mut self, encoding: Encoding) -> Self {
		self.config.encoding = encoding;
		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<BuildConfig> {
		self.config.validate()?;
		Ok(self.config)
	}
}
