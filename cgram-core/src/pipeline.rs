use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};

use crate::config::{BuildConfig, Level};
use crate::error::{CorpusError, Result};
use crate::io::{TextSource, read_chunks_and_close};
use crate::model::{Bigrams, Char3Grams, Count, Encoding, Persist, Trigrams, Unigrams};
use crate::text::Tokenizer;

/// A frequency table of any level.
///
/// Lets callers pick the level at runtime (from a configuration or a
/// command line) while keeping the tables themselves strongly typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statistics {
	Char3Grams(Char3Grams),
	Unigrams(Unigrams),
	Bigrams(Bigrams),
	Trigrams(Trigrams),
}

impl Statistics {
	/// Returns an empty table of the given level.
	pub fn empty(level: Level) -> Self {
		match level {
			Level::Char3Grams => Statistics::Char3Grams(Char3Grams::new()),
			Level::Unigrams => Statistics::Unigrams(Unigrams::new()),
			Level::Bigrams => Statistics::Bigrams(Bigrams::new()),
			Level::Trigrams => Statistics::Trigrams(Trigrams::new()),
		}
	}

	pub fn level(&self) -> Level {
		match self {
			Statistics::Char3Grams(_) => Level::Char3Grams,
			Statistics::Unigrams(_) => Level::Unigrams,
			Statistics::Bigrams(_) => Level::Bigrams,
			Statistics::Trigrams(_) => Level::Trigrams,
		}
	}

	pub fn total(&self) -> u64 {
		match self {
			Statistics::Char3Grams(table) => table.total(),
			Statistics::Unigrams(table) => table.total(),
			Statistics::Bigrams(table) => table.total(),
			Statistics::Trigrams(table) => table.total(),
		}
	}

	/// Number of distinct top-level keys.
	pub fn len(&self) -> u64 {
		match self {
			Statistics::Char3Grams(table) => table.len(),
			Statistics::Unigrams(table) => table.len(),
			Statistics::Bigrams(table) => table.len(),
			Statistics::Trigrams(table) => table.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Adds one token sequence.
	///
	/// Word levels count the n-grams inside `tokens`; the character level
	/// counts the 3-grams of each token separately.
	pub fn add<S: AsRef<str>>(&mut self, tokens: &[S]) {
		match self {
			Statistics::Char3Grams(table) => {
				for token in tokens {
					table.add_all(token.as_ref());
				}
			}
			Statistics::Unigrams(table) => {
				table.add(tokens);
			}
			Statistics::Bigrams(table) => {
				table.add(tokens);
			}
			Statistics::Trigrams(table) => {
				table.add(tokens);
			}
		}
	}

	/// Merges another table of the same level into this one.
	///
	/// # Errors
	/// Returns an error if the levels do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		match (self, other) {
			(Statistics::Char3Grams(a), Statistics::Char3Grams(b)) => Count::merge(a, b),
			(Statistics::Unigrams(a), Statistics::Unigrams(b)) => Count::merge(a, b),
			(Statistics::Bigrams(a), Statistics::Bigrams(b)) => Count::merge(a, b),
			(Statistics::Trigrams(a), Statistics::Trigrams(b)) => Count::merge(a, b),
			(this, other) => {
				return Err(CorpusError::InvalidConfig(format!(
					"level mismatch: cannot merge {:?} into {:?}",
					other.level(),
					this.level()
				)));
			}
		}
		Ok(())
	}

	/// Chained lookup, one key per level of nesting.
	///
	/// # Errors
	/// Returns an error if the number of keys does not match the level.
	pub fn lookup<S: AsRef<str>>(&self, keys: &[S]) -> Result<u64> {
		let arity = self.level().arity();
		if keys.len() != arity {
			return Err(CorpusError::InvalidConfig(format!(
				"{:?} lookups take {arity} key(s), got {}",
				self.level(),
				keys.len()
			)));
		}
		let key = |i: usize| keys[i].as_ref();
		Ok(match self {
			Statistics::Char3Grams(table) => table.get(key(0)),
			Statistics::Unigrams(table) => table.get(key(0)),
			Statistics::Bigrams(table) => table.get(key(0)).get(key(1)),
			Statistics::Trigrams(table) => table.get(key(0)).get(key(1)).get(key(2)),
		})
	}

	pub fn encode(&self, encoding: Encoding) -> Result<Vec<u8>> {
		match self {
			Statistics::Char3Grams(table) => table.encode(encoding),
			Statistics::Unigrams(table) => table.encode(encoding),
			Statistics::Bigrams(table) => table.encode(encoding),
			Statistics::Trigrams(table) => table.encode(encoding),
		}
	}

	/// Decodes a table; the level is not part of the encoding and must be
	/// known by the caller.
	pub fn decode(bytes: &[u8], level: Level, encoding: Encoding) -> Result<Self> {
		Ok(match level {
			Level::Char3Grams => Statistics::Char3Grams(Char3Grams::decode(bytes, encoding)?),
			Level::Unigrams => Statistics::Unigrams(Unigrams::decode(bytes, encoding)?),
			Level::Bigrams => Statistics::Bigrams(Bigrams::decode(bytes, encoding)?),
			Level::Trigrams => Statistics::Trigrams(Trigrams::decode(bytes, encoding)?),
		})
	}

	pub fn save<P: AsRef<Path>>(&self, path: P, encoding: Encoding) -> Result<()> {
		match self {
			Statistics::Char3Grams(table) => table.save(path, encoding),
			Statistics::Unigrams(table) => table.save(path, encoding),
			Statistics::Bigrams(table) => table.save(path, encoding),
			Statistics::Trigrams(table) => table.save(path, encoding),
		}
	}

	pub fn load<P: AsRef<Path>>(path: P, level: Level, encoding: Encoding) -> Result<Self> {
		Ok(match level {
			Level::Char3Grams => Statistics::Char3Grams(Char3Grams::load(path, encoding)?),
			Level::Unigrams => Statistics::Unigrams(Unigrams::load(path, encoding)?),
			Level::Bigrams => Statistics::Bigrams(Bigrams::load(path, encoding)?),
			Level::Trigrams => Statistics::Trigrams(Trigrams::load(path, encoding)?),
		})
	}
}

/// Turns text chunks into a [`Statistics`] table.
///
/// # Responsibilities
/// - Tokenize each chunk with the configured scheme
/// - Drop tokens whose type is filtered out
/// - Feed the remaining tokens of a chunk, as one sequence, into the table
/// - Optionally spread the chunks over worker threads and merge the partial
///   tables
///
/// N-grams never span two chunks.
#[derive(Clone, Debug)]
pub struct Pipeline {
	config: BuildConfig,
	tokenizer: Tokenizer,
}

impl Pipeline {
	/// # Errors
	/// Returns an error if the configuration is invalid.
	pub fn new(config: BuildConfig) -> Result<Self> {
		config.validate()?;
		let tokenizer = Tokenizer::new(config.scheme);
		Ok(Self { config, tokenizer })
	}

	pub fn config(&self) -> &BuildConfig {
		&self.config
	}

	/// Adds the tokens of one chunk to `statistics`.
	pub fn add_chunk(&self, statistics: &mut Statistics, chunk: &str) {
		let tokens: Vec<&str> = self
			.tokenizer
			.tokens(chunk)
			.filter(|token| self.config.token_types.contains(token.token_type()))
			.map(|token| token.as_str())
			.collect();
		statistics.add(&tokens);
	}

	/// Builds a table from `chunks` on the calling thread.
	pub fn build<S: AsRef<str>>(&self, chunks: &[S]) -> Statistics {
		let mut statistics = Statistics::empty(self.config.level);
		for chunk in chunks {
			self.add_chunk(&mut statistics, chunk.as_ref());
		}
		statistics
	}

	/// Builds a table from `chunks` using the configured number of workers.
	///
	/// # Behavior
	/// - Splits the chunks into one contiguous slice per worker.
	/// - Each worker builds a partial table.
	/// - Partial tables are merged on the calling thread as they arrive.
	///
	/// The result equals [`Pipeline::build`] since merging is order
	/// independent.
	pub fn build_parallel<S: AsRef<str> + Sync>(&self, chunks: &[S]) -> Result<Statistics> {
		let workers = self.config.resolved_workers();
		if workers <= 1 || chunks.len() <= 1 {
			return Ok(self.build(chunks));
		}
		let chunk_size = chunks.len().div_ceil(workers);
		debug!(
			"building {:?} from {} chunks on {} workers",
			self.config.level,
			chunks.len(),
			chunks.len().div_ceil(chunk_size)
		);

		thread::scope(|scope| -> Result<Statistics> {
			let (tx, rx) = mpsc::channel();
			for slice in chunks.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					if tx.send(self.build(slice)).is_err() {
						warn!("partial table dropped: receiver closed");
					}
				});
			}
			drop(tx);

			let mut statistics = Statistics::empty(self.config.level);
			for partial in rx.iter() {
				statistics.merge(&partial)?;
			}
			Ok(statistics)
		})
	}

	/// Reads a whole source (closing it on every path) and builds a table.
	pub fn build_source<T: TextSource>(&self, source: T) -> Result<Statistics> {
		let chunks = read_chunks_and_close(source)?;
		let statistics = self.build_parallel(&chunks)?;
		info!(
			"built {:?}: total {}, distinct {}",
			statistics.level(),
			statistics.total(),
			statistics.len()
		);
		Ok(statistics)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::text::{Scheme, TokenType};

	fn pipeline(level: Level, workers: usize) -> Pipeline {
		let config = BuildConfig::builder()
			.level(level)
			.workers(workers)
			.build()
			.expect("valid config");
		Pipeline::new(config).expect("pipeline")
	}

	#[test]
	fn filters_token_types() {
		let config = BuildConfig::builder()
			.level(Level::Bigrams)
			.token_types(TokenType::Word)
			.build()
			.expect("valid config");
		let statistics = Pipeline::new(config).expect("pipeline").build(&["Der Studenten, Leib"]);
		assert_eq!(statistics.lookup(&["Der", "Studenten"]).expect("lookup"), 1);
		assert_eq!(statistics.lookup(&["Studenten", "Leib"]).expect("lookup"), 1);
		assert_eq!(statistics.total(), 2);
	}

	#[test]
	fn ngrams_do_not_span_chunks() {
		let statistics = pipeline(Level::Bigrams, 1).build(&["a", "b"]);
		assert_eq!(statistics.total(), 0);
	}

	#[test]
	fn char3grams_are_counted_per_token() {
		let statistics = pipeline(Level::Char3Grams, 1).build(&["abc-def"]);
		assert_eq!(statistics.lookup(&["abc"]).expect("lookup"), 1);
		assert_eq!(statistics.lookup(&["c-d"]).expect("lookup"), 0);
		assert_eq!(statistics.total(), 2);
	}

	#[test]
	fn parallel_build_matches_sequential() {
		let chunks: Vec<String> = (0..50).map(|i| format!("w{} x{} w{} 1{}", i % 3, i % 5, i % 7, i)).collect();
		for level in [Level::Char3Grams, Level::Unigrams, Level::Bigrams, Level::Trigrams] {
			let sequential = pipeline(level, 1).build(&chunks);
			let parallel = pipeline(level, 4).build_parallel(&chunks).expect("parallel build");
			assert_eq!(parallel, sequential, "{level:?}");
		}
	}

	#[test]
	fn merge_rejects_level_mismatch() {
		let mut a = Statistics::empty(Level::Unigrams);
		let b = Statistics::empty(Level::Bigrams);
		assert!(matches!(a.merge(&b), Err(CorpusError::InvalidConfig(_))));
	}

	#[test]
	fn lookup_checks_arity() {
		let statistics = Statistics::empty(Level::Trigrams);
		assert!(statistics.lookup(&["a", "b"]).is_err());
		assert_eq!(statistics.lookup(&["a", "b", "c"]).expect("lookup"), 0);
	}

	#[test]
	fn four_class_scheme_is_applied() {
		let config = BuildConfig::builder()
			.scheme(Scheme::FourClass)
			.level(Level::Unigrams)
			.build()
			.expect("valid config");
		let statistics = Pipeline::new(config).expect("pipeline").build(&["Henrici"]);
		assert_eq!(statistics.lookup(&["H"]).expect("lookup"), 1);
		assert_eq!(statistics.lookup(&["enrici"]).expect("lookup"), 1);
	}
}
