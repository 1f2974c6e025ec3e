use std::sync::LazyLock;

use super::codec::{self, Layer, impl_layer_codec};
use super::count_map::{Count, CountMap};

/// Shared empty table handed out for absent heads.
pub(crate) static EMPTY: LazyLock<Unigrams> = LazyLock::new(Unigrams::new);

/// Token frequencies.
///
/// Also used as the continuation table of a [`Bigrams`](super::Bigrams)
/// head.
///
/// # Invariants
/// - `total()` equals the sum of all token counts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unigrams {
	counts: CountMap<u64>,
}

impl Unigrams {
	pub fn new() -> Self {
		Self { counts: CountMap::new() }
	}

	/// Builds a table from a token sequence.
	pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
		let mut unigrams = Self::new();
		unigrams.add(tokens);
		unigrams
	}

	/// Counts every token once.
	pub fn add<S: AsRef<str>>(&mut self, tokens: &[S]) -> &mut Self {
		for token in tokens {
			self.add_one(token.as_ref());
		}
		self
	}

	pub fn add_one(&mut self, token: &str) {
		self.counts.update(token, |count| *count = count.saturating_add(1));
	}

	/// Count of `token`, 0 if it was never seen.
	pub fn get(&self, token: &str) -> u64 {
		self.counts.get(token).copied().unwrap_or(0)
	}

	pub fn total(&self) -> u64 {
		self.counts.total()
	}

	/// Number of distinct tokens.
	pub fn len(&self) -> u64 {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Adds the counts of `other` to this table.
	pub fn merge(&mut self, other: &Self) -> &mut Self {
		self.counts.merge(&other.counts);
		self
	}

	pub fn for_each<F: FnMut(&str, u64)>(&self, mut f: F) {
		self.counts.for_each(|token, count| f(token, *count));
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(token, count)| (token, *count))
	}
}

impl Count for Unigrams {
	fn total(&self) -> u64 {
		self.counts.total()
	}

	fn merge(&mut self, other: &Self) {
		self.counts.merge(&other.counts);
	}
}

impl Layer for Unigrams {
	type Value = u64;

	const NAME: &'static str = "Unigrams";
	const FIELDS: &'static [&'static str] = &codec::fields("Unigrams");

	fn counts(&self) -> &CountMap<u64> {
		&self.counts
	}

	fn from_counts(counts: CountMap<u64>) -> Self {
		Self { counts }
	}
}

impl_layer_codec!(Unigrams);
