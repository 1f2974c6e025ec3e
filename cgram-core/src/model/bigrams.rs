use std::sync::LazyLock;

use super::codec::{self, Layer, impl_layer_codec};
use super::count_map::{Count, CountMap};
use super::unigrams::{self, Unigrams};

/// Shared empty table handed out for absent heads.
pub(crate) static EMPTY: LazyLock<Bigrams> = LazyLock::new(Bigrams::new);

/// Token pair frequencies.
///
/// For every head token the table stores the distribution of the tokens
/// that followed it, as a nested [`Unigrams`].
///
/// # Invariants
/// - `total()` equals the sum of the nested totals, i.e. the number of pairs
///   seen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bigrams {
	heads: CountMap<Unigrams>,
}

impl Bigrams {
	pub fn new() -> Self {
		Self { heads: CountMap::new() }
	}

	/// Builds a table from a token sequence.
	pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
		let mut bigrams = Self::new();
		bigrams.add(tokens);
		bigrams
	}

	/// Counts every adjacent pair of `tokens`.
	///
	/// Only pairs inside `tokens` are counted: calls do not chain, so the
	/// last token of one call and the first of the next never form a pair.
	pub fn add<S: AsRef<str>>(&mut self, tokens: &[S]) -> &mut Self {
		for pair in tokens.windows(2) {
			self.add_pair(pair[0].as_ref(), pair[1].as_ref());
		}
		self
	}

	pub fn add_pair(&mut self, first: &str, second: &str) {
		self.heads.update(first, |next| next.add_one(second));
	}

	/// Continuations of `first`.
	///
	/// Never fails: an unknown head yields an empty table, so lookups can be
	/// chained: `bigrams.get("a").get("b")`.
	pub fn get(&self, first: &str) -> &Unigrams {
		self.heads.get(first).unwrap_or(&*unigrams::EMPTY)
	}

	/// Number of pairs counted.
	pub fn total(&self) -> u64 {
		self.heads.total()
	}

	/// Number of distinct heads.
	pub fn len(&self) -> u64 {
		self.heads.len()
	}

	pub fn is_empty(&self) -> bool {
		self.heads.is_empty()
	}

	/// Merges `other` head by head.
	pub fn merge(&mut self, other: &Self) -> &mut Self {
		self.heads.merge(&other.heads);
		self
	}

	pub fn for_each<F: FnMut(&str, &Unigrams)>(&self, f: F) {
		self.heads.for_each(f);
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Unigrams)> {
		self.heads.iter()
	}
}

impl Count for Bigrams {
	fn total(&self) -> u64 {
		self.heads.total()
	}

	fn merge(&mut self, other: &Self) {
		self.heads.merge(&other.heads);
	}
}

impl Layer for Bigrams {
	type Value = Unigrams;

	const NAME: &'static str = "Bigrams";
	const FIELDS: &'static [&'static str] = &codec::fields("Bigrams");

	fn counts(&self) -> &CountMap<Unigrams> {
		&self.heads
	}

	fn from_counts(heads: CountMap<Unigrams>) -> Self {
		Self { heads }
	}
}

impl_layer_codec!(Bigrams);
