use std::str::CharIndices;

use super::codec::{self, Layer, impl_layer_codec};
use super::count_map::{Count, CountMap};

/// Iterator over the character 3-grams of a string.
///
/// Windows slide one code point at a time and never split a multi-byte
/// character. A string of `n >= 3` code points yields `n - 2` windows,
/// shorter strings yield none.
#[derive(Clone, Debug)]
pub struct Char3GramIter<'a> {
	text: &'a str,
	starts: CharIndices<'a>,
	// runs three code points ahead of `starts`
	ends: CharIndices<'a>,
	exhausted: bool,
}

impl<'a> Iterator for Char3GramIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<&'a str> {
		if self.exhausted {
			return None;
		}
		let end = match self.ends.next() {
			Some((i, _)) => i,
			None => {
				self.exhausted = true;
				self.text.len()
			}
		};
		let (start, _) = self.starts.next()?;
		Some(&self.text[start..end])
	}
}

/// Returns the 3-grams of `text` in extraction order.
pub fn char3grams(text: &str) -> Char3GramIter<'_> {
	let mut ends = text.char_indices();
	let exhausted = ends.nth(2).is_none();
	Char3GramIter {
		text,
		starts: text.char_indices(),
		ends,
		exhausted,
	}
}

/// Calls `f` for each 3-gram of `text`.
pub fn each_char3gram<'a, F: FnMut(&'a str)>(text: &'a str, f: F) {
	char3grams(text).for_each(f);
}

/// Character 3-gram frequencies.
///
/// Unlike the token tables, the input is any string; callers typically feed
/// it single tokens or whole lines.
///
/// # Invariants
/// - Every key is exactly three code points long
/// - `total()` equals the sum of all counts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Char3Grams {
	counts: CountMap<u64>,
}

impl Char3Grams {
	pub fn new() -> Self {
		Self { counts: CountMap::new() }
	}

	pub fn from_text(text: &str) -> Self {
		let mut grams = Self::new();
		grams.add_all(text);
		grams
	}

	/// Counts every 3-gram of `text`.
	pub fn add_all(&mut self, text: &str) -> &mut Self {
		for gram in char3grams(text) {
			self.counts.update(gram, |count| *count = count.saturating_add(1));
		}
		self
	}

	pub fn get(&self, gram: &str) -> u64 {
		self.counts.get(gram).copied().unwrap_or(0)
	}

	/// Number of 3-grams counted.
	pub fn total(&self) -> u64 {
		self.counts.total()
	}

	/// Number of distinct 3-grams.
	pub fn len(&self) -> u64 {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	pub fn merge(&mut self, other: &Self) -> &mut Self {
		self.counts.merge(&other.counts);
		self
	}

	pub fn for_each<F: FnMut(&str, u64)>(&self, mut f: F) {
		self.counts.for_each(|gram, count| f(gram, *count));
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(gram, count)| (gram, *count))
	}
}

impl Count for Char3Grams {
	fn total(&self) -> u64 {
		self.counts.total()
	}

	fn merge(&mut self, other: &Self) {
		self.counts.merge(&other.counts);
	}
}

impl Layer for Char3Grams {
	type Value = u64;

	const NAME: &'static str = "Char3Grams";
	const FIELDS: &'static [&'static str] = &codec::fields("NGrams");

	fn counts(&self) -> &CountMap<u64> {
		&self.counts
	}

	fn from_counts(counts: CountMap<u64>) -> Self {
		Self { counts }
	}
}

impl_layer_codec!(Char3Grams);
