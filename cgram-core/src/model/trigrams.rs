use super::bigrams::{self, Bigrams};
use super::codec::{self, Layer, impl_layer_codec};
use super::count_map::{Count, CountMap};

/// Token triple frequencies.
///
/// Each head token owns a nested [`Bigrams`] holding the `(second, third)`
/// pairs that followed it, so a triple count is read with
/// `trigrams.get(a).get(b).get(c)`.
///
/// # Invariants
/// - `total()` equals the sum of the nested totals, i.e. the number of
///   triples seen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trigrams {
	heads: CountMap<Bigrams>,
}

impl Trigrams {
	pub fn new() -> Self {
		Self { heads: CountMap::new() }
	}

	/// Builds a table from a token sequence.
	pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
		let mut trigrams = Self::new();
		trigrams.add(tokens);
		trigrams
	}

	/// Counts every window of three consecutive tokens.
	///
	/// A sequence of `n >= 3` tokens adds `n - 2` triples. Calls do not chain.
	pub fn add<S: AsRef<str>>(&mut self, tokens: &[S]) -> &mut Self {
		for triple in tokens.windows(3) {
			self.add_triple(triple[0].as_ref(), triple[1].as_ref(), triple[2].as_ref());
		}
		self
	}

	pub fn add_triple(&mut self, first: &str, second: &str, third: &str) {
		self.heads.update(first, |pairs| pairs.add_pair(second, third));
	}

	/// Pairs that followed `first`; empty for an unknown head.
	pub fn get(&self, first: &str) -> &Bigrams {
		self.heads.get(first).unwrap_or(&*bigrams::EMPTY)
	}

	/// Number of triples counted.
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

	pub fn merge(&mut self, other: &Self) -> &mut Self {
		self.heads.merge(&other.heads);
		self
	}

	pub fn for_each<F: FnMut(&str, &Bigrams)>(&self, f: F) {
		self.heads.for_each(f);
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Bigrams)> {
		self.heads.iter()
	}
}

impl Count for Trigrams {
	fn total(&self) -> u64 {
		self.heads.total()
	}

	fn merge(&mut self, other: &Self) {
		self.heads.merge(&other.heads);
	}
}

impl Layer for Trigrams {
	type Value = Bigrams;

	const NAME: &'static str = "Trigrams";
	const FIELDS: &'static [&'static str] = &codec::fields("Trigrams");

	fn counts(&self) -> &CountMap<Bigrams> {
		&self.heads
	}

	fn from_counts(heads: CountMap<Bigrams>) -> Self {
		Self { heads }
	}
}

impl_layer_codec!(Trigrams);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_triples() {
		let trigrams = Trigrams::from_tokens(&["ab", "cd", "ab"]);
		assert_eq!(trigrams.get("ab").get("cd").get("ab"), 1);
		assert_eq!(trigrams.get("ab").get("xy").get("ab"), 0);
		assert_eq!(trigrams.get("xy").get("xy").get("ab"), 0);
		assert_eq!(trigrams.total(), 1);
		assert_eq!(trigrams.len(), 1);
	}

	#[test]
	fn missing_chain_is_zero() {
		let trigrams = Trigrams::default();
		assert_eq!(trigrams.get("zzz").get("yyy").get("xxx"), 0);
		assert_eq!(trigrams.get("zzz").total(), 0);
		assert_eq!(trigrams.get("zzz").get("yyy").len(), 0);
	}

	#[test]
	fn total_is_length_minus_two() {
		let tokens: Vec<String> = (0..10).map(|i| format!("t{}", i % 4)).collect();
		for n in 3..=tokens.len() {
			let trigrams = Trigrams::from_tokens(&tokens[..n]);
			assert_eq!(trigrams.total(), n as u64 - 2);
		}
		assert_eq!(Trigrams::from_tokens(&["a", "b"]).total(), 0);
	}

	#[test]
	fn merge_tables() {
		let cases = [
			(Trigrams::new(), Trigrams::new(), ["ab", "cd", "ef"], 0u64, 0u64),
			(Trigrams::new(), Trigrams::from_tokens(&["ab", "cd", "ef"]), ["ab", "cd", "ef"], 1, 1),
			(Trigrams::from_tokens(&["ab", "cd", "ef"]), Trigrams::new(), ["ab", "cd", "ef"], 1, 1),
			(
				Trigrams::from_tokens(&["ab", "cd", "ef"]),
				Trigrams::from_tokens(&["gh", "ij", "kl"]),
				["gh", "ij", "kl"],
				1,
				2,
			),
		];
		for (mut table, other, [a, b, c], count, total) in cases {
			table.merge(&other);
			assert_eq!(table.get(a).get(b).get(c), count);
			assert_eq!(table.total(), total);
		}
	}

	#[test]
	fn every_visited_triple_is_found() {
		let trigrams = Trigrams::from_tokens(&["ab", "cd", "ef", "ab", "cd", "xy"]);
		let mut seen = 0;
		trigrams.for_each(|a, pairs| {
			pairs.for_each(|b, next| {
				next.for_each(|c, count| {
					assert_eq!(trigrams.get(a).get(b).get(c), count);
					seen += count;
				});
			});
		});
		assert_eq!(seen, trigrams.total());
	}
}
