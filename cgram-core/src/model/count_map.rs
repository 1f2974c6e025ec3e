use std::collections::HashMap;

/// A value that carries a total count and can absorb another value of the
/// same kind.
///
/// Implemented by plain counts (`u64`) and by every frequency structure, so
/// that a [`CountMap`] can nest one level inside the next.
///
/// Counts saturate at `u64::MAX` instead of overflowing.
///
/// # Invariants
/// - `merge` is commutative and associative.
/// - After `a.merge(&b)`, `a.total()` is the old
///   `a.total().saturating_add(b.total())`.
pub trait Count: Clone + Default {
	/// Sum of every count held by the value.
	fn total(&self) -> u64;

	/// Adds all counts of `other` into `self`.
	fn merge(&mut self, other: &Self);
}

impl Count for u64 {
	fn total(&self) -> u64 {
		*self
	}

	fn merge(&mut self, other: &Self) {
		*self = self.saturating_add(*other);
	}
}

/// String-keyed frequency table shared by all n-gram levels.
///
/// `V` is either a plain count (flat tables) or the next structure down the
/// hierarchy (nested tables). The map keeps a running total so that
/// [`CountMap::total`] is O(1).
///
/// # Invariants
/// - `total == sum of entries[k].total()`, saturated at `u64::MAX`
/// - No entry has a total of zero.
/// - A default map holds no allocation; the backing table is allocated on
///   the first insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountMap<V> {
	total: u64,
	entries: HashMap<String, V>,
}

impl<V: Count> CountMap<V> {
	pub fn new() -> Self {
		Self { total: 0, entries: HashMap::new() }
	}

	/// Rebuilds a map from raw entries, recomputing the total.
	///
	/// Entries with a zero total are dropped so that the result matches a
	/// map built through [`CountMap::update`].
	pub(crate) fn from_entries(mut entries: HashMap<String, V>) -> Self {
		entries.retain(|_, value| value.total() > 0);
		let total = entries
			.values()
			.fold(0u64, |sum, value| sum.saturating_add(value.total()));
		Self { total, entries }
	}

	pub fn total(&self) -> u64 {
		self.total
	}

	/// Number of distinct keys.
	pub fn len(&self) -> u64 {
		self.entries.len() as u64
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn get(&self, key: &str) -> Option<&V> {
		self.entries.get(key)
	}

	/// Applies `f` to the value stored under `key`, creating it first if
	/// needed, and keeps the running total in sync with the change.
	///
	/// The key is only copied when it is new.
	pub(crate) fn update<F>(&mut self, key: &str, f: F)
	where
		F: FnOnce(&mut V),
	{
		if let Some(value) = self.entries.get_mut(key) {
			let before = value.total();
			f(value);
			// counts never decrease
			self.total = self.total.saturating_add(value.total() - before);
			return;
		}

		let mut value = V::default();
		f(&mut value);
		if value.total() > 0 {
			self.total = self.total.saturating_add(value.total());
			self.entries.insert(key.to_owned(), value);
		}
	}

	/// Visits every `(key, value)` pair. The order is unspecified.
	pub fn for_each<F>(&self, mut f: F)
	where
		F: FnMut(&str, &V),
	{
		for (key, value) in &self.entries {
			f(key, value);
		}
	}

	/// Iterates over every `(key, value)` pair in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}

	pub(crate) fn entries(&self) -> &HashMap<String, V> {
		&self.entries
	}
}

impl<V: Count> Count for CountMap<V> {
	fn total(&self) -> u64 {
		self.total
	}

	/// Key-wise merge: matching entries are merged recursively, missing ones
	/// are cloned from `other`.
	fn merge(&mut self, other: &Self) {
		for (key, value) in &other.entries {
			if let Some(existing) = self.entries.get_mut(key) {
				existing.merge(value);
			} else {
				self.entries.insert(key.clone(), value.clone());
			}
		}
		self.total = self.total.saturating_add(other.total);
	}
}
