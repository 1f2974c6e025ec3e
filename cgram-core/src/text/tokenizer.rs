use std::str::CharIndices;

use super::class::{RunClass, Scheme};
use super::token::Token;

/// Splits text into maximal runs of code points sharing a run class.
///
/// The tokenizer itself holds no state besides its [`Scheme`]; every call to
/// [`Tokenizer::tokens`] starts a fresh scan, so one instance can be shared
/// freely between inputs.
///
/// # Invariants
/// - Tokens are contiguous, non-overlapping and never empty.
/// - Concatenating the tokens of an input, in order, yields the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tokenizer {
	scheme: Scheme,
}

impl Tokenizer {
	pub fn new(scheme: Scheme) -> Self {
		Self { scheme }
	}

	pub fn scheme(&self) -> Scheme {
		self.scheme
	}

	/// Returns a lazy iterator over the tokens of `text`.
	///
	/// Cloning the iterator yields an independent scan resuming at the same
	/// position.
	pub fn tokens<'a>(&self, text: &'a str) -> Tokens<'a> {
		Tokens {
			text,
			chars: text.char_indices(),
			scheme: self.scheme,
			state: State::Initial,
			run_start: 0,
		}
	}

	/// Feeds every token of `text` into `sink`.
	pub fn tokenize<'a, F>(&self, text: &'a str, mut sink: F)
	where
		F: FnMut(Token<'a>),
	{
		for token in self.tokens(text) {
			sink(token);
		}
	}

	/// Collects the tokens of `text` as string slices.
	pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
		self.tokens(text).map(|token| token.as_str()).collect()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
	Initial,
	Run(RunClass),
	Done,
}

/// Iterator returned by [`Tokenizer::tokens`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
	text: &'a str,
	chars: CharIndices<'a>,
	scheme: Scheme,
	state: State,
	run_start: usize,
}

impl<'a> Iterator for Tokens<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Token<'a>> {
		loop {
			let Some((i, c)) = self.chars.next() else {
				// Flush the last run exactly once
				if let State::Run(_) = self.state {
					self.state = State::Done;
					return Some(Token::new(&self.text[self.run_start..]));
				}
				self.state = State::Done;
				return None;
			};

			let next = match (self.scheme.run_class(c), self.state) {
				(Some(class), _) => class,
				// A leading mark has no run to continue
				(None, State::Initial) => RunClass::Other,
				(None, _) => continue,
			};

			match self.state {
				State::Run(current) if current == next => {}
				State::Initial => {
					self.state = State::Run(next);
					self.run_start = i;
				}
				State::Run(_) => {
					let token = Token::new(&self.text[self.run_start..i]);
					self.state = State::Run(next);
					self.run_start = i;
					return Some(token);
				}
				State::Done => return None,
			}
		}
	}
}

impl std::iter::FusedIterator for Tokens<'_> {}
