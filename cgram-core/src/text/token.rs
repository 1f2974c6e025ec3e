use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use super::class::{CharClass, classify};

/// Coarse classification of a token's character composition.
///
/// Each variant maps to a distinct bit so that types can be combined into a
/// [`TokenTypes`] filter: `TokenType::Word | TokenType::Number`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
	Empty = 1,
	Word = 1 << 1,
	Number = 1 << 2,
	Punctuation = 1 << 3,
	Mixed = 1 << 4,
}

impl TokenType {
	/// Type of a single code point: letters and marks are words, numeric code
	/// points are numbers, everything else is punctuation.
	fn of_char(c: char) -> Self {
		match classify(c) {
			CharClass::LowercaseLetter
			| CharClass::UppercaseOrTitlecaseLetter
			| CharClass::CombiningMark => TokenType::Word,
			CharClass::Digit => TokenType::Number,
			CharClass::Other => TokenType::Punctuation,
		}
	}

	/// Classifies a whole string.
	///
	/// Returns `Empty` for `""`, the common type when every code point
	/// agrees, and `Mixed` as soon as two code points disagree.
	pub fn of(text: &str) -> Self {
		let mut chars = text.chars();
		let first = match chars.next() {
			Some(c) => Self::of_char(c),
			None => return TokenType::Empty,
		};
		for c in chars {
			if Self::of_char(c) != first {
				return TokenType::Mixed;
			}
		}
		first
	}
}

/// Set of [`TokenType`]s used to select which tokens feed a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenTypes(u8);

impl TokenTypes {
	/// Accepts nothing.
	pub const NONE: Self = Self(0);
	/// Accepts every token type.
	pub const ALL: Self = Self(0b1_1111);

	/// Returns `true` if `token_type` is part of the set.
	pub fn contains(self, token_type: TokenType) -> bool {
		self.0 & token_type as u8 != 0
	}

	pub fn is_empty(self) -> bool {
		self.0 == 0
	}
}

impl Default for TokenTypes {
	fn default() -> Self {
		Self::ALL
	}
}

impl From<TokenType> for TokenTypes {
	fn from(token_type: TokenType) -> Self {
		Self(token_type as u8)
	}
}

impl BitOr for TokenType {
	type Output = TokenTypes;

	fn bitor(self, rhs: Self) -> TokenTypes {
		TokenTypes(self as u8 | rhs as u8)
	}
}

impl BitOr<TokenType> for TokenTypes {
	type Output = TokenTypes;

	fn bitor(self, rhs: TokenType) -> TokenTypes {
		TokenTypes(self.0 | rhs as u8)
	}
}

impl BitOr for TokenTypes {
	type Output = TokenTypes;

	fn bitor(self, rhs: Self) -> TokenTypes {
		TokenTypes(self.0 | rhs.0)
	}
}

impl BitOrAssign<TokenType> for TokenTypes {
	fn bitor_assign(&mut self, rhs: TokenType) {
		self.0 |= rhs as u8;
	}
}

/// A token emitted by the [`Tokenizer`](super::Tokenizer).
///
/// Borrows the substring of the input it was cut from. The type is not
/// stored; [`Token::token_type`] recomputes it from the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token<'a> {
	text: &'a str,
}

impl<'a> Token<'a> {
	pub fn new(text: &'a str) -> Self {
		Self { text }
	}

	/// The substring this token covers.
	pub fn as_str(&self) -> &'a str {
		self.text
	}

	pub fn token_type(&self) -> TokenType {
		TokenType::of(self.text)
	}

	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

impl AsRef<str> for Token<'_> {
	fn as_ref(&self) -> &str {
		self.text
	}
}

impl fmt::Display for Token<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn token_types() {
		let cases = [
			("", TokenType::Empty),
			("word", TokenType::Word),
			("Waſſer", TokenType::Word),
			("fu\u{0364}r", TokenType::Word),
			("123", TokenType::Number),
			(",", TokenType::Punctuation),
			("---", TokenType::Punctuation),
			("mixed-word", TokenType::Mixed),
			("a1", TokenType::Mixed),
			("Ⓐ", TokenType::Punctuation),
			("aⒶ", TokenType::Mixed),
		];
		for (text, want) in cases {
			let token = Token::new(text);
			assert_eq!(token.token_type(), want, "{text:?}");
			assert_eq!(token.to_string(), text);
		}
	}

	#[test]
	fn filters_combine_types() {
		let filter = TokenType::Word | TokenType::Number;
		assert!(filter.contains(TokenType::Word));
		assert!(filter.contains(TokenType::Number));
		assert!(!filter.contains(TokenType::Punctuation));
		assert!(!filter.contains(TokenType::Mixed));

		let mut filter = TokenTypes::NONE;
		assert!(filter.is_empty());
		filter |= TokenType::Mixed;
		assert!(filter.contains(TokenType::Mixed));
		assert!(TokenTypes::ALL.contains(TokenType::Empty));
	}
}
