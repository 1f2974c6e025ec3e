use serde::{Deserialize, Serialize};
use unicode_general_category::{GeneralCategory, get_general_category};

/// Coarse Unicode class of a single code point.
///
/// Combining marks get their own class: they are neither letters nor
/// punctuation. How they take part in run detection is decided by the
/// active [`Scheme`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
	Digit,
	LowercaseLetter,
	UppercaseOrTitlecaseLetter,
	CombiningMark,
	Other,
}

/// Classifies a code point by its general category.
///
/// - Marks (`Mn`, `Mc`, `Me`) are combining marks, including alphabetic
///   ones such as U+0364.
/// - Numbers (`Nd`, `Nl`, `No`) are digits.
/// - Letters (`L*`) are split by case. `Lm` and `Lo` have no case and
///   count as lowercase.
/// - Everything else, symbols that carry the Alphabetic property such as
///   `Ⓐ` included, is `Other`.
pub fn classify(c: char) -> CharClass {
	use GeneralCategory::*;

	match get_general_category(c) {
		NonspacingMark | SpacingMark | EnclosingMark => CharClass::CombiningMark,
		DecimalNumber | LetterNumber | OtherNumber => CharClass::Digit,
		UppercaseLetter | TitlecaseLetter => CharClass::UppercaseOrTitlecaseLetter,
		LowercaseLetter | ModifierLetter | OtherLetter => CharClass::LowercaseLetter,
		_ => CharClass::Other,
	}
}

/// Character grouping used to detect runs.
///
/// Two rule sets coexist in the corpora this crate is used on, so the
/// caller picks one explicitly.
///
/// # Variants
/// - `ThreeClass`: letter / digit / other. Combining marks count as letters.
/// - `FourClass`: uppercase (or titlecase) letter / lowercase letter /
///   digit / punctuation. Combining marks never break a run; they continue
///   whatever run they follow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
	#[default]
	ThreeClass,
	FourClass,
}

/// Run class assigned to a code point by a [`Scheme`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunClass {
	Letter,
	Upper,
	Lower,
	Digit,
	Other,
}

impl Scheme {
	/// Maps a code point to its run class.
	///
	/// Returns `None` when the code point continues the current run
	/// regardless of its class (combining marks under `FourClass`).
	pub(crate) fn run_class(self, c: char) -> Option<RunClass> {
		match (self, classify(c)) {
			(_, CharClass::Digit) => Some(RunClass::Digit),
			(_, CharClass::Other) => Some(RunClass::Other),
			// letters of either case and combining marks
			(Scheme::ThreeClass, _) => Some(RunClass::Letter),
			(Scheme::FourClass, CharClass::LowercaseLetter) => Some(RunClass::Lower),
			(Scheme::FourClass, CharClass::UppercaseOrTitlecaseLetter) => Some(RunClass::Upper),
			(Scheme::FourClass, CharClass::CombiningMark) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classify_covers_every_class() {
		assert_eq!(classify('7'), CharClass::Digit);
		assert_eq!(classify('Ⅻ'), CharClass::Digit);
		assert_eq!(classify('a'), CharClass::LowercaseLetter);
		assert_eq!(classify('ſ'), CharClass::LowercaseLetter);
		assert_eq!(classify('Ä'), CharClass::UppercaseOrTitlecaseLetter);
		assert_eq!(classify('ǅ'), CharClass::UppercaseOrTitlecaseLetter);
		assert_eq!(classify('\u{0364}'), CharClass::CombiningMark);
		assert_eq!(classify('\u{0308}'), CharClass::CombiningMark);
		assert_eq!(classify(','), CharClass::Other);
		assert_eq!(classify(' '), CharClass::Other);
	}

	#[test]
	fn uncased_letters_are_lowercase() {
		assert_eq!(classify('漢'), CharClass::LowercaseLetter);
	}

	#[test]
	fn alphabetic_symbols_are_not_letters() {
		// So, but Alphabetic and Uppercase
		assert_eq!(classify('Ⓐ'), CharClass::Other);
		assert_eq!(classify('ⓐ'), CharClass::Other);
		assert_eq!(classify('🅰'), CharClass::Other);
		assert_eq!(classify('ʰ'), CharClass::LowercaseLetter);
	}

	#[test]
	fn marks_are_letters_under_three_classes() {
		assert_eq!(Scheme::ThreeClass.run_class('\u{0364}'), Some(RunClass::Letter));
		assert_eq!(Scheme::ThreeClass.run_class('A'), Some(RunClass::Letter));
	}

	#[test]
	fn marks_continue_runs_under_four_classes() {
		assert_eq!(Scheme::FourClass.run_class('\u{0364}'), None);
		assert_eq!(Scheme::FourClass.run_class('A'), Some(RunClass::Upper));
		assert_eq!(Scheme::FourClass.run_class('a'), Some(RunClass::Lower));
	}
}
