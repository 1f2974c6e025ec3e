use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use cgram_core::io::{TextSource, read_chunks_and_close, read_tokens_and_close};
use cgram_core::text::Tokenizer;
use cgram_core::{BuildConfig, CorpusError, Level, Pipeline, Result};

/// Scripted source: yields its chunks, then optionally fails, and records
/// whether it was closed.
struct Scripted {
	chunks: VecDeque<&'static str>,
	fail_read: bool,
	fail_close: bool,
	closed: Rc<Cell<bool>>,
}

impl Scripted {
	fn new(chunks: &[&'static str], fail_read: bool, fail_close: bool) -> (Self, Rc<Cell<bool>>) {
		let closed = Rc::new(Cell::new(false));
		let source = Self {
			chunks: chunks.iter().copied().collect(),
			fail_read,
			fail_close,
			closed: Rc::clone(&closed),
		};
		(source, closed)
	}
}

impl TextSource for Scripted {
	fn next_chunk(&mut self) -> Result<Option<String>> {
		match self.chunks.pop_front() {
			Some(chunk) => Ok(Some(chunk.to_owned())),
			None if self.fail_read => Err(CorpusError::MalformedInput("broken read".into())),
			None => Ok(None),
		}
	}

	fn close(&mut self) -> Result<()> {
		self.closed.set(true);
		if self.fail_close {
			return Err(CorpusError::MalformedInput("broken close".into()));
		}
		Ok(())
	}
}

fn message(err: CorpusError) -> String {
	match err {
		CorpusError::MalformedInput(msg) => msg,
		other => panic!("unexpected error {other}"),
	}
}

#[test]
fn clean_source_is_closed() {
	let (source, closed) = Scripted::new(&["ab cd", "ef"], false, false);
	let mut tokens = Vec::new();
	read_tokens_and_close(source, &Tokenizer::default(), |token| tokens.push(token.to_string())).expect("read");
	assert_eq!(tokens, ["ab", " ", "cd", "ef"]);
	assert!(closed.get());
}

#[test]
fn read_error_wins_over_close_error() {
	let (source, closed) = Scripted::new(&["ab"], true, true);
	let err = read_tokens_and_close(source, &Tokenizer::default(), |_| {}).expect_err("read fails");
	assert_eq!(message(err), "broken read");
	assert!(closed.get());
}

#[test]
fn read_error_is_reported_after_partial_tokens() {
	let (source, closed) = Scripted::new(&["ab"], true, false);
	let mut count = 0;
	let err = read_tokens_and_close(source, &Tokenizer::default(), |_| count += 1).expect_err("read fails");
	assert_eq!(message(err), "broken read");
	assert_eq!(count, 1);
	assert!(closed.get());
}

#[test]
fn close_error_is_reported_when_read_succeeds() {
	let (source, closed) = Scripted::new(&["ab"], false, true);
	let err = read_tokens_and_close(source, &Tokenizer::default(), |_| {}).expect_err("close fails");
	assert_eq!(message(err), "broken close");
	assert!(closed.get());
}

#[test]
fn chunks_follow_the_same_precedence() {
	let (source, _) = Scripted::new(&["a", "b"], false, false);
	assert_eq!(read_chunks_and_close(source).expect("chunks"), ["a", "b"]);

	let (source, closed) = Scripted::new(&["a"], true, true);
	assert_eq!(message(read_chunks_and_close(source).expect_err("read fails")), "broken read");
	assert!(closed.get());

	let (source, _) = Scripted::new(&["a"], false, true);
	assert_eq!(message(read_chunks_and_close(source).expect_err("close fails")), "broken close");
}

#[test]
fn pipeline_closes_failing_source() {
	let config = BuildConfig::builder().level(Level::Bigrams).build().expect("config");
	let pipeline = Pipeline::new(config).expect("pipeline");

	let (source, closed) = Scripted::new(&["Leib-Medicus"], false, false);
	let statistics = pipeline.build_source(source).expect("build");
	assert_eq!(statistics.lookup(&["Leib", "-"]).expect("lookup"), 1);
	assert!(closed.get());

	let (source, closed) = Scripted::new(&["Leib"], true, false);
	assert!(pipeline.build_source(source).is_err());
	assert!(closed.get());
}
