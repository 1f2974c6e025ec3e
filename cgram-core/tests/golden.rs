mod common;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use cgram_core::io::{LineSource, read_tokens_and_close};
use cgram_core::text::{Scheme, Tokenizer};

use common::{check_golden, update_requested};

fn data(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

fn dump_tokens(scheme: Scheme) -> String {
	let source = LineSource::open(data("sample.txt")).expect("open sample");
	let mut out = String::new();
	read_tokens_and_close(source, &Tokenizer::new(scheme), |token| {
		let _ = writeln!(out, "{:?}\t[{token}]", token.token_type());
	})
	.expect("tokenize sample");
	out
}

#[test]
fn three_class_tokens() {
	check_golden(&data("sample.three.tokens"), &dump_tokens(Scheme::ThreeClass), update_requested());
}

#[test]
fn four_class_tokens() {
	check_golden(&data("sample.four.tokens"), &dump_tokens(Scheme::FourClass), update_requested());
}
