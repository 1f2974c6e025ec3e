use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{CorpusError, Result};
use crate::text::{Token, Tokenizer};

/// A producer of UTF-8 text chunks, typically a document reader.
///
/// The core never looks inside the container format; it only pulls chunks
/// until the source reports the end.
pub trait TextSource {
	/// Returns the next chunk, or `None` once the source is exhausted.
	fn next_chunk(&mut self) -> Result<Option<String>>;

	/// Releases the underlying resource.
	fn close(&mut self) -> Result<()> {
		Ok(())
	}
}

/// Reads a [`BufRead`] line by line; each line (without its terminator) is a
/// chunk.
///
/// Invalid UTF-8 and read failures are reported as
/// [`CorpusError::MalformedInput`] with the 1-based line number.
#[derive(Debug)]
pub struct LineSource<R> {
	reader: Option<R>,
	line: usize,
}

impl<R: BufRead> LineSource<R> {
	pub fn new(reader: R) -> Self {
		Self { reader: Some(reader), line: 0 }
	}
}

impl LineSource<BufReader<File>> {
	/// Opens a text file.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).map_err(|err| CorpusError::io(err, Some(path.to_path_buf())))?;
		debug!("opened {}", path.display());
		Ok(Self::new(BufReader::new(file)))
	}
}

impl<R: BufRead> TextSource for LineSource<R> {
	fn next_chunk(&mut self) -> Result<Option<String>> {
		let Some(reader) = self.reader.as_mut() else {
			return Ok(None);
		};

		let mut buffer = Vec::new();
		let read = reader
			.read_until(b'\n', &mut buffer)
			.map_err(|err| CorpusError::MalformedInput(format!("line {}: {err}", self.line + 1)))?;
		if read == 0 {
			return Ok(None);
		}
		self.line += 1;

		if buffer.last() == Some(&b'\n') {
			buffer.pop();
			if buffer.last() == Some(&b'\r') {
				buffer.pop();
			}
		}
		String::from_utf8(buffer)
			.map(Some)
			.map_err(|err| CorpusError::MalformedInput(format!("line {}: {err}", self.line)))
	}

	fn close(&mut self) -> Result<()> {
		self.reader = None;
		Ok(())
	}
}

/// Tokenizes every chunk of `source` into `sink`.
///
/// The source is left open.
pub fn read_tokens<S, F>(source: &mut S, tokenizer: &Tokenizer, mut sink: F) -> Result<()>
where
	S: TextSource + ?Sized,
	F: FnMut(Token<'_>),
{
	while let Some(chunk) = source.next_chunk()? {
		tokenizer.tokenize(&chunk, &mut sink);
	}
	Ok(())
}

/// Like [`read_tokens`] but always closes the source afterwards.
///
/// A read error takes precedence; a close error is only reported when the
/// read succeeded.
pub fn read_tokens_and_close<S, F>(mut source: S, tokenizer: &Tokenizer, sink: F) -> Result<()>
where
	S: TextSource,
	F: FnMut(Token<'_>),
{
	let read = read_tokens(&mut source, tokenizer, sink);
	let closed = source.close();
	read.and(closed)
}

/// Drains `source` into a vector of chunks and closes it, with the same error
/// precedence as [`read_tokens_and_close`].
pub fn read_chunks_and_close<S: TextSource>(mut source: S) -> Result<Vec<String>> {
	let mut chunks = Vec::new();
	let read = loop {
		match source.next_chunk() {
			Ok(Some(chunk)) => chunks.push(chunk),
			Ok(None) => break Ok(()),
			Err(err) => break Err(err),
		}
	};
	let closed = source.close();
	read.and(closed)?;
	Ok(chunks)
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/input.txt` + `"bin"` → `data/input.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Expands the inputs into a sorted list of files.
///
/// Files are kept as given; directories contribute the files directly inside
/// them whose extension is `extension` (subdirectories are ignored).
pub fn collect_files<P: AsRef<Path>>(inputs: &[P], extension: &str) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	for input in inputs {
		let path = input.as_ref();
		if !path.is_dir() {
			files.push(path.to_path_buf());
			continue;
		}

		let mut found = Vec::new();
		let entries = fs::read_dir(path).map_err(|err| CorpusError::io(err, Some(path.to_path_buf())))?;
		for entry in entries {
			let entry = entry.map_err(|err| CorpusError::io(err, Some(path.to_path_buf())))?;
			let entry_path = entry.path();
			if entry_path.is_file() && entry_path.extension() == Some(std::ffi::OsStr::new(extension)) {
				found.push(entry_path);
			}
		}
		found.sort();
		files.extend(found);
	}
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;
	use tempfile::tempdir;

	#[test]
	fn line_source_strips_terminators() {
		let mut source = LineSource::new(Cursor::new("a b\r\nc\n\nd"));
		let mut chunks = Vec::new();
		while let Some(chunk) = source.next_chunk().expect("read") {
			chunks.push(chunk);
		}
		assert_eq!(chunks, ["a b", "c", "", "d"]);
	}

	#[test]
	fn line_source_rejects_invalid_utf8() {
		let mut source = LineSource::new(Cursor::new(b"ok\n\xff\xfe\n".to_vec()));
		assert_eq!(source.next_chunk().expect("first line").as_deref(), Some("ok"));
		let err = source.next_chunk().expect_err("invalid utf-8");
		assert!(matches!(err, CorpusError::MalformedInput(ref msg) if msg.starts_with("line 2")));
	}

	#[test]
	fn closed_source_is_exhausted() {
		let mut source = LineSource::new(Cursor::new("a\nb\n"));
		source.close().expect("close");
		assert!(source.next_chunk().expect("read").is_none());
	}

	#[test]
	fn read_tokens_visits_every_line() {
		let source = LineSource::new(Cursor::new("Leib-Medicus\nDer Studenten,"));
		let mut tokens = Vec::new();
		read_tokens_and_close(source, &Tokenizer::default(), |token| tokens.push(token.to_string()))
			.expect("read");
		assert_eq!(tokens, ["Leib", "-", "Medicus", "Der", " ", "Studenten", ","]);
	}

	#[test]
	fn output_path_replaces_extension() {
		let path = build_output_path("data/input.txt", "bin").expect("path");
		assert_eq!(path, PathBuf::from("data/input.bin"));
		assert!(build_output_path("", "bin").is_err());
	}

	#[test]
	fn collect_files_expands_directories() {
		let dir = tempdir().expect("tempdir");
		let a = dir.path().join("a.txt");
		let b = dir.path().join("b.txt");
		fs::write(&b, "b").expect("write b");
		fs::write(&a, "a").expect("write a");
		fs::write(dir.path().join("c.json"), "{}").expect("write c");
		fs::create_dir(dir.path().join("nested")).expect("mkdir");

		let files = collect_files(&[dir.path()], "txt").expect("collect");
		assert_eq!(files, vec![a, b]);
	}
}
