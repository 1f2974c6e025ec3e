use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cgram_core::io::{LineSource, build_output_path, collect_files, read_tokens_and_close};
use cgram_core::{BuildConfig, Encoding, Level, Pipeline, Scheme, Statistics, TokenType, TokenTypes, Tokenizer};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{LevelFilter, debug, info};

/// Extension of the text files picked up from input directories.
const TEXT_EXTENSION: &str = "txt";

#[derive(Parser, Debug)]
#[command(author, version, about = "Token and character n-gram statistics for text corpora", long_about = None)]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Tokenize text files and build a frequency table
	Build(BuildArgs),
	/// Merge frequency tables of the same level
	Merge(MergeArgs),
	/// Look up an n-gram count in a table
	Query(QueryArgs),
	/// Print the tokens of text files, one per line
	Tokenize(TokenizeArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
	/// Text files, or directories of .txt files
	#[arg(required = true)]
	inputs: Vec<PathBuf>,

	/// Output path (defaults to the first input with the format's extension)
	#[arg(short, long, value_name = "PATH")]
	output: Option<PathBuf>,

	#[arg(long, value_enum, default_value_t = LevelArg::Unigrams)]
	level: LevelArg,

	#[arg(long, value_enum, default_value_t = SchemeArg::ThreeClass)]
	scheme: SchemeArg,

	/// Token types to count (comma separated, defaults to all)
	#[arg(long, value_enum, value_delimiter = ',')]
	types: Vec<TypeArg>,

	#[arg(long, value_enum, default_value_t = FormatArg::Json)]
	format: FormatArg,

	/// Worker threads (0 = one per CPU)
	#[arg(long, value_name = "N", default_value_t = 0)]
	workers: usize,
}

#[derive(Args, Debug)]
struct MergeArgs {
	/// Tables to merge; their encoding is taken from the extension when known
	#[arg(required = true)]
	inputs: Vec<PathBuf>,

	#[arg(short, long, value_name = "PATH")]
	output: PathBuf,

	#[arg(long, value_enum, default_value_t = LevelArg::Unigrams)]
	level: LevelArg,

	#[arg(long, value_enum, default_value_t = FormatArg::Json)]
	format: FormatArg,
}

#[derive(Args, Debug)]
struct QueryArgs {
	input: PathBuf,

	/// One key per nesting level (1 for unigrams and char3grams, 3 for trigrams)
	#[arg(required = true)]
	keys: Vec<String>,

	#[arg(long, value_enum, default_value_t = LevelArg::Unigrams)]
	level: LevelArg,

	/// Input encoding (defaults to the one implied by the extension)
	#[arg(long, value_enum)]
	format: Option<FormatArg>,
}

#[derive(Args, Debug)]
struct TokenizeArgs {
	#[arg(required = true)]
	inputs: Vec<PathBuf>,

	#[arg(long, value_enum, default_value_t = SchemeArg::ThreeClass)]
	scheme: SchemeArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LevelArg {
	Char3grams,
	Unigrams,
	Bigrams,
	Trigrams,
}

impl From<LevelArg> for Level {
	fn from(level: LevelArg) -> Self {
		match level {
			LevelArg::Char3grams => Level::Char3Grams,
			LevelArg::Unigrams => Level::Unigrams,
			LevelArg::Bigrams => Level::Bigrams,
			LevelArg::Trigrams => Level::Trigrams,
		}
	}
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemeArg {
	ThreeClass,
	FourClass,
}

impl From<SchemeArg> for Scheme {
	fn from(scheme: SchemeArg) -> Self {
		match scheme {
			SchemeArg::ThreeClass => Scheme::ThreeClass,
			SchemeArg::FourClass => Scheme::FourClass,
		}
	}
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
	Word,
	Number,
	Punctuation,
	Mixed,
	Empty,
}

impl From<TypeArg> for TokenType {
	fn from(token_type: TypeArg) -> Self {
		match token_type {
			TypeArg::Word => TokenType::Word,
			TypeArg::Number => TokenType::Number,
			TypeArg::Punctuation => TokenType::Punctuation,
			TypeArg::Mixed => TokenType::Mixed,
			TypeArg::Empty => TokenType::Empty,
		}
	}
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
	Json,
	Binary,
}

impl From<FormatArg> for Encoding {
	fn from(format: FormatArg) -> Self {
		match format {
			FormatArg::Json => Encoding::Json,
			FormatArg::Binary => Encoding::Binary,
		}
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	match cli.command {
		Commands::Build(args) => run_build(args),
		Commands::Merge(args) => run_merge(args),
		Commands::Query(args) => run_query(args),
		Commands::Tokenize(args) => run_tokenize(args),
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	let level = match (quiet, verbose) {
		(0, 0) => LevelFilter::Info,
		(0, 1) => LevelFilter::Debug,
		(0, _) => LevelFilter::Trace,
		(1, _) => LevelFilter::Warn,
		_ => LevelFilter::Error,
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
	builder.format_timestamp_millis();
	builder.filter_level(level);
	let _ = builder.try_init();
}

fn token_types(types: &[TypeArg]) -> TokenTypes {
	if types.is_empty() {
		return TokenTypes::ALL;
	}
	types
		.iter()
		.fold(TokenTypes::NONE, |acc, &token_type| acc | TokenType::from(token_type))
}

fn input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
	let files = collect_files(inputs, TEXT_EXTENSION).context("failed to list inputs")?;
	if files.is_empty() {
		bail!("no .{TEXT_EXTENSION} files found in the given inputs");
	}
	Ok(files)
}

/// Encoding of an existing table: its extension when recognised, `fallback`
/// otherwise.
fn encoding_of(path: &Path, fallback: Encoding) -> Encoding {
	Encoding::from_path(path).unwrap_or(fallback)
}

fn run_build(args: BuildArgs) -> Result<()> {
	let config = BuildConfig::builder()
		.level(args.level.into())
		.scheme(args.scheme.into())
		.token_types(token_types(&args.types))
		.workers(args.workers)
		.encoding(args.format.into())
		.build()
		.context("invalid build options")?;
	let encoding = config.encoding;
	let pipeline = Pipeline::new(config)?;

	let files = input_files(&args.inputs)?;
	let mut statistics = Statistics::empty(args.level.into());
	for file in &files {
		let source = LineSource::open(file)?;
		let partial = pipeline
			.build_source(source)
			.with_context(|| format!("failed to build statistics from {}", file.display()))?;
		statistics.merge(&partial)?;
	}

	let output = match args.output {
		Some(output) => output,
		None => build_output_path(&args.inputs[0], encoding.extension())
			.with_context(|| format!("cannot derive an output path from {}", args.inputs[0].display()))?,
	};
	statistics
		.save(&output, encoding)
		.with_context(|| format!("failed to save statistics to {}", output.display()))?;
	info!(
		"wrote {} ({} files, total {}, distinct {})",
		output.display(),
		files.len(),
		statistics.total(),
		statistics.len()
	);
	Ok(())
}

fn run_merge(args: MergeArgs) -> Result<()> {
	let level = Level::from(args.level);
	let encoding = Encoding::from(args.format);

	let mut statistics = Statistics::empty(level);
	for input in &args.inputs {
		let table = Statistics::load(input, level, encoding_of(input, encoding))
			.with_context(|| format!("failed to load {}", input.display()))?;
		debug!("loaded {} (total {})", input.display(), table.total());
		statistics.merge(&table)?;
	}

	statistics
		.save(&args.output, encoding)
		.with_context(|| format!("failed to save statistics to {}", args.output.display()))?;
	info!(
		"merged {} tables into {} (total {}, distinct {})",
		args.inputs.len(),
		args.output.display(),
		statistics.total(),
		statistics.len()
	);
	Ok(())
}

fn run_query(args: QueryArgs) -> Result<()> {
	let level = Level::from(args.level);
	let encoding = match args.format {
		Some(format) => format.into(),
		None => encoding_of(&args.input, Encoding::default()),
	};
	let statistics = Statistics::load(&args.input, level, encoding)
		.with_context(|| format!("failed to load {}", args.input.display()))?;
	let count = statistics.lookup(&args.keys)?;

	let mut out = io::stdout().lock();
	writeln!(out, "count\t{count}")?;
	writeln!(out, "total\t{}", statistics.total())?;
	writeln!(out, "distinct\t{}", statistics.len())?;
	Ok(())
}

fn run_tokenize(args: TokenizeArgs) -> Result<()> {
	let tokenizer = Tokenizer::new(args.scheme.into());
	let mut out = BufWriter::new(io::stdout().lock());
	for file in input_files(&args.inputs)? {
		let source = LineSource::open(&file)?;
		let mut written = Ok(());
		read_tokens_and_close(source, &tokenizer, |token| {
			if written.is_ok() {
				written = writeln!(out, "{:?}\t[{token}]", token.token_type());
			}
		})
		.with_context(|| format!("failed to tokenize {}", file.display()))?;
		written?;
	}
	out.flush()?;
	Ok(())
}
