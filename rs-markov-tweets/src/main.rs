use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use log::{debug, error};

use rs_markov_core::corpus::read_words;
use rs_markov_core::{Chain, ChainError, Generator};

const FAILED_OPEN_FILE: &str = "Error: Failed to open file, make sure you use absolute path.";
const ALLOCATION_FAILURE: &str = "Allocation failure: Failed to allocate new memory";
const NO_WORDS: &str = "Error: The input file contains no words.";
const NO_START_WORD: &str = "Error: Every word of the input file ends a sentence.";

/// Generates random "tweets" from a text file using a word chain.
#[derive(Parser, Debug)]
#[command(name = "tweets", version)]
struct Args {
	/// Seed of the random generator.
	seed: u64,

	/// Number of tweets to generate.
	count: usize,

	/// Path to the input text file.
	path: PathBuf,

	/// Number of words to read from the file (whole file if omitted).
	#[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
	words: Option<usize>,

	/// Maximum number of words in a tweet.
	#[arg(long, default_value_t = 20, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
	max_length: usize,
}

fn main() -> ExitCode {
	env_logger::init();
	let args = Args::parse();

	let chain = match load_chain(&args.path, args.words) {
		Ok(chain) => chain,
		Err(message) => {
			println!("{message}");
			return ExitCode::FAILURE;
		}
	};

	let mut out = BufWriter::new(io::stdout().lock());
	let result = write_tweets(&chain, &args, &mut out).and_then(|()| out.flush().map_err(anyhow::Error::from));
	chain.teardown();

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			match e.downcast_ref::<ChainError>() {
				Some(ChainError::EmptyChain) => println!("{NO_WORDS}"),
				Some(ChainError::NoValidStartState { .. }) => println!("{NO_START_WORD}"),
				_ => error!("{e:#}"),
			}
			ExitCode::FAILURE
		}
	}
}

/// Reads the input file and builds the chain.
///
/// Returns the user-facing failure message on error.
fn load_chain(path: &Path, words: Option<usize>) -> Result<Chain, &'static str> {
	let words = read_words(path, words).map_err(|e| {
		debug!("{}: {e}", path.display());
		FAILED_OPEN_FILE
	})?;

	let mut chain = Chain::new();
	chain.ingest(&words).map_err(|e| {
		debug!("ingestion failed: {e}");
		ALLOCATION_FAILURE
	})?;
	Ok(chain)
}

/// Writes `args.count` numbered tweets, one per line.
///
/// Nothing is written if the chain cannot start a tweet.
fn write_tweets<W: Write>(chain: &Chain, args: &Args, out: &mut W) -> anyhow::Result<()> {
	let mut generator = Generator::seeded(args.seed);

	for i in 1..=args.count {
		let tweet = generator.generate(chain, None, args.max_length)?;
		writeln!(out, "Tweet {i}: {tweet}")?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn story() -> Chain {
		let mut chain = Chain::new();
		chain
			.ingest(["the", "cat", "sat", "down.", "the", "dog", "ran."])
			.unwrap();
		chain
	}

	fn args(count: usize, max_length: usize) -> Args {
		Args { seed: 3, count, path: PathBuf::from("story.txt"), words: None, max_length }
	}

	#[test]
	fn positional_arguments_parse() {
		let args = Args::try_parse_from(["tweets", "7", "3", "/tmp/corpus.txt", "100"]).unwrap();
		assert_eq!(args.seed, 7);
		assert_eq!(args.count, 3);
		assert_eq!(args.path, PathBuf::from("/tmp/corpus.txt"));
		assert_eq!(args.words, Some(100));
		assert_eq!(args.max_length, 20);
	}

	#[test]
	fn word_limit_is_optional() {
		let args = Args::try_parse_from(["tweets", "1", "2", "corpus.txt", "--max-length", "5"]).unwrap();
		assert_eq!(args.words, None);
		assert_eq!(args.max_length, 5);
	}

	#[test]
	fn missing_arguments_are_rejected() {
		assert!(Args::try_parse_from(["tweets", "1", "2"]).is_err());
		assert!(Args::try_parse_from(["tweets", "1", "2", "corpus.txt", "0"]).is_err());
		assert!(Args::try_parse_from(["tweets", "1", "2", "corpus.txt", "--max-length", "0"]).is_err());
		assert!(Args::try_parse_from(["tweets", "x", "2", "corpus.txt"]).is_err());
	}

	#[test]
	fn tweets_are_numbered_lines() {
		let chain = story();
		let mut out = Vec::new();
		write_tweets(&chain, &args(4, 20), &mut out).unwrap();

		let text = String::from_utf8(out).unwrap();
		assert!(text.ends_with('\n'));
		let lines: Vec<&str> = text.split_terminator('\n').collect();
		assert_eq!(lines.len(), 4);
		for (i, line) in lines.iter().enumerate() {
			let prefix = format!("Tweet {}: ", i + 1);
			let body = line.strip_prefix(&prefix).unwrap_or_else(|| panic!("bad prefix in {line:?}"));
			assert!(!body.starts_with(' ') && !body.ends_with(' ') && !body.contains("  "));
			assert!(body.split(' ').all(|word| chain.find(word).is_some()), "unknown word in {body:?}");
		}
	}

	#[test]
	fn length_cap_shortens_tweets() {
		let chain = story();
		let mut out = Vec::new();
		write_tweets(&chain, &args(3, 1), &mut out).unwrap();

		let text = String::from_utf8(out).unwrap();
		for line in text.lines() {
			let (_, body) = line.split_once(": ").unwrap();
			assert_eq!(body.split(' ').count(), 1);
		}
	}

	#[test]
	fn all_terminal_chain_writes_nothing() {
		let mut chain = Chain::new();
		chain.ingest(["one.", "two."]).unwrap();
		let mut out = Vec::new();

		let err = write_tweets(&chain, &args(2, 20), &mut out).unwrap_err();
		assert!(matches!(err.downcast_ref::<ChainError>(), Some(ChainError::NoValidStartState { .. })));
		assert!(out.is_empty());
	}

	#[test]
	fn empty_chain_writes_nothing() {
		let mut out = Vec::new();
		let err = write_tweets(&Chain::new(), &args(1, 20), &mut out).unwrap_err();
		assert_eq!(err.downcast_ref::<ChainError>(), Some(&ChainError::EmptyChain));
		assert!(out.is_empty());
	}

	#[test]
	fn latin1_file_builds_a_chain() {
		let path = std::env::temp_dir().join(format!("rs-markov-tweets-latin1-{}.txt", std::process::id()));
		std::fs::write(&path, b"caf\xe9 is open.\n").unwrap();

		let chain = load_chain(&path, None);
		std::fs::remove_file(&path).unwrap();

		let chain = chain.unwrap();
		assert_eq!(chain.len(), 3);
		assert!(chain.find("open.").is_some());
	}

	#[test]
	fn missing_file_reports_open_failure() {
		let result = load_chain(Path::new("/nonexistent/rs-markov/tweets.txt"), None);
		assert_eq!(result.err(), Some(FAILED_OPEN_FILE));
	}
}
