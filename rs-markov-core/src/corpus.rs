use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Splits a line of text into words.
///
/// - Words are whitespace-delimited
/// - Empty tokens are dropped
/// - Line terminators (`\r`, `\n`) are never part of a word
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
	line.split_whitespace()
}

/// Reads a text file and returns its words in order.
///
/// - Reads the file line by line, as raw bytes
/// - Bytes that are not valid UTF-8 are replaced by `U+FFFD`
/// - Stops after `limit` words when a limit is given
pub fn read_words<P: AsRef<Path>>(filename: P, limit: Option<usize>) -> io::Result<Vec<String>> {
	let mut reader = BufReader::new(File::open(filename)?);
	let limit = limit.unwrap_or(usize::MAX);
	let mut words = Vec::new();
	let mut buffer = Vec::new();

	loop {
		buffer.clear();
		if reader.read_until(b'\n', &mut buffer)? == 0 {
			break;
		}
		let line = String::from_utf8_lossy(&buffer);
		for word in tokenize(&line) {
			if words.len() == limit {
				return Ok(words);
			}
			words.push(word.to_owned());
		}
	}

	Ok(words)
}
