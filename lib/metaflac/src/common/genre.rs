//! A table of genre substitutions

use std::{
	collections::HashMap,
	fs::File,
	io::{BufRead, BufReader},
	path::Path,
};
use thiserror::Error;
use tracing::debug;

/// An error we can encounter while loading a genre table
#[derive(Debug, Error)]
pub enum GenreTableError {
	/// We could not read the table
	#[error("io error while reading genre table")]
	IoError(#[from] std::io::Error),

	/// A line isn't a `raw|canonical` pair
	#[error("line {line}: expected `raw|canonical`, got `{text}`")]
	MalformedLine {
		/// The 1-based line number
		line: usize,

		/// The offending line
		text: String,
	},
}

/// Maps genre strings found in files to the genre we want instead
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreTable {
	genres: HashMap<String, String>,
}

impl GenreTable {
	/// Make an empty table
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a substitution, replacing any previous one for `raw`
	pub fn insert(&mut self, raw: impl Into<String>, canonical: impl Into<String>) {
		self.genres.insert(raw.into(), canonical.into());
	}

	/// Find the canonical genre for `raw`.
	/// Lookups are exact, including case.
	pub fn lookup(&self, raw: &str) -> Option<&str> {
		self.genres.get(raw).map(|x| x.as_str())
	}

	/// The number of substitutions in this table
	pub fn len(&self) -> usize {
		self.genres.len()
	}

	/// True if this table has no substitutions
	pub fn is_empty(&self) -> bool {
		self.genres.is_empty()
	}

	/// Read a table with one `raw|canonical` pair per line.
	/// Blank lines and lines starting with `#` are skipped.
	/// Later lines override earlier ones.
	pub fn from_reader<R: BufRead>(read: R) -> Result<Self, GenreTableError> {
		let mut table = Self::new();

		for (i, line) in read.lines().enumerate() {
			let line = line?;
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}

			match line.split_once('|') {
				Some((raw, canonical)) if !canonical.contains('|') => {
					table.insert(raw, canonical);
				}
				_ => {
					return Err(GenreTableError::MalformedLine {
						line: i + 1,
						text: line.into(),
					})
				}
			}
		}

		return Ok(table);
	}

	/// Load a genre table from a file.
	/// See [`GenreTable::from_reader`].
	pub fn load(path: &Path) -> Result<Self, GenreTableError> {
		let table = Self::from_reader(BufReader::new(File::open(path)?))?;
		debug!(message = "Loaded genre table", ?path, entries = table.len());
		return Ok(table);
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GenreTable {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut table = Self::new();
		for (raw, canonical) in iter {
			table.insert(raw, canonical);
		}
		table
	}
}
