use flactag_util::logging::LoggingPreset;
use serde::Deserialize;
use std::path::PathBuf;

/// Note that the field of this struct are not capitalized.
/// Envy is case-insensitive, and expects Rust fields to be snake_case.
#[derive(Debug, Deserialize, Clone)]
pub struct FlactagConfig {
	/// The logging level to run with
	#[serde(default)]
	pub flactag_loglevel: LoggingPreset,

	/// The genre table to use when no `--genre` is given.
	/// One `raw|canonical` pair per line.
	#[serde(default)]
	pub flactag_genre_table: Option<PathBuf>,
}
