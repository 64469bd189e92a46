use serde::Deserialize;
use std::{fmt::Display, str::FromStr};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl Default for LogLevel {
	fn default() -> Self {
		Self::Info
	}
}

impl Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Trace => write!(f, "trace"),
			Self::Debug => write!(f, "debug"),
			Self::Info => write!(f, "info"),
			Self::Warn => write!(f, "warn"),
			Self::Error => write!(f, "error"),
		}
	}
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LoggingPreset {
	Default,
	Verbose,
	Develop,
	Trace,
}

impl Default for LoggingPreset {
	fn default() -> Self {
		return Self::Default;
	}
}

impl FromStr for LoggingPreset {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.to_lowercase().as_str() {
			"default" => Self::Default,
			"verbose" => Self::Verbose,
			"develop" => Self::Develop,
			"trace" => Self::Trace,
			_ => return Err(format!("unknown logging preset `{s}`")),
		})
	}
}

impl LoggingPreset {
	pub fn get_config(&self) -> LoggingConfig {
		match self {
			Self::Default => LoggingConfig {
				other: LogLevel::Warn,
				flactag: LogLevel::Info,
				metaflac: LogLevel::Warn,
			},

			Self::Verbose => LoggingConfig {
				other: LogLevel::Warn,
				flactag: LogLevel::Debug,
				metaflac: LogLevel::Info,
			},

			Self::Develop => LoggingConfig {
				other: LogLevel::Debug,
				flactag: LogLevel::Trace,
				metaflac: LogLevel::Debug,
			},

			Self::Trace => LoggingConfig {
				other: LogLevel::Trace,
				flactag: LogLevel::Trace,
				metaflac: LogLevel::Trace,
			},
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig {
	other: LogLevel,

	/// The command-line front end
	flactag: LogLevel,

	/// The parser library
	metaflac: LogLevel,
}

impl LoggingConfig {
	/// The filter directives for this config, comma-separated
	pub fn directives(&self) -> String {
		[
			format!("flactag={}", self.flactag),
			format!("flactag_metaflac={}", self.metaflac),
			self.other.to_string(),
		]
		.join(",")
	}
}

impl From<LoggingConfig> for EnvFilter {
	fn from(value: LoggingConfig) -> Self {
		// Directives are built from known targets and levels,
		// so they always parse.
		EnvFilter::from_str(&value.directives()).unwrap_or_else(|_err| EnvFilter::new("warn"))
	}
}
