use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::FlactagConfig;
use flactag_metaflac::GenreTable;
use flactag_util::{load_env, logging::LoggingPreset, LoadedEnv};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod config;
mod scan;
mod show;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
	#[command(subcommand)]
	command: Commands,

	/// Logging preset, overrides `FLACTAG_LOGLEVEL`
	#[arg(long, global = true)]
	loglevel: Option<LoggingPreset>,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Find flac files in `<folder>/<album>/` whose tags should be rewritten
	Scan {
		folder: PathBuf,

		/// Genre table, one `raw|canonical` pair per line
		#[arg(long, short)]
		genre: Option<PathBuf>,

		/// Find flac files at any depth below `folder`
		#[arg(long, short)]
		recursive: bool,
	},

	/// Print every metadata block of one flac file
	Show {
		file: PathBuf,

		/// Genre table, one `raw|canonical` pair per line
		#[arg(long, short)]
		genre: Option<PathBuf>,
	},
}

fn load_genres(path: Option<&Path>) -> Result<Option<GenreTable>> {
	let Some(path) = path else {
		debug!(message = "No genre table, genres will not be replaced");
		return Ok(None);
	};

	let table = GenreTable::load(path)
		.with_context(|| format!("while loading genre table `{}`", path.display()))?;
	info!(message = "Loaded genre table", ?path, entries = table.len());
	return Ok(Some(table));
}

fn main() -> Result<()> {
	let cli = Args::parse();

	let config_res = match load_env::<FlactagConfig>() {
		Ok(x) => x,

		#[expect(clippy::print_stderr)]
		Err(err) => {
			eprintln!("Error while loading .env: {err}");
			std::process::exit(1);
		}
	};

	let config = config_res.get_config().clone();

	// Stdout is reserved for tag lines
	tracing_subscriber::fmt()
		.with_env_filter(cli.loglevel.unwrap_or(config.flactag_loglevel).get_config())
		.without_time()
		.with_ansi(true)
		.with_writer(std::io::stderr)
		.init();

	// Do this now, logging wasn't available earlier
	match config_res {
		LoadedEnv::FoundFile { config, path } => {
			debug!(message = "Loaded config from .env", ?path, ?config);
		}
		LoadedEnv::OnlyVars(config) => {
			debug!(
				message = "No `.env` found, loaded config from environment",
				?config
			);
		}
	};

	match cli.command {
		Commands::Scan {
			folder,
			genre,
			recursive,
		} => {
			let genres = load_genres(genre.or(config.flactag_genre_table).as_deref())?;
			let summary = scan::scan(&folder, recursive, genres.as_ref());

			info!(
				message = "Scan finished",
				parsed = summary.parsed,
				failed = summary.failed,
				needs_rewrite = summary.needs_rewrite
			);
		}

		Commands::Show { file, genre } => {
			let genres = load_genres(genre.or(config.flactag_genre_table).as_deref())?;
			show::show(&file, genres.as_ref())?;
		}
	}

	return Ok(());
}
