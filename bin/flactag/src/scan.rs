use flactag_metaflac::{CommentEvent, FlacFile, FlacReadError, GenreTable};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Totals for one scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
	/// Files we read successfully
	pub parsed: usize,

	/// Files we could not read
	pub failed: usize,

	/// Files whose tags should be rewritten
	pub needs_rewrite: usize,
}

/// What we learned from one flac file
#[derive(Debug, Clone)]
pub struct FileReport {
	/// The file starts with an id3v2 tag, which should be stripped
	pub has_id3: bool,

	/// Normalizing this file's comments changed them
	pub changed: bool,

	/// The normalized tags as `KEY=value` lines
	pub tag_lines: Vec<String>,
}

impl FileReport {
	pub fn needs_rewrite(&self) -> bool {
		self.has_id3 || self.changed
	}
}

/// Find the flac files to scan, sorted by path.
///
/// Unless `recursive` is set, only files exactly two levels
/// below `folder` are found (`<folder>/<album>/<track>.flac`).
pub fn find_files(folder: &Path, recursive: bool) -> Vec<PathBuf> {
	let mut walk = WalkDir::new(folder).sort_by_file_name();
	if !recursive {
		walk = walk.min_depth(2).max_depth(2);
	}

	let mut files = Vec::new();
	for entry in walk {
		let entry = match entry {
			Ok(x) => x,
			Err(error) => {
				warn!(message = "Could not read directory entry", %error);
				continue;
			}
		};

		if entry.file_type().is_dir() {
			continue;
		}

		if entry.path().extension().is_some_and(|x| x == "flac") {
			files.push(entry.into_path());
		}
	}

	files.sort();
	return files;
}

/// Read one file and normalize its comments
pub fn check_file(path: &Path, genres: Option<&GenreTable>) -> Result<FileReport, FlacReadError> {
	let flac = FlacFile::open(path)?;

	let Some(comments) = flac.vorbis_comment(genres)? else {
		debug!(message = "File has no vorbis comment", file = flac.file());
		return Ok(FileReport {
			has_id3: flac.has_id3(),
			changed: false,
			tag_lines: Vec::new(),
		});
	};

	for event in &comments.events {
		match event {
			CommentEvent::GenreMiss { value } => {
				warn!(
					message = "Genre not in genre table",
					file = flac.file(),
					genre = value.as_str()
				);
			}
			CommentEvent::GenreReplaced { from, to } => {
				debug!(
					message = "Replaced genre",
					file = flac.file(),
					from = from.as_str(),
					to = to.as_str()
				);
			}
		}
	}

	return Ok(FileReport {
		has_id3: flac.has_id3(),
		changed: comments.changed,
		tag_lines: comments.tags.tag_lines(),
	});
}

#[expect(clippy::print_stdout)]
fn print_tags(path: &Path, report: &FileReport) {
	println!("# {}", path.display());
	for line in &report.tag_lines {
		println!("{line}");
	}
	println!();
}

/// Check every flac file below `folder`.
/// Files we can't read are logged and skipped.
pub fn scan(folder: &Path, recursive: bool, genres: Option<&GenreTable>) -> ScanSummary {
	let mut summary = ScanSummary::default();

	for path in find_files(folder, recursive) {
		let report = match check_file(&path, genres) {
			Ok(x) => x,
			Err(error) => {
				error!(message = "Could not read flac file", %error, kind = ?error.kind());
				summary.failed += 1;
				continue;
			}
		};

		summary.parsed += 1;
		if report.needs_rewrite() {
			info!(
				message = "File needs rewrite",
				file = %path.display(),
				id3 = report.has_id3,
				changed = report.changed
			);
			summary.needs_rewrite += 1;
			print_tags(&path, &report);
		}
	}

	return summary;
}
