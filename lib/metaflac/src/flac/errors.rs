//! FLAC errors
use crate::common::vorbiscomment::VorbisCommentDecodeError;
use smartstring::{LazyCompact, SmartString};
use std::string::FromUtf8Error;
use thiserror::Error;

use super::blocks::FlacMetablockType;

/// The broad class of a decode failure.
/// None of these are recoverable for the file that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlacErrorKind {
	/// The data breaks the flac format
	Format,

	/// The data ended before a declared field did
	Truncation,

	/// A text field isn't valid UTF-8
	Encoding,

	/// The underlying reader failed
	Io,
}

/// An error we can encounter while decoding flac metadata
#[derive(Debug, Error)]
pub enum FlacDecodeError {
	/// FLAC does not start with 0x66 0x4C 0x61 0x43
	#[error("flac signature is missing or malformed, found `{}`", .0.escape_ascii())]
	BadMagicBytes([u8; 4]),

	/// We got a reserved metadata block type (7 - 126)
	#[error("reserved flac metablock type {0}")]
	ReservedMetablockType(u8),

	/// We got metadata block type 127,
	/// which is forbidden to avoid confusion with a frame sync code.
	#[error("invalid flac metablock type 127")]
	InvalidMetablockType,

	/// A block's contents don't match its declared layout
	#[error("malformed {block} block: {reason}")]
	MalformedBlock {
		/// The block we were decoding
		block: FlacMetablockType,

		/// What was wrong with it
		reason: &'static str,
	},

	/// We reached the end of the input while reading a declared span
	#[error("unexpected end of data while reading {0}")]
	Truncated(&'static str),

	/// We tried to decode a string, but found invalid UTF-8
	#[error("invalid utf-8 in {field}")]
	FailedStringDecode {
		/// The field we were decoding
		field: &'static str,

		/// The underlying error
		#[source]
		source: FromUtf8Error,
	},

	/// We could not parse a vorbis comment
	#[error("error while decoding vorbis comment: {0}")]
	VorbisComment(#[from] VorbisCommentDecodeError),

	/// We encountered an i/o error while processing
	#[error("io error while reading flac")]
	IoError(#[from] std::io::Error),
}

impl FlacDecodeError {
	/// The class of this error
	pub fn kind(&self) -> FlacErrorKind {
		match self {
			Self::BadMagicBytes(_)
			| Self::ReservedMetablockType(_)
			| Self::InvalidMetablockType
			| Self::MalformedBlock { .. } => FlacErrorKind::Format,
			Self::Truncated(_) => FlacErrorKind::Truncation,
			Self::FailedStringDecode { .. } => FlacErrorKind::Encoding,
			Self::VorbisComment(e) => e.kind(),
			Self::IoError(_) => FlacErrorKind::Io,
		}
	}
}

/// An error produced while reading a flac file.
/// Carries the file it came from and where in it the error occurred.
#[derive(Debug, Error)]
#[error("`{file}` at offset {offset}: {error}")]
pub struct FlacReadError {
	/// The file we were reading
	pub file: SmartString<LazyCompact>,

	/// The byte offset of the span we failed to read
	pub offset: u64,

	/// What went wrong
	#[source]
	pub error: FlacDecodeError,
}

impl FlacReadError {
	/// The class of this error
	pub fn kind(&self) -> FlacErrorKind {
		self.error.kind()
	}
}
