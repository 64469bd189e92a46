//! Find the start of flac metadata in a byte stream.

use std::io::{ErrorKind, Read, Seek, SeekFrom};
use tracing::debug;

use super::errors::FlacDecodeError;

/// "fLaC", the flac stream marker
pub const FLAC_MARKER: [u8; 4] = [0x66, 0x4C, 0x61, 0x43];

const ID3_MAGIC: [u8; 3] = [0x49, 0x44, 0x33];

/// The length of an id3v2 header, in bytes
pub const ID3_HEADER_LEN: u64 = 10;

/// The header of an id3v2 tag that precedes flac data.
/// Only the size is used, the rest is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3Header {
	/// The id3v2 major version
	pub major_version: u8,

	/// The id3v2 revision
	pub revision: u8,

	/// The id3v2 header flags
	pub flags: u8,

	/// The size of the tag, not including its 10-byte header
	pub size: u32,
}

impl Id3Header {
	/// Decode a 10-byte id3v2 header.
	/// The first three bytes ("ID3") are not checked.
	pub fn decode(header: [u8; 10]) -> Self {
		Self {
			major_version: header[3],
			revision: header[4],
			flags: header[5],
			size: synchsafe_u32([header[6], header[7], header[8], header[9]]),
		}
	}

	/// The offset of the first byte after this tag,
	/// relative to the start of the tag.
	pub fn end_offset(&self) -> u64 {
		ID3_HEADER_LEN + u64::from(self.size)
	}
}

/// Decode a big-endian synchsafe integer:
/// each byte carries 7 significant bits.
pub fn synchsafe_u32(bytes: [u8; 4]) -> u32 {
	bytes
		.iter()
		.zip([21u32, 14, 7, 0])
		.map(|(b, shift)| u32::from(*b) << shift)
		.sum()
}

/// Fill `buf` from `read`.
/// Reaching end-of-file first is a truncation error, never a short read.
pub(crate) fn read_span<R: Read>(
	read: &mut R,
	buf: &mut [u8],
	what: &'static str,
) -> Result<(), FlacDecodeError> {
	match read.read_exact(buf) {
		Ok(()) => Ok(()),
		Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(FlacDecodeError::Truncated(what)),
		Err(e) => Err(e.into()),
	}
}

/// Seek `read` to the offset the flac marker should be at,
/// skipping a leading id3v2 tag if there is one.
///
/// `read` may be positioned anywhere, the search starts at offset 0.
/// Returns the header of the id3 tag we skipped.
pub(crate) fn skip_id3<R: Read + Seek>(read: &mut R) -> Result<Option<Id3Header>, FlacDecodeError> {
	read.seek(SeekFrom::Start(0))?;

	let mut magic = [0u8; 3];
	read_span(read, &mut magic, "file signature")?;
	read.seek(SeekFrom::Start(0))?;

	if magic != ID3_MAGIC {
		return Ok(None);
	}

	let mut header = [0u8; 10];
	read_span(read, &mut header, "id3 header")?;
	let id3 = Id3Header::decode(header);

	debug!(
		message = "Skipping id3 tag",
		version = id3.major_version,
		size = id3.size
	);

	read.seek(SeekFrom::Start(id3.end_offset()))?;
	return Ok(Some(id3));
}

/// Read the flac marker at the current position of `read`
pub(crate) fn read_marker<R: Read>(read: &mut R) -> Result<(), FlacDecodeError> {
	let mut marker = [0u8; 4];
	read_span(read, &mut marker, "flac marker")?;
	if marker != FLAC_MARKER {
		return Err(FlacDecodeError::BadMagicBytes(marker));
	}

	return Ok(());
}
