//! Decoders for all flac block types we keep

use std::io::{Cursor, Read};

mod header;
pub use header::{FlacMetablockHeader, FlacMetablockType};

mod streaminfo;
pub use streaminfo::FlacStreaminfoBlock;

mod application;
pub use application::FlacApplicationBlock;

mod seektable;
pub use seektable::{FlacSeekPoint, FlacSeektableBlock};

mod cuesheet;
pub use cuesheet::FlacCuesheetBlock;

mod picture;
pub use picture::FlacPictureBlock;

mod comment;
pub use comment::FlacCommentBlock;

use super::errors::FlacDecodeError;

/// A decode implementation for a
/// flac metadata block
pub trait FlacMetablockDecode: Sized {
	/// The block type this decoder reads
	const BLOCK_TYPE: FlacMetablockType;

	/// Try to decode this block from the bytes of its body
	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError>;
}

/// Read exactly `buf.len()` bytes of a block body.
/// Running out of data means a field overruns its block.
pub(crate) fn read_field(
	d: &mut Cursor<&[u8]>,
	buf: &mut [u8],
	block: FlacMetablockType,
	reason: &'static str,
) -> Result<(), FlacDecodeError> {
	match d.read_exact(buf) {
		Ok(()) => Ok(()),
		Err(_) => Err(FlacDecodeError::MalformedBlock { block, reason }),
	}
}

/// Read a big-endian u32 from a block body
pub(crate) fn read_u32_be(
	d: &mut Cursor<&[u8]>,
	block: FlacMetablockType,
	reason: &'static str,
) -> Result<u32, FlacDecodeError> {
	let mut buf = [0u8; 4];
	read_field(d, &mut buf, block, reason)?;
	Ok(u32::from_be_bytes(buf))
}

/// Read `length` bytes from a block body, without trusting
/// `length` enough to allocate it up front.
pub(crate) fn read_vec(
	d: &mut Cursor<&[u8]>,
	length: u32,
	block: FlacMetablockType,
	reason: &'static str,
) -> Result<Vec<u8>, FlacDecodeError> {
	let mut data = Vec::new();
	d.by_ref().take(u64::from(length)).read_to_end(&mut data)?;
	if data.len() as u64 != u64::from(length) {
		return Err(FlacDecodeError::MalformedBlock { block, reason });
	}
	Ok(data)
}
