//! FLAC metablock headers
use std::fmt::Display;

use crate::flac::errors::FlacDecodeError;

/// A type of flac metadata block
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum FlacMetablockType {
	/// Stream parameters, type 0
	Streaminfo,

	/// Zeroed space, type 1
	Padding,

	/// Data for a registered application, type 2
	Application,

	/// Seek points into the audio stream, type 3
	Seektable,

	/// Vorbis comment tags, type 4
	VorbisComment,

	/// A cd cuesheet, type 5
	Cuesheet,

	/// An embedded picture, type 6
	Picture,
}

impl FlacMetablockType {
	/// Map a 7-bit block type to a [`FlacMetablockType`].
	/// Types 7 - 126 are reserved, 127 is invalid.
	pub fn from_id(id: u8) -> Result<Self, FlacDecodeError> {
		return Ok(match id & 0b0111_1111 {
			0 => FlacMetablockType::Streaminfo,
			1 => FlacMetablockType::Padding,
			2 => FlacMetablockType::Application,
			3 => FlacMetablockType::Seektable,
			4 => FlacMetablockType::VorbisComment,
			5 => FlacMetablockType::Cuesheet,
			6 => FlacMetablockType::Picture,
			127 => return Err(FlacDecodeError::InvalidMetablockType),
			x => return Err(FlacDecodeError::ReservedMetablockType(x)),
		});
	}

	/// The 7-bit id of this block type
	pub fn to_id(&self) -> u8 {
		match self {
			FlacMetablockType::Streaminfo => 0,
			FlacMetablockType::Padding => 1,
			FlacMetablockType::Application => 2,
			FlacMetablockType::Seektable => 3,
			FlacMetablockType::VorbisComment => 4,
			FlacMetablockType::Cuesheet => 5,
			FlacMetablockType::Picture => 6,
		}
	}
}

impl Display for FlacMetablockType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Streaminfo => write!(f, "streaminfo"),
			Self::Padding => write!(f, "padding"),
			Self::Application => write!(f, "application"),
			Self::Seektable => write!(f, "seektable"),
			Self::VorbisComment => write!(f, "vorbis comment"),
			Self::Cuesheet => write!(f, "cuesheet"),
			Self::Picture => write!(f, "picture"),
		}
	}
}

/// The header of a flac metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacMetablockHeader {
	/// The type of block this is
	pub block_type: FlacMetablockType,

	/// The length of this block, in bytes
	/// (not including this header)
	pub length: u32,

	/// If true, this is the last metadata block
	pub is_last: bool,
}

impl FlacMetablockHeader {
	/// Decode a big-endian metablock header.
	///
	/// Bit 31 is the last-block flag, bits 24 - 30 are the block type,
	/// and bits 0 - 23 are the length of the block body.
	pub fn decode(header: [u8; 4]) -> Result<Self, FlacDecodeError> {
		let packed = u32::from_be_bytes(header);

		return Ok(Self {
			is_last: packed >> 31 == 1,
			block_type: FlacMetablockType::from_id(header[0])?,
			length: packed & 0x00FF_FFFF,
		});
	}
}
