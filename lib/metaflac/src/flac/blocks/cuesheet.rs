use super::{FlacMetablockDecode, FlacMetablockType};
use crate::flac::errors::FlacDecodeError;

/// A cuesheet block in a flac file.
/// Not parsed, we only carry its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacCuesheetBlock {
	/// The raw cuesheet
	pub data: Vec<u8>,
}

impl FlacMetablockDecode for FlacCuesheetBlock {
	const BLOCK_TYPE: FlacMetablockType = FlacMetablockType::Cuesheet;

	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		Ok(Self { data: data.into() })
	}
}
