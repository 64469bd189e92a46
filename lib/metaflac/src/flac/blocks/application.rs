use std::io::{Cursor, Read};

use super::{read_u32_be, FlacMetablockDecode, FlacMetablockType};
use crate::flac::errors::FlacDecodeError;

/// An application block in a flac file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacApplicationBlock {
	/// Registered application ID
	pub application_id: u32,

	/// The application data
	pub data: Vec<u8>,
}

impl FlacApplicationBlock {
	/// The application id as hex, like `0x41544348`
	pub fn application_id_hex(&self) -> String {
		format!("{:#010x}", self.application_id)
	}
}

impl FlacMetablockDecode for FlacApplicationBlock {
	const BLOCK_TYPE: FlacMetablockType = FlacMetablockType::Application;

	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = Cursor::new(data);

		let application_id = read_u32_be(&mut d, Self::BLOCK_TYPE, "missing application id")?;

		let data = {
			let mut data = Vec::with_capacity(data.len().saturating_sub(4));
			d.read_to_end(&mut data)?;
			data
		};

		Ok(Self {
			application_id,
			data,
		})
	}
}
