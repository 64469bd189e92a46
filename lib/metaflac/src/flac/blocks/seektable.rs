use super::{FlacMetablockDecode, FlacMetablockType};
use crate::flac::errors::FlacDecodeError;

/// The size of one encoded seek point, in bytes
pub const SEEKPOINT_LEN: usize = 18;

/// A sample number that marks a placeholder seek point
pub const PLACEHOLDER_SAMPLE: u64 = u64::MAX;

/// One point in a seek table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacSeekPoint {
	/// Sample number of the first sample in the target frame
	pub sample_number: u64,

	/// Offset (in bytes) from the first byte of the first frame header
	/// to the first byte of the target frame's header.
	pub byte_offset: u64,

	/// Number of samples in the target frame
	pub frame_samples: u16,
}

impl FlacSeekPoint {
	/// Placeholder points reserve space in the table and point nowhere
	pub fn is_placeholder(&self) -> bool {
		self.sample_number == PLACEHOLDER_SAMPLE
	}

	fn decode(data: &[u8; SEEKPOINT_LEN]) -> Self {
		let mut sample_number = [0u8; 8];
		let mut byte_offset = [0u8; 8];
		sample_number.copy_from_slice(&data[0..8]);
		byte_offset.copy_from_slice(&data[8..16]);

		Self {
			sample_number: u64::from_be_bytes(sample_number),
			byte_offset: u64::from_be_bytes(byte_offset),
			frame_samples: u16::from_be_bytes([data[16], data[17]]),
		}
	}
}

/// A seektable block in a flac file.
/// There is no count prefix, the table fills its whole block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacSeektableBlock {
	/// The seek points, in file order
	pub points: Vec<FlacSeekPoint>,
}

impl FlacMetablockDecode for FlacSeektableBlock {
	const BLOCK_TYPE: FlacMetablockType = FlacMetablockType::Seektable;

	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		if data.len() % SEEKPOINT_LEN != 0 {
			return Err(FlacDecodeError::MalformedBlock {
				block: Self::BLOCK_TYPE,
				reason: "length is not a multiple of 18",
			});
		}

		let points = data
			.chunks_exact(SEEKPOINT_LEN)
			.filter_map(|chunk| <&[u8; SEEKPOINT_LEN]>::try_from(chunk).ok())
			.map(FlacSeekPoint::decode)
			.collect();

		Ok(Self { points })
	}
}

#[cfg(test)]
impl FlacSeekPoint {
	pub(crate) fn encode(&self) -> [u8; SEEKPOINT_LEN] {
		let mut out = [0u8; SEEKPOINT_LEN];
		out[0..8].copy_from_slice(&self.sample_number.to_be_bytes());
		out[8..16].copy_from_slice(&self.byte_offset.to_be_bytes());
		out[16..18].copy_from_slice(&self.frame_samples.to_be_bytes());
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flac::errors::FlacErrorKind;

	#[test]
	fn decode_points() {
		let points = [
			FlacSeekPoint {
				sample_number: 0,
				byte_offset: 0,
				frame_samples: 4096,
			},
			FlacSeekPoint {
				sample_number: 441000,
				byte_offset: 0x0102_0304_0506,
				frame_samples: 1152,
			},
			FlacSeekPoint {
				sample_number: PLACEHOLDER_SAMPLE,
				byte_offset: 0,
				frame_samples: 0,
			},
		];

		let data: Vec<u8> = points.iter().flat_map(|p| p.encode()).collect();
		assert_eq!(data.len(), 54);

		let t = FlacSeektableBlock::decode(&data).unwrap();
		assert_eq!(t.points, points);
		assert!(!t.points[1].is_placeholder());
		assert!(t.points[2].is_placeholder());
	}

	#[test]
	fn empty_table() {
		let t = FlacSeektableBlock::decode(&[]).unwrap();
		assert!(t.points.is_empty());
	}

	#[test]
	fn partial_trailing_point() {
		for len in [1, 17, 19, 35, 37] {
			let err = FlacSeektableBlock::decode(&vec![0u8; len]).unwrap_err();
			assert_eq!(err.kind(), FlacErrorKind::Format);
		}
	}
}
