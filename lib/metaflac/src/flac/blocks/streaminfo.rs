use itertools::Itertools;
use std::io::Cursor;

use super::{read_field, FlacMetablockDecode, FlacMetablockType};
use crate::flac::errors::FlacDecodeError;

/// A streaminfo block in a flac file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacStreaminfoBlock {
	/// The minimum block size (in samples) used in the stream.
	pub min_block_size: u16,

	/// The maximum block size (in samples) used in the stream.
	/// (Minimum blocksize == maximum blocksize) implies a fixed-blocksize stream.
	pub max_block_size: u16,

	/// The minimum frame size (in bytes) used in the stream.
	/// May be 0 to imply the value is not known.
	pub min_frame_size: u32,

	/// The maximum frame size (in bytes) used in the stream.
	/// May be 0 to imply the value is not known.
	pub max_frame_size: u32,

	/// Sample rate in Hz. Though 20 bits are available,
	/// the maximum sample rate is limited by the structure of frame headers to 655350Hz.
	/// Also, a value of 0 is invalid.
	pub sample_rate: u32,

	/// Number of channels. FLAC supports from 1 to 8 channels
	pub channels: u8,

	/// Bits per sample. FLAC supports from 4 to 32 bits per sample.
	pub bits_per_sample: u8,

	/// Total samples in stream. 'Samples' means inter-channel sample,
	/// i.e. one second of 44.1Khz audio will have 44100 samples regardless of the number of channels.
	/// A value of zero here means the number of total samples is unknown.
	pub total_samples: u64,

	/// MD5 signature of the unencoded audio data.
	pub md5_signature: [u8; 16],
}

impl FlacStreaminfoBlock {
	/// The md5 signature as lowercase hex
	pub fn md5_hex(&self) -> String {
		self.md5_signature.iter().map(|x| format!("{x:02x}")).join("")
	}
}

impl FlacMetablockDecode for FlacStreaminfoBlock {
	const BLOCK_TYPE: FlacMetablockType = FlacMetablockType::Streaminfo;

	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = Cursor::new(data);
		let block = Self::BLOCK_TYPE;

		let min_block_size = {
			let mut buf = [0u8; 2];
			read_field(&mut d, &mut buf, block, "block is too short")?;
			u16::from_be_bytes(buf)
		};

		let max_block_size = {
			let mut buf = [0u8; 2];
			read_field(&mut d, &mut buf, block, "block is too short")?;
			u16::from_be_bytes(buf)
		};

		let min_frame_size = {
			let mut buf = [0u8; 4];
			read_field(&mut d, &mut buf[1..], block, "block is too short")?;
			u32::from_be_bytes(buf)
		};

		let max_frame_size = {
			let mut buf = [0u8; 4];
			read_field(&mut d, &mut buf[1..], block, "block is too short")?;
			u32::from_be_bytes(buf)
		};

		// Unpacked from the low bits up:
		// 36 bits total samples, 5 bits (bits per sample - 1),
		// 3 bits (channels - 1), 20 bits sample rate.
		let (sample_rate, channels, bits_per_sample, total_samples) = {
			let mut buf = [0u8; 8];
			read_field(&mut d, &mut buf, block, "block is too short")?;
			let packed = u64::from_be_bytes(buf);

			(
				(packed >> 44) as u32,
				((packed >> 41) & 0b111) as u8 + 1,
				((packed >> 36) & 0b1_1111) as u8 + 1,
				packed & 0x0F_FFFF_FFFF,
			)
		};

		let md5_signature = {
			let mut buf = [0u8; 16];
			read_field(&mut d, &mut buf, block, "block is too short")?;
			buf
		};

		Ok(Self {
			min_block_size,
			max_block_size,
			min_frame_size,
			max_frame_size,
			sample_rate,
			channels,
			bits_per_sample,
			total_samples,
			md5_signature,
		})
	}
}

#[cfg(test)]
impl FlacStreaminfoBlock {
	/// Encode this block's body.
	/// Panics if a field doesn't fit in its bit width.
	pub(crate) fn encode(&self) -> Vec<u8> {
		assert!(self.min_frame_size < 1 << 24);
		assert!(self.max_frame_size < 1 << 24);
		assert!(self.sample_rate < 1 << 20);
		assert!((1..=8).contains(&self.channels));
		assert!((1..=32).contains(&self.bits_per_sample));
		assert!(self.total_samples < 1 << 36);

		let mut out = Vec::with_capacity(34);
		out.extend_from_slice(&self.min_block_size.to_be_bytes());
		out.extend_from_slice(&self.max_block_size.to_be_bytes());
		out.extend_from_slice(&self.min_frame_size.to_be_bytes()[1..]);
		out.extend_from_slice(&self.max_frame_size.to_be_bytes()[1..]);

		let packed: u64 = (u64::from(self.sample_rate) << 44)
			| (u64::from(self.channels - 1) << 41)
			| (u64::from(self.bits_per_sample - 1) << 36)
			| self.total_samples;
		out.extend_from_slice(&packed.to_be_bytes());
		out.extend_from_slice(&self.md5_signature);
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flac::errors::FlacErrorKind;
	use rand::Rng;

	#[test]
	fn decode_cd_audio() {
		// 4096-sample blocks, 44100Hz, 2 channels, 16 bits, 441000 samples
		let data: [u8; 34] = [
			0x10, 0x00, 0x10, 0x00, // block sizes
			0x00, 0x00, 0x0E, // min frame size
			0x00, 0x35, 0x8A, // max frame size
			0x0A, 0xC4, 0x42, 0xF0, // rate, channels, bps, samples
			0x00, 0x06, 0xBA, 0xA8, //
			0xD4, 0x1D, 0x8C, 0xD9, 0x8F, 0x00, 0xB2, 0x04, // md5
			0xE9, 0x80, 0x09, 0x98, 0xEC, 0xF8, 0x42, 0x7E,
		];

		let s = FlacStreaminfoBlock::decode(&data).unwrap();
		assert_eq!(s.min_block_size, 4096);
		assert_eq!(s.max_block_size, 4096);
		assert_eq!(s.min_frame_size, 14);
		assert_eq!(s.max_frame_size, 0x358A);
		assert_eq!(s.sample_rate, 44100);
		assert_eq!(s.channels, 2);
		assert_eq!(s.bits_per_sample, 16);
		assert_eq!(s.total_samples, 441000);
		assert_eq!(s.md5_hex(), "d41d8cd98f00b204e9800998ecf8427e");
	}

	#[test]
	fn bias_is_applied() {
		// All-zero packed field means 1 channel, 1 bit per sample
		let s = FlacStreaminfoBlock::decode(&[0u8; 34]).unwrap();
		assert_eq!(s.channels, 1);
		assert_eq!(s.bits_per_sample, 1);
		assert_eq!(s.sample_rate, 0);
		assert_eq!(s.total_samples, 0);

		// All-one packed field is the maximum of every field
		let mut data = [0u8; 34];
		data[10..18].copy_from_slice(&[0xFF; 8]);
		let s = FlacStreaminfoBlock::decode(&data).unwrap();
		assert_eq!(s.channels, 8);
		assert_eq!(s.bits_per_sample, 32);
		assert_eq!(s.sample_rate, 0x0F_FFFF);
		assert_eq!(s.total_samples, 0x0F_FFFF_FFFF);
	}

	#[test]
	fn roundtrip_random_fields() {
		let mut rng = rand::thread_rng();

		for _ in 0..500 {
			let s = FlacStreaminfoBlock {
				min_block_size: rng.gen(),
				max_block_size: rng.gen(),
				min_frame_size: rng.gen_range(0..1 << 24),
				max_frame_size: rng.gen_range(0..1 << 24),
				sample_rate: rng.gen_range(0..1 << 20),
				channels: rng.gen_range(1..=8),
				bits_per_sample: rng.gen_range(1..=32),
				total_samples: rng.gen_range(0..1 << 36),
				md5_signature: rng.gen(),
			};

			let data = s.encode();
			assert_eq!(data.len(), 34);
			assert_eq!(FlacStreaminfoBlock::decode(&data).unwrap(), s);
		}
	}

	#[test]
	fn too_short() {
		let err = FlacStreaminfoBlock::decode(&[0u8; 33]).unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Format);
		assert!(matches!(
			err,
			FlacDecodeError::MalformedBlock {
				block: FlacMetablockType::Streaminfo,
				..
			}
		));
	}
}
