use flactag_util::MimeType;
use std::{fmt::Debug, io::Cursor};

use super::{read_u32_be, read_vec, FlacMetablockDecode, FlacMetablockType};
use crate::{common::picturetype::PictureType, flac::errors::FlacDecodeError};

/// A picture metablock in a flac file
#[derive(Clone, PartialEq, Eq)]
pub struct FlacPictureBlock {
	/// The picture type code, according to the ID3v2 APIC frame
	pub picture_type: u32,

	/// The mime string of this picture
	pub mime: String,

	/// The description of this picture
	pub description: String,

	/// The width of this picture, in px
	pub width: u32,

	/// The height of this picture, in px
	pub height: u32,

	/// The bit depth of this picture
	pub bit_depth: u32,

	/// The color count of this picture (if indexed)
	pub color_count: u32,

	/// The image data
	pub img_data: Vec<u8>,
}

impl FlacPictureBlock {
	/// The kind of this picture.
	/// `None` if the type code isn't one we know.
	pub fn kind(&self) -> Option<PictureType> {
		PictureType::from_idx(self.picture_type).ok()
	}

	/// The parsed mime type of this picture
	pub fn mime_type(&self) -> MimeType {
		MimeType::from(self.mime.as_str())
	}
}

impl Debug for FlacPictureBlock {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlacPicture")
			.field("type", &self.picture_type)
			.field("mime", &self.mime)
			.field("description", &self.description)
			.field("width", &self.width)
			.field("height", &self.height)
			.field("img_data_len", &self.img_data.len())
			.finish()
	}
}

impl FlacMetablockDecode for FlacPictureBlock {
	const BLOCK_TYPE: FlacMetablockType = FlacMetablockType::Picture;

	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		let mut d = Cursor::new(data);
		let block = Self::BLOCK_TYPE;

		let picture_type = read_u32_be(&mut d, block, "missing picture type")?;

		// Image format
		let mime = {
			let mime_length = read_u32_be(&mut d, block, "missing mime length")?;
			let mime = read_vec(&mut d, mime_length, block, "mime overruns block")?;

			String::from_utf8(mime).map_err(|source| FlacDecodeError::FailedStringDecode {
				field: "picture mime type",
				source,
			})?
		};

		// Image description
		let description = {
			let desc_length = read_u32_be(&mut d, block, "missing description length")?;
			let desc = read_vec(&mut d, desc_length, block, "description overruns block")?;

			String::from_utf8(desc).map_err(|source| FlacDecodeError::FailedStringDecode {
				field: "picture description",
				source,
			})?
		};

		let width = read_u32_be(&mut d, block, "missing width")?;
		let height = read_u32_be(&mut d, block, "missing height")?;
		let bit_depth = read_u32_be(&mut d, block, "missing bit depth")?;
		// Color count for indexed images
		let color_count = read_u32_be(&mut d, block, "missing color count")?;

		let img_data = {
			let data_length = read_u32_be(&mut d, block, "missing data length")?;
			read_vec(&mut d, data_length, block, "image data overruns block")?
		};

		Ok(Self {
			picture_type,
			mime,
			description,
			width,
			height,
			bit_depth,
			color_count,
			img_data,
		})
	}
}

#[cfg(test)]
impl FlacPictureBlock {
	pub(crate) fn encode(&self) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend_from_slice(&self.picture_type.to_be_bytes());
		out.extend_from_slice(&u32::try_from(self.mime.len()).unwrap().to_be_bytes());
		out.extend_from_slice(self.mime.as_bytes());
		out.extend_from_slice(&u32::try_from(self.description.len()).unwrap().to_be_bytes());
		out.extend_from_slice(self.description.as_bytes());
		out.extend_from_slice(&self.width.to_be_bytes());
		out.extend_from_slice(&self.height.to_be_bytes());
		out.extend_from_slice(&self.bit_depth.to_be_bytes());
		out.extend_from_slice(&self.color_count.to_be_bytes());
		out.extend_from_slice(&u32::try_from(self.img_data.len()).unwrap().to_be_bytes());
		out.extend_from_slice(&self.img_data);
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flac::errors::FlacErrorKind;
	use rand::Rng;
	use sha2::{Digest, Sha256};

	fn cover() -> FlacPictureBlock {
		let mut img_data = vec![0u8; 2048];
		rand::thread_rng().fill(&mut img_data[..]);

		FlacPictureBlock {
			picture_type: 3,
			mime: "image/jpeg".into(),
			description: "Pochette recto".into(),
			width: 1920,
			height: 1080,
			bit_depth: 24,
			color_count: 0,
			img_data,
		}
	}

	#[test]
	fn decode_picture() {
		let p = cover();
		let mut hasher = Sha256::new();
		hasher.update(&p.img_data);
		let img_hash = format!("{:x}", hasher.finalize());

		let d = FlacPictureBlock::decode(&p.encode()).unwrap();
		assert_eq!(d.kind(), Some(PictureType::FrontCover));
		assert_eq!(d.mime_type(), MimeType::Jpg);
		assert_eq!(d.description, "Pochette recto");
		assert_eq!((d.width, d.height), (1920, 1080));
		assert_eq!(d.bit_depth, 24);
		assert_eq!(d.color_count, 0);

		let mut hasher = Sha256::new();
		hasher.update(&d.img_data);
		assert_eq!(format!("{:x}", hasher.finalize()), img_hash);
	}

	#[test]
	fn unknown_picture_type() {
		let mut p = cover();
		p.picture_type = 21;
		let d = FlacPictureBlock::decode(&p.encode()).unwrap();
		assert_eq!(d.picture_type, 21);
		assert_eq!(d.kind(), None);
	}

	#[test]
	fn data_overruns_block() {
		let data = cover().encode();
		let err = FlacPictureBlock::decode(&data[..data.len() - 1]).unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Format);
		assert!(matches!(
			err,
			FlacDecodeError::MalformedBlock {
				reason: "image data overruns block",
				..
			}
		));
	}

	#[test]
	fn mime_overruns_block() {
		let mut data = Vec::new();
		data.extend_from_slice(&3u32.to_be_bytes());
		data.extend_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
		data.extend_from_slice(b"image/png");

		let err = FlacPictureBlock::decode(&data).unwrap_err();
		assert!(matches!(
			err,
			FlacDecodeError::MalformedBlock {
				reason: "mime overruns block",
				..
			}
		));
	}

	#[test]
	fn bad_description() {
		let mut p = cover();
		p.description = "ab".into();
		let mut data = p.encode();
		// Break the description's utf-8
		// type (4) + mime len (4) + mime (10) + desc len (4)
		data[22] = 0xFF;

		let err = FlacPictureBlock::decode(&data).unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Encoding);
		assert!(matches!(
			err,
			FlacDecodeError::FailedStringDecode {
				field: "picture description",
				..
			}
		));
	}
}
