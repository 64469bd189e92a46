//! Read all metadata blocks of a flac file

use smartstring::{LazyCompact, SmartString};
use std::{
	collections::HashMap,
	fs::File,
	io::{self, BufReader, Read, Seek},
	path::Path,
};
use tracing::{debug, trace};

use super::{
	blocks::{
		FlacApplicationBlock, FlacCommentBlock, FlacCuesheetBlock, FlacMetablockDecode,
		FlacMetablockHeader, FlacMetablockType, FlacPictureBlock, FlacSeektableBlock,
		FlacStreaminfoBlock,
	},
	errors::{FlacDecodeError, FlacReadError},
	stream::{read_marker, read_span, skip_id3, Id3Header},
};
use crate::common::{genre::GenreTable, vorbiscomment::NormalizedComments};

/// The raw body of a metadata block we kept
#[derive(Debug, Clone)]
struct RawBlock {
	/// The offset of the first byte of this body
	offset: u64,
	data: Vec<u8>,
}

/// Attach a file and offset to a decode error
fn err_at(
	file: &SmartString<LazyCompact>,
	offset: u64,
) -> impl FnOnce(FlacDecodeError) -> FlacReadError + '_ {
	move |error| FlacReadError {
		file: file.clone(),
		offset,
		error,
	}
}

/// The metadata of one flac file.
///
/// Reading a file keeps the raw body of the last block of each type,
/// and discards padding. Block bodies are decoded by their getters,
/// every time they are called.
#[derive(Debug, Clone)]
pub struct FlacFile {
	file: SmartString<LazyCompact>,
	id3: Option<Id3Header>,
	audio_offset: u64,
	blocks: HashMap<FlacMetablockType, RawBlock>,
}

impl FlacFile {
	/// Open and read the flac file at `path`.
	/// The file is closed before this returns.
	pub fn open(path: &Path) -> Result<Self, FlacReadError> {
		let file_id: SmartString<LazyCompact> = path.to_string_lossy().into_owned().into();
		let file = File::open(path).map_err(|e| err_at(&file_id, 0)(e.into()))?;
		return Self::read(BufReader::new(file), file_id);
	}

	/// Read flac metadata from `read`.
	///
	/// `file` identifies this stream in errors and logs.
	/// `read` may be positioned anywhere, reading always starts at offset 0.
	/// Nothing after the last metadata block is read.
	pub fn read<R: Read + Seek>(
		mut read: R,
		file: impl Into<SmartString<LazyCompact>>,
	) -> Result<Self, FlacReadError> {
		let file: SmartString<LazyCompact> = file.into();

		let id3 = skip_id3(&mut read).map_err(err_at(&file, 0))?;
		let marker_offset = id3.map(|x| x.end_offset()).unwrap_or(0);
		read_marker(&mut read).map_err(err_at(&file, marker_offset))?;

		let mut blocks = HashMap::new();
		let mut offset = marker_offset + 4;
		loop {
			let header = {
				let mut buf = [0u8; 4];
				read_span(&mut read, &mut buf, "metablock header").map_err(err_at(&file, offset))?;
				FlacMetablockHeader::decode(buf).map_err(err_at(&file, offset))?
			};
			let body_offset = offset + 4;
			let length = u64::from(header.length);

			trace!(
				message = "Read metablock header",
				file = %file,
				offset,
				block = %header.block_type,
				length,
				is_last = header.is_last
			);

			match header.block_type {
				FlacMetablockType::Padding => {
					let n = io::copy(&mut read.by_ref().take(length), &mut io::sink())
						.map_err(|e| err_at(&file, body_offset)(e.into()))?;
					if n != length {
						return Err(err_at(&file, body_offset)(FlacDecodeError::Truncated(
							"padding",
						)));
					}
				}

				block_type => {
					let mut data = Vec::new();
					read.by_ref()
						.take(length)
						.read_to_end(&mut data)
						.map_err(|e| err_at(&file, body_offset)(e.into()))?;
					if data.len() as u64 != length {
						return Err(err_at(&file, body_offset)(FlacDecodeError::Truncated(
							"metablock body",
						)));
					}

					let old = blocks.insert(
						block_type,
						RawBlock {
							offset: body_offset,
							data,
						},
					);

					if old.is_some() {
						debug!(
							message = "Duplicate metablock, keeping the last one",
							file = %file,
							block = %block_type,
							offset
						);
					}
				}
			}

			offset = body_offset + length;
			if header.is_last {
				break;
			}
		}

		return Ok(Self {
			file,
			id3,
			audio_offset: offset,
			blocks,
		});
	}

	/// The identifier this file was read with
	pub fn file(&self) -> &str {
		&self.file
	}

	/// True if this file starts with an id3v2 tag
	pub fn has_id3(&self) -> bool {
		self.id3.is_some()
	}

	/// The header of the id3v2 tag at the start of this file, if any
	pub fn id3(&self) -> Option<&Id3Header> {
		self.id3.as_ref()
	}

	/// The offset of the first byte after the last metadata block
	pub fn audio_offset(&self) -> u64 {
		self.audio_offset
	}

	/// The raw body of the block of the given type.
	/// Padding is never kept.
	pub fn raw_block(&self, block_type: FlacMetablockType) -> Option<&[u8]> {
		self.blocks.get(&block_type).map(|x| x.data.as_slice())
	}

	fn decode_block<T: FlacMetablockDecode>(&self) -> Result<Option<T>, FlacReadError> {
		let Some(block) = self.blocks.get(&T::BLOCK_TYPE) else {
			return Ok(None);
		};

		return T::decode(&block.data)
			.map(Some)
			.map_err(err_at(&self.file, block.offset));
	}

	/// Decode this file's streaminfo block
	pub fn streaminfo(&self) -> Result<Option<FlacStreaminfoBlock>, FlacReadError> {
		self.decode_block()
	}

	/// Decode this file's application block
	pub fn application(&self) -> Result<Option<FlacApplicationBlock>, FlacReadError> {
		self.decode_block()
	}

	/// Decode this file's seektable
	pub fn seektable(&self) -> Result<Option<FlacSeektableBlock>, FlacReadError> {
		self.decode_block()
	}

	/// Get this file's cuesheet
	pub fn cuesheet(&self) -> Result<Option<FlacCuesheetBlock>, FlacReadError> {
		self.decode_block()
	}

	/// Decode this file's picture block
	pub fn picture(&self) -> Result<Option<FlacPictureBlock>, FlacReadError> {
		self.decode_block()
	}

	/// Decode and normalize this file's vorbis comment block.
	/// See [`crate::common::vorbiscomment::VorbisComment::normalize`].
	pub fn vorbis_comment(
		&self,
		genres: Option<&GenreTable>,
	) -> Result<Option<NormalizedComments>, FlacReadError> {
		let block = self.decode_block::<FlacCommentBlock>()?;
		return Ok(block.map(|x| x.normalize(genres)));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		common::vorbiscomment::encode_comment,
		flac::{
			blocks::FlacSeekPoint, errors::FlacErrorKind, testimage::FlacImage,
		},
		CommentEvent,
	};
	use paste::paste;
	use rand::Rng;
	use sha2::{Digest, Sha256};
	use std::io::Cursor;

	fn streaminfo() -> FlacStreaminfoBlock {
		FlacStreaminfoBlock {
			min_block_size: 4096,
			max_block_size: 4096,
			min_frame_size: 14,
			max_frame_size: 13706,
			sample_rate: 44100,
			channels: 2,
			bits_per_sample: 16,
			total_samples: 441000,
			md5_signature: [7; 16],
		}
	}

	fn read(image: &FlacImage) -> Result<FlacFile, FlacReadError> {
		FlacFile::read(Cursor::new(image.build()), "test.flac")
	}

	#[test]
	fn full_file() {
		let mut img_data = vec![0u8; 4096];
		rand::thread_rng().fill(&mut img_data[..]);
		let mut hasher = Sha256::new();
		hasher.update(&img_data);
		let img_hash = format!("{:x}", hasher.finalize());

		let picture = FlacPictureBlock {
			picture_type: 3,
			mime: "image/png".into(),
			description: String::new(),
			width: 500,
			height: 500,
			bit_depth: 24,
			color_count: 0,
			img_data,
		};

		let seekpoint = FlacSeekPoint {
			sample_number: 0,
			byte_offset: 0,
			frame_samples: 4096,
		};

		let image = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.block(FlacMetablockType::Seektable, &seekpoint.encode())
			.block(FlacMetablockType::Application, b"ATCHdata")
			.block(
				FlacMetablockType::VorbisComment,
				&encode_comment("vendor", &["title=Song", "GENRE=Rock"]),
			)
			.block(FlacMetablockType::Cuesheet, &[1, 2, 3])
			.block(FlacMetablockType::Picture, &picture.encode())
			.block(FlacMetablockType::Padding, &[0; 100])
			.audio(&[0xFF, 0xF8, 0xC9, 0x18]);
		let data = image.build();

		let f = read(&image).unwrap();
		assert_eq!(f.file(), "test.flac");
		assert!(!f.has_id3());
		assert_eq!(f.audio_offset(), data.len() as u64 - 4);

		assert_eq!(f.streaminfo().unwrap().unwrap(), streaminfo());
		assert_eq!(f.seektable().unwrap().unwrap().points, vec![seekpoint]);
		assert_eq!(
			f.application().unwrap().unwrap().application_id_hex(),
			"0x41544348"
		);
		assert_eq!(f.cuesheet().unwrap().unwrap().data, vec![1, 2, 3]);
		assert_eq!(f.raw_block(FlacMetablockType::Padding), None);

		let p = f.picture().unwrap().unwrap();
		assert_eq!(p.mime, "image/png");
		let mut hasher = Sha256::new();
		hasher.update(&p.img_data);
		assert_eq!(format!("{:x}", hasher.finalize()), img_hash);

		let c = f.vorbis_comment(None).unwrap().unwrap();
		assert_eq!(c.tags.get("TITLE").unwrap(), &["Song"][..]);
		assert!(!c.changed);
	}

	#[test]
	fn genre_table() {
		let image = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.block(
				FlacMetablockType::VorbisComment,
				&encode_comment("vendor", &["GENRE=Rock", "GENRE=Jazz;Funk"]),
			);
		let genres: GenreTable = [("Rock", "Hard Rock")].into_iter().collect();

		let f = read(&image).unwrap();
		let c = f.vorbis_comment(Some(&genres)).unwrap().unwrap();
		assert_eq!(
			c.tags.get("GENRE").unwrap(),
			&["Hard Rock", "Jazz", "Funk"][..]
		);
		assert!(c.changed);
		assert!(c.events.contains(&CommentEvent::GenreMiss {
			value: "Jazz;Funk".into()
		}));

		// Getters can be called again, and don't share state
		let c = f.vorbis_comment(None).unwrap().unwrap();
		assert_eq!(c.tags.get("GENRE").unwrap(), &["Rock", "Jazz", "Funk"][..]);
	}

	#[test]
	fn missing_blocks() {
		let f = read(&FlacImage::new().block(FlacMetablockType::Streaminfo, &streaminfo().encode()))
			.unwrap();
		assert!(f.streaminfo().unwrap().is_some());
		assert!(f.vorbis_comment(None).unwrap().is_none());
		assert!(f.picture().unwrap().is_none());
		assert!(f.seektable().unwrap().is_none());
		assert!(f.application().unwrap().is_none());
		assert!(f.cuesheet().unwrap().is_none());
	}

	macro_rules! test_id3 {
		( $size:literal ) => {
			paste! {
				#[test]
				fn [<id3_size_ $size>]() {
					let image = FlacImage::new()
						.id3($size)
						.block(FlacMetablockType::Streaminfo, &streaminfo().encode());

					let f = read(&image).unwrap();
					assert!(f.has_id3());
					assert_eq!(f.id3().unwrap().size, $size);
					assert_eq!(f.audio_offset(), 10 + $size + 4 + 4 + 34);
					assert_eq!(f.streaminfo().unwrap().unwrap(), streaminfo());
				}
			}
		};
	}

	test_id3!(0);
	test_id3!(1);
	test_id3!(127);
	test_id3!(128);
	test_id3!(70000);

	#[test]
	fn bad_marker() {
		let err = FlacFile::read(Cursor::new(b"RIFF\x00\x00\x00\x00".to_vec()), "a.wav").unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Format);
		assert_eq!(err.offset, 0);
		let msg = err.to_string();
		assert!(msg.contains("a.wav"));
		assert!(msg.contains("RIFF"));

		// After an id3 tag, the marker is expected where the tag ends
		let mut data = FlacImage::new().id3(20).build();
		data[30] = b'X';
		let err = FlacFile::read(Cursor::new(data), "b.flac").unwrap_err();
		assert!(matches!(err.error, FlacDecodeError::BadMagicBytes(_)));
		assert_eq!(err.offset, 30);
	}

	#[test]
	fn block_overruns_file() {
		let mut data = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.build();
		data.truncate(data.len() - 1);

		let err = FlacFile::read(Cursor::new(data), "short.flac").unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Truncation);
		assert!(matches!(err.error, FlacDecodeError::Truncated("metablock body")));
		assert_eq!(err.offset, 8);
	}

	#[test]
	fn padding_overruns_file() {
		let mut data = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.block(FlacMetablockType::Padding, &[0; 64])
			.build();
		data.truncate(data.len() - 10);

		let err = FlacFile::read(Cursor::new(data), "short.flac").unwrap_err();
		assert!(matches!(err.error, FlacDecodeError::Truncated("padding")));
		assert_eq!(err.offset, 4 + 4 + 34 + 4);
	}

	#[test]
	fn missing_last_block() {
		// The last block we have isn't flagged as last
		let mut data = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.build();
		data[4] = 0x00;

		let err = FlacFile::read(Cursor::new(data), "x.flac").unwrap_err();
		assert!(matches!(err.error, FlacDecodeError::Truncated("metablock header")));
		assert_eq!(err.offset, 4 + 4 + 34);
	}

	#[test]
	fn reserved_block_type() {
		for id in [7u8, 100, 126] {
			let image = FlacImage::new()
				.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
				.raw_block(id, &[0; 8]);
			let err = read(&image).unwrap_err();
			assert_eq!(err.kind(), FlacErrorKind::Format);
			assert!(matches!(err.error, FlacDecodeError::ReservedMetablockType(x) if x == id));
			assert_eq!(err.offset, 4 + 4 + 34);
		}
	}

	#[test]
	fn invalid_block_type() {
		let image = FlacImage::new().raw_block(127, &[]);
		let err = read(&image).unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Format);
		assert!(matches!(err.error, FlacDecodeError::InvalidMetablockType));
	}

	#[test]
	fn last_block_wins() {
		let image = FlacImage::new()
			.block(
				FlacMetablockType::VorbisComment,
				&encode_comment("first", &["TITLE=one"]),
			)
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.block(
				FlacMetablockType::VorbisComment,
				&encode_comment("second", &["TITLE=two"]),
			);

		let c = read(&image).unwrap().vorbis_comment(None).unwrap().unwrap();
		assert_eq!(c.vendor.as_str(), "second");
		assert_eq!(c.tags.get("TITLE").unwrap(), &["two"][..]);
	}

	#[test]
	fn stops_at_last_block() {
		// Trailing bytes look like a reserved block, but are audio
		let image = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.audio(&[0x7E, 0xFF, 0xFF, 0xFF, 0x00]);

		let f = read(&image).unwrap();
		assert_eq!(f.audio_offset(), 4 + 4 + 34);
	}

	#[test]
	fn decode_errors_are_lazy() {
		let image = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.block(FlacMetablockType::Seektable, &[0; 19]);

		// Reading succeeds, the bad block is only decoded on request
		let f = read(&image).unwrap();
		assert!(f.streaminfo().unwrap().is_some());
		assert_eq!(f.raw_block(FlacMetablockType::Seektable).unwrap().len(), 19);

		let err = f.seektable().unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Format);
		assert_eq!(err.offset, 4 + 4 + 34 + 4);
		assert!(err.to_string().contains("test.flac"));
	}

	#[test]
	fn empty_block_is_kept() {
		let image = FlacImage::new()
			.block(FlacMetablockType::Streaminfo, &streaminfo().encode())
			.block(FlacMetablockType::Cuesheet, &[]);

		let f = read(&image).unwrap();
		assert_eq!(f.raw_block(FlacMetablockType::Cuesheet), Some(&[][..]));
		assert!(f.cuesheet().unwrap().unwrap().data.is_empty());
	}

	#[test]
	fn open_missing_file() {
		let err = FlacFile::open(Path::new("/nonexistent/x.flac")).unwrap_err();
		assert_eq!(err.kind(), FlacErrorKind::Io);
		assert_eq!(err.file.as_str(), "/nonexistent/x.flac");
	}

	#[test]
	fn is_send_sync() {
		fn check<T: Send + Sync>() {}
		check::<FlacFile>();
	}
}
