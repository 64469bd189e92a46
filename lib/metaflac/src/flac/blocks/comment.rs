use super::{FlacMetablockDecode, FlacMetablockType};
use crate::{
	common::{genre::GenreTable, vorbiscomment::VorbisComment},
	flac::errors::FlacDecodeError,
	NormalizedComments,
};

/// A vorbis comment metablock in a flac file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacCommentBlock {
	/// The comment in this block
	pub comment: VorbisComment,
}

impl FlacCommentBlock {
	/// Normalize the comments in this block.
	/// See [`VorbisComment::normalize`].
	pub fn normalize(&self, genres: Option<&GenreTable>) -> NormalizedComments {
		self.comment.normalize(genres)
	}
}

impl FlacMetablockDecode for FlacCommentBlock {
	const BLOCK_TYPE: FlacMetablockType = FlacMetablockType::VorbisComment;

	fn decode(data: &[u8]) -> Result<Self, FlacDecodeError> {
		Ok(Self {
			comment: VorbisComment::decode(data)?,
		})
	}
}
