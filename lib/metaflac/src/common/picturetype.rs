//! An audio picture type, according to the ID3v2 APIC frame

use std::fmt::Display;
use thiserror::Error;

/// We failed to decode a picture type
#[derive(Debug, Error)]
#[error("bad picture type `{idx}`")]
pub struct PictureTypeError {
	idx: u32,
}

/// A picture type according to the ID3v2 APIC frame
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PictureType {
	/// Other
	Other,
	/// 32x32 pixels 'file icon' (PNG only)
	PngFileIcon,
	/// Other file icon
	OtherFileIcon,
	/// Cover (front)
	FrontCover,
	/// Cover (back)
	BackCover,
	/// Leaflet page
	LeafletPage,
	/// Media (e.g. label side of CD)
	Media,
	/// Lead artist/lead performer/soloist
	LeadArtist,
	/// Artist/performer
	Artist,
	/// Conductor
	Conductor,
	/// Band/Orchestra
	BandOrchestra,
	/// Composer
	Composer,
	/// Lyricist/text writer
	Lyricist,
	/// Recording Location
	RecLocation,
	/// During recording
	DuringRecording,
	/// During performance
	DuringPerformance,
	/// Movie/video screen capture
	VideoScreenCapture,
	/// A bright coloured fish
	ABrightColoredFish,
	/// Illustration
	Illustration,
	/// Band/artist logotype
	ArtistLogotype,
	/// Publisher/Studio logotype
	PublisherLogotype,
}

impl PictureType {
	/// Try to decode a picture type from the given integer.
	/// Returns an error if `idx` is invalid.
	pub fn from_idx(idx: u32) -> Result<Self, PictureTypeError> {
		Ok(match idx {
			0 => PictureType::Other,
			1 => PictureType::PngFileIcon,
			2 => PictureType::OtherFileIcon,
			3 => PictureType::FrontCover,
			4 => PictureType::BackCover,
			5 => PictureType::LeafletPage,
			6 => PictureType::Media,
			7 => PictureType::LeadArtist,
			8 => PictureType::Artist,
			9 => PictureType::Conductor,
			10 => PictureType::BandOrchestra,
			11 => PictureType::Composer,
			12 => PictureType::Lyricist,
			13 => PictureType::RecLocation,
			14 => PictureType::DuringRecording,
			15 => PictureType::DuringPerformance,
			16 => PictureType::VideoScreenCapture,
			17 => PictureType::ABrightColoredFish,
			18 => PictureType::Illustration,
			19 => PictureType::ArtistLogotype,
			20 => PictureType::PublisherLogotype,
			_ => return Err(PictureTypeError { idx }),
		})
	}
}

impl Display for PictureType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Other => "other",
			Self::PngFileIcon => "file icon",
			Self::OtherFileIcon => "other file icon",
			Self::FrontCover => "front cover",
			Self::BackCover => "back cover",
			Self::LeafletPage => "leaflet page",
			Self::Media => "media",
			Self::LeadArtist => "lead artist",
			Self::Artist => "artist",
			Self::Conductor => "conductor",
			Self::BandOrchestra => "band",
			Self::Composer => "composer",
			Self::Lyricist => "lyricist",
			Self::RecLocation => "recording location",
			Self::DuringRecording => "during recording",
			Self::DuringPerformance => "during performance",
			Self::VideoScreenCapture => "screen capture",
			Self::ABrightColoredFish => "a bright colored fish",
			Self::Illustration => "illustration",
			Self::ArtistLogotype => "artist logotype",
			Self::PublisherLogotype => "publisher logotype",
		};
		write!(f, "{name}")
	}
}
