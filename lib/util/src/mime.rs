use std::{fmt::Display, str::FromStr};
use tracing::debug;

/// The media type of an embedded picture
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MimeType {
	/// A media type we don't know
	Other(String),

	/// The picture's data is the url of the image, not the image itself.
	/// Flac pictures mark this with the mime string `-->`.
	Url,

	Png,
	Jpg,
	Gif,
	Bmp,
	Webp,
	Avif,
	Tiff,
}

/// Known types, their canonical mime string, and their file extension.
/// Aliases are handled in [`MimeType::from_str`].
static KNOWN: [(MimeType, &str, &str); 7] = [
	(MimeType::Png, "image/png", ".png"),
	(MimeType::Jpg, "image/jpeg", ".jpg"),
	(MimeType::Gif, "image/gif", ".gif"),
	(MimeType::Bmp, "image/bmp", ".bmp"),
	(MimeType::Webp, "image/webp", ".webp"),
	(MimeType::Avif, "image/avif", ".avif"),
	(MimeType::Tiff, "image/tiff", ".tiff"),
];

impl FromStr for MimeType {
	type Err = std::convert::Infallible;

	/// Mime strings are case-insensitive.
	/// This never fails, unknown types become [`MimeType::Other`].
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lower = s.trim().to_ascii_lowercase();

		let known = match lower.as_str() {
			"-->" => return Ok(Self::Url),
			"image/jpg" | "image/pjpeg" => Some(Self::Jpg),
			"image/x-ms-bmp" => Some(Self::Bmp),
			x => KNOWN
				.iter()
				.find(|(_, mime, _)| *mime == x)
				.map(|(t, _, _)| t.clone()),
		};

		return Ok(known.unwrap_or_else(|| {
			debug!(message = "Unknown picture mime type", mime = s);
			Self::Other(s.into())
		}));
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Url => write!(f, "-->"),
			Self::Other(x) => write!(f, "{x}"),
			x => write!(f, "{}", x.lookup().map(|(_, mime, _)| *mime).unwrap_or("")),
		}
	}
}

impl From<&str> for MimeType {
	fn from(value: &str) -> Self {
		match Self::from_str(value) {
			Ok(x) => x,
			Err(never) => match never {},
		}
	}
}

impl MimeType {
	fn lookup(&self) -> Option<&'static (MimeType, &'static str, &'static str)> {
		KNOWN.iter().find(|(t, _, _)| t == self)
	}

	/// The extension we'd use for a file of this type, including the dot.
	/// Empty if we don't know one.
	pub fn extension(&self) -> &'static str {
		self.lookup().map(|(_, _, ext)| *ext).unwrap_or("")
	}

	/// True if this picture's data is an image we recognize
	pub fn is_known_image(&self) -> bool {
		self.lookup().is_some()
	}
}
