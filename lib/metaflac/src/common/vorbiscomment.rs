//! Decode and normalize Vorbis comment blocks
//!
//! Unlike the rest of flac, every length in a vorbis comment
//! is a little-endian u32.

use smartstring::{LazyCompact, SmartString};
use std::{
	collections::BTreeMap,
	io::{Cursor, Read},
	string::FromUtf8Error,
};
use thiserror::Error;

use super::genre::GenreTable;
use crate::flac::errors::FlacErrorKind;

/// An error we can encounter while decoding a vorbis comment
#[derive(Debug, Error)]
pub enum VorbisCommentDecodeError {
	/// A length field or the data it describes
	/// runs past the end of the comment block
	#[error("{0} overruns comment block")]
	MalformedData(&'static str),

	/// We tried to decode a string, but got invalid data
	#[error("invalid utf-8 in {field}")]
	FailedStringDecode {
		/// The field we were decoding
		field: &'static str,

		/// The underlying error
		#[source]
		source: FromUtf8Error,
	},
}

impl VorbisCommentDecodeError {
	/// The class of this error
	pub fn kind(&self) -> FlacErrorKind {
		match self {
			Self::MalformedData(_) => FlacErrorKind::Format,
			Self::FailedStringDecode { .. } => FlacErrorKind::Encoding,
		}
	}
}

/// A decoded vorbis comment block, exactly as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VorbisComment {
	/// This comment's vendor string
	pub vendor: SmartString<LazyCompact>,

	/// Every comment string, in order.
	/// These should look like `KEY=value`, but aren't checked.
	pub comments: Vec<String>,
}

fn read_string(
	d: &mut Cursor<&[u8]>,
	field: &'static str,
) -> Result<String, VorbisCommentDecodeError> {
	let mut block = [0u8; 4];
	if d.read_exact(&mut block).is_err() {
		return Err(VorbisCommentDecodeError::MalformedData("length"));
	}
	let length = u64::from(u32::from_le_bytes(block));

	let mut text = Vec::new();
	match d.by_ref().take(length).read_to_end(&mut text) {
		Ok(n) if n as u64 == length => {}
		_ => return Err(VorbisCommentDecodeError::MalformedData(field)),
	}

	String::from_utf8(text)
		.map_err(|source| VorbisCommentDecodeError::FailedStringDecode { field, source })
}

impl VorbisComment {
	/// Try to decode the given data as a vorbis comment block
	pub fn decode(data: &[u8]) -> Result<Self, VorbisCommentDecodeError> {
		let mut d = Cursor::new(data);

		let vendor = read_string(&mut d, "vendor string")?;

		let n_comments = {
			let mut block = [0u8; 4];
			if d.read_exact(&mut block).is_err() {
				return Err(VorbisCommentDecodeError::MalformedData("comment count"));
			}
			u32::from_le_bytes(block)
		};

		// Don't trust `n_comments` with an allocation,
		// each comment takes at least four bytes.
		let mut comments = Vec::with_capacity((n_comments as usize).min(data.len() >> 2));
		for _ in 0..n_comments {
			comments.push(read_string(&mut d, "comment")?);
		}

		Ok(Self {
			vendor: vendor.into(),
			comments,
		})
	}

	/// Build a tag map from these comments.
	///
	/// - entries without `=` are dropped
	/// - keys are uppercased
	/// - `GENRE` values are replaced through `genres`, if given
	/// - values containing `;` are split into multiple trimmed values
	pub fn normalize(&self, genres: Option<&GenreTable>) -> NormalizedComments {
		// An empty table does nothing, treat it like no table at all
		let genres = genres.filter(|g| !g.is_empty());

		let mut tags = VorbisCommentMap::new();
		let mut changed = false;
		let mut events = Vec::new();

		for comment in &self.comments {
			let Some((key, value)) = comment.split_once('=') else {
				continue;
			};
			let key = key.to_uppercase();
			let mut value = value;

			if key == "GENRE" {
				if let Some(genres) = genres {
					match genres.lookup(value) {
						Some(canonical) => {
							if canonical != value {
								events.push(CommentEvent::GenreReplaced {
									from: value.into(),
									to: canonical.into(),
								});
								changed = true;
							}
							value = canonical;
						}
						None => events.push(CommentEvent::GenreMiss {
							value: value.into(),
						}),
					}
				}
			}

			if value.contains(';') {
				changed = true;
				for piece in value.split(';').map(str::trim).filter(|x| !x.is_empty()) {
					tags.push(&key, piece);
				}
			} else {
				tags.push(&key, value);
			}
		}

		NormalizedComments {
			vendor: self.vendor.clone(),
			tags,
			changed,
			events,
		}
	}
}

/// Something notable that happened while normalizing comments.
/// None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEvent {
	/// A genre wasn't in the genre table and was kept as-is
	GenreMiss {
		/// The genre we looked up
		value: String,
	},

	/// A genre was replaced with a different canonical genre
	GenreReplaced {
		/// The genre we found
		from: String,

		/// What we replaced it with
		to: String,
	},
}

/// A map from uppercase tag keys to their values.
/// Values keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VorbisCommentMap {
	tags: BTreeMap<SmartString<LazyCompact>, Vec<String>>,
}

impl VorbisCommentMap {
	/// Make an empty map
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a value to `key`.
	/// `key` is stored uppercase.
	pub fn push(&mut self, key: &str, value: impl Into<String>) {
		self.tags
			.entry(key.to_uppercase().into())
			.or_default()
			.push(value.into());
	}

	/// All values of `key`, in order. Keys are case-insensitive.
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.tags
			.get(key.to_uppercase().as_str())
			.map(|x| x.as_slice())
	}

	/// The number of distinct keys in this map
	pub fn len(&self) -> usize {
		self.tags.len()
	}

	/// True if this map has no keys
	pub fn is_empty(&self) -> bool {
		self.tags.is_empty()
	}

	/// Iterate over `(key, values)`, ordered by key
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	/// Render this map as `KEY=value` lines, one per value,
	/// in the form tag import tools expect.
	/// Line breaks inside values become spaces.
	pub fn tag_lines(&self) -> Vec<String> {
		self.iter()
			.flat_map(|(k, values)| {
				values.iter().map(move |v| {
					let v = v.replace("\r\n", " ").replace(['\n', '\r'], " ");
					format!("{k}={v}")
				})
			})
			.collect()
	}

	/// Take the underlying map
	pub fn into_inner(self) -> BTreeMap<SmartString<LazyCompact>, Vec<String>> {
		self.tags
	}
}

/// The result of normalizing a vorbis comment block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedComments {
	/// The vendor string of the comment block
	pub vendor: SmartString<LazyCompact>,

	/// The normalized tags
	pub tags: VorbisCommentMap,

	/// True if normalization changed the meaning of any tag,
	/// which means these tags should be written back.
	pub changed: bool,

	/// Things worth reporting that happened during normalization
	pub events: Vec<CommentEvent>,
}

#[cfg(test)]
pub(crate) fn encode_comment(vendor: &str, comments: &[&str]) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&u32::try_from(vendor.len()).unwrap().to_le_bytes());
	out.extend_from_slice(vendor.as_bytes());
	out.extend_from_slice(&u32::try_from(comments.len()).unwrap().to_le_bytes());
	for c in comments {
		out.extend_from_slice(&u32::try_from(c.len()).unwrap().to_le_bytes());
		out.extend_from_slice(c.as_bytes());
	}
	out
}
