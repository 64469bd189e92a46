#![warn(missing_docs)]

//! Read FLAC metadata blocks and normalize their vorbis comments.
//!
//! [`FlacFile`] reads every metadata block of a flac file in one pass
//! and keeps the raw block bodies. Each block is decoded only when
//! its getter is called.

pub mod common;
pub mod flac;

pub use common::genre::GenreTable;
pub use common::vorbiscomment::{CommentEvent, NormalizedComments, VorbisCommentMap};
pub use flac::errors::{FlacDecodeError, FlacErrorKind, FlacReadError};
pub use flac::file::FlacFile;
