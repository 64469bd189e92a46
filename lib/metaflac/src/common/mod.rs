//! Parts shared by all formats

pub mod genre;
pub mod picturetype;
pub mod vorbiscomment;
