//! Read flac metadata

pub mod blocks;
pub mod errors;
pub mod file;
pub mod stream;
