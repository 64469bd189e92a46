use anyhow::Result;
use flactag_metaflac::{CommentEvent, FlacFile, GenreTable};
use flactag_util::MimeType;
use std::path::Path;

/// Print every metadata block of the flac file at `path`
#[expect(clippy::print_stdout)]
pub fn show(path: &Path, genres: Option<&GenreTable>) -> Result<()> {
	let flac = FlacFile::open(path)?;

	println!("file: {}", flac.file());
	if let Some(id3) = flac.id3() {
		println!(
			"id3: v2.{}.{}, {} bytes",
			id3.major_version, id3.revision, id3.size
		);
	}
	println!("audio offset: {}", flac.audio_offset());

	if let Some(s) = flac.streaminfo()? {
		println!("streaminfo:");
		println!("  block size: {} - {}", s.min_block_size, s.max_block_size);
		println!("  frame size: {} - {}", s.min_frame_size, s.max_frame_size);
		println!("  sample rate: {} Hz", s.sample_rate);
		println!("  channels: {}", s.channels);
		println!("  bits per sample: {}", s.bits_per_sample);
		println!("  total samples: {}", s.total_samples);
		println!("  md5: {}", s.md5_hex());
	}

	if let Some(a) = flac.application()? {
		println!("application:");
		println!("  id: {}", a.application_id_hex());
		println!("  data: {} bytes", a.data.len());
	}

	if let Some(t) = flac.seektable()? {
		println!("seektable: {} points", t.points.len());
		for p in &t.points {
			if p.is_placeholder() {
				println!("  placeholder");
			} else {
				println!(
					"  sample {} at byte {}, {} samples",
					p.sample_number, p.byte_offset, p.frame_samples
				);
			}
		}
	}

	if let Some(c) = flac.cuesheet()? {
		println!("cuesheet: {} bytes", c.data.len());
	}

	if let Some(p) = flac.picture()? {
		println!("picture:");
		match p.kind() {
			Some(kind) => println!("  type: {kind}"),
			None => println!("  type: unknown ({})", p.picture_type),
		}
		let mime = p.mime_type();
		match mime.extension() {
			"" => println!("  mime: {}", p.mime),
			ext => println!("  mime: {} ({ext})", p.mime),
		}
		if !p.description.is_empty() {
			println!("  description: {}", p.description);
		}
		println!("  size: {}x{}, {} bit", p.width, p.height, p.bit_depth);
		if p.color_count != 0 {
			println!("  colors: {}", p.color_count);
		}
		if mime == MimeType::Url {
			println!("  url: {}", String::from_utf8_lossy(&p.img_data));
		} else if !mime.is_known_image() {
			println!("  data: {} bytes, unknown format", p.img_data.len());
		} else {
			println!("  data: {} bytes", p.img_data.len());
		}
	}

	if let Some(c) = flac.vorbis_comment(genres)? {
		println!("vorbis comment:");
		println!("  vendor: {}", c.vendor);
		for line in c.tags.tag_lines() {
			println!("  {line}");
		}

		for event in &c.events {
			match event {
				CommentEvent::GenreMiss { value } => {
					println!("  ! genre `{value}` is not in the genre table");
				}
				CommentEvent::GenreReplaced { from, to } => {
					println!("  ! genre `{from}` becomes `{to}`");
				}
			}
		}

		if c.changed {
			println!("  ! tags should be rewritten");
		}
	}

	return Ok(());
}
