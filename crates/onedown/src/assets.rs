//! Asset collection.
//!
//! Images and file attachments cannot live inside Markdown text, so the
//! converter emits an Obsidian reference in their place and queues the
//! binary side for the caller to materialize. All state is per converter
//! instance; nothing here writes to disk (the attachment probe is a
//! read-only existence check).

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::page::{FileRef, ImageData};

/// Default length cap for sanitized filenames
pub const FILENAME_MAX_LEN: usize = 50;

/// Formats accepted for image files; anything else falls back to `png`
const IMAGE_FORMATS: &[&str] = &["png", "jpg", "gif", "bmp", "tiff", "tif", "svg"];

static RE_ILLEGAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap());

/// A decoded image waiting to be written into the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedImage {
    /// Vault filename the body references via `![[...]]`
    pub filename: String,
    /// Decoded image bytes
    pub bytes: Vec<u8>,
}

/// An attachment waiting to be copied into the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedAttachment {
    /// Display name the body references via `[[...]]`
    pub name: String,
    /// Where the file currently lives on disk
    pub source: PathBuf,
}

/// Per-conversion collector for images and attachments.
#[derive(Debug, Default)]
pub struct AssetCollector {
    title_stem: String,
    img_counter: u32,
    att_counter: u32,
    images: Vec<CollectedImage>,
    attachments: Vec<CollectedAttachment>,
}

impl AssetCollector {
    /// Create a collector for a page. The title seeds image filenames.
    pub fn new(page_title: &str) -> Self {
        Self {
            title_stem: sanitize_filename(page_title, 40),
            ..Self::default()
        }
    }

    /// Decode and queue an embedded image, returning the body replacement.
    ///
    /// Failure is per node: a missing payload or an undecodable one yields
    /// an HTML comment marker and queues nothing. The sequence counter
    /// advances on every decode attempt, so a failed image still consumes
    /// its number.
    pub fn embed_image(&mut self, image: &ImageData) -> String {
        if image.data.trim().is_empty() {
            return "<!-- image: no data -->".to_string();
        }

        let format = normalize_format(image.format.as_deref());
        self.img_counter += 1;
        let filename = format!("{}_img_{:02}.{}", self.title_stem, self.img_counter, format);

        // OneNote wraps long payloads; whitespace is not part of the data
        let payload: String = image.data.chars().filter(|c| !c.is_whitespace()).collect();
        match STANDARD.decode(payload.as_bytes()) {
            Ok(bytes) => {
                debug!("decoded image {} ({} bytes)", filename, bytes.len());
                self.images.push(CollectedImage {
                    filename: filename.clone(),
                    bytes,
                });
                format!("![[{}]]", filename)
            }
            Err(err) => {
                warn!("image {} failed to decode: {}", filename, err);
                "<!-- image: decode failed -->".to_string()
            }
        }
    }

    /// Queue a file attachment, returning the body replacement.
    ///
    /// An attachment whose source path is empty or gone renders as a
    /// placeholder line instead of a link; nothing is queued for it.
    pub fn queue_attachment(&mut self, file: &FileRef) -> String {
        let name = if file.name.is_empty() {
            "attachment"
        } else {
            file.name.as_str()
        };

        if file.path.is_empty() || !Path::new(&file.path).exists() {
            warn!("attachment {} not found at {:?}", name, file.path);
            return format!("📎 *Attachment: {} (file not found on disk)*", name);
        }

        self.att_counter += 1;
        debug!("queued attachment #{}: {}", self.att_counter, name);
        self.attachments.push(CollectedAttachment {
            name: name.to_string(),
            source: PathBuf::from(&file.path),
        });
        format!("[[{}]]", name)
    }

    /// Images queued so far
    pub fn images(&self) -> &[CollectedImage] {
        &self.images
    }

    /// Attachments queued so far
    pub fn attachments(&self) -> &[CollectedAttachment] {
        &self.attachments
    }

    /// Consume the collector, yielding its queues
    pub fn into_parts(self) -> (Vec<CollectedImage>, Vec<CollectedAttachment>) {
        (self.images, self.attachments)
    }
}

/// Normalize a declared image format to a file extension.
fn normalize_format(declared: Option<&str>) -> String {
    let declared = match declared {
        Some(f) if !f.is_empty() => f,
        _ => "png",
    };
    let mut format = declared.to_lowercase();
    if format == "jpeg" {
        format = "jpg".to_string();
    }
    if !IMAGE_FORMATS.contains(&format.as_str()) {
        format = "png".to_string();
    }
    format
}

/// Make a string safe to use as a filename.
///
/// Reserved characters and ASCII controls become `_`, trailing dots and
/// spaces are trimmed, and the result is capped at `max_len` characters.
pub fn sanitize_filename(name: &str, max_len: usize) -> String {
    let cleaned = RE_ILLEGAL.replace_all(name, "_");
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == ' ');
    cleaned.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_B64: &str = "aGVsbG8="; // "hello"

    #[test]
    fn test_image_embed() {
        let mut assets = AssetCollector::new("My Page");
        let md = assets.embed_image(&ImageData::new(HELLO_B64, Some("png")));
        assert_eq!(md, "![[My Page_img_01.png]]");
        assert_eq!(assets.images().len(), 1);
        assert_eq!(assets.images()[0].bytes, b"hello");
    }

    #[test]
    fn test_image_without_data() {
        let mut assets = AssetCollector::new("Page");
        let md = assets.embed_image(&ImageData::new("   ", Some("png")));
        assert_eq!(md, "<!-- image: no data -->");
        assert!(assets.images().is_empty());

        // The counter did not move, so the next image is still 01
        let md = assets.embed_image(&ImageData::new(HELLO_B64, Some("png")));
        assert_eq!(md, "![[Page_img_01.png]]");
    }

    #[test]
    fn test_image_decode_failure_consumes_number() {
        let mut assets = AssetCollector::new("Page");
        let md = assets.embed_image(&ImageData::new("!!not base64!!", Some("png")));
        assert_eq!(md, "<!-- image: decode failed -->");
        assert!(assets.images().is_empty());

        let md = assets.embed_image(&ImageData::new(HELLO_B64, Some("png")));
        assert_eq!(md, "![[Page_img_02.png]]");
    }

    #[test]
    fn test_image_payload_may_wrap() {
        let mut assets = AssetCollector::new("Page");
        let md = assets.embed_image(&ImageData::new("aGVs\nbG8=", None));
        assert_eq!(md, "![[Page_img_01.png]]");
        assert_eq!(assets.images()[0].bytes, b"hello");
    }

    #[test]
    fn test_image_format_normalization() {
        let mut assets = AssetCollector::new("P");
        assets.embed_image(&ImageData::new(HELLO_B64, Some("JPEG")));
        assets.embed_image(&ImageData::new(HELLO_B64, Some("webp")));
        assets.embed_image(&ImageData::new(HELLO_B64, None));
        assets.embed_image(&ImageData::new(HELLO_B64, Some("TIFF")));
        let names: Vec<&str> = assets.images().iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "P_img_01.jpg",
                "P_img_02.png",
                "P_img_03.png",
                "P_img_04.tiff"
            ]
        );
    }

    #[test]
    fn test_image_filename_uses_sanitized_title() {
        let mut assets = AssetCollector::new("a/b: c?");
        let md = assets.embed_image(&ImageData::new(HELLO_B64, None));
        assert_eq!(md, "![[a_b_ c__img_01.png]]");
    }

    #[test]
    fn test_attachment_missing_path() {
        let mut assets = AssetCollector::new("Page");
        let md = assets.queue_attachment(&FileRef::new("report.pdf", ""));
        assert_eq!(md, "📎 *Attachment: report.pdf (file not found on disk)*");
        assert!(assets.attachments().is_empty());
    }

    #[test]
    fn test_attachment_nonexistent_path() {
        let mut assets = AssetCollector::new("Page");
        let md = assets.queue_attachment(&FileRef::new(
            "report.pdf",
            "/definitely/not/here/report.pdf",
        ));
        assert_eq!(md, "📎 *Attachment: report.pdf (file not found on disk)*");
        assert!(assets.attachments().is_empty());
    }

    #[test]
    fn test_attachment_queued_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"hi").unwrap();

        let mut assets = AssetCollector::new("Page");
        let md = assets.queue_attachment(&FileRef::new("notes.txt", path.to_str().unwrap()));
        assert_eq!(md, "[[notes.txt]]");
        assert_eq!(assets.attachments().len(), 1);
        assert_eq!(assets.attachments()[0].source, path);
    }

    #[test]
    fn test_attachment_empty_name_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x");
        std::fs::write(&path, b"x").unwrap();

        let mut assets = AssetCollector::new("Page");
        let md = assets.queue_attachment(&FileRef::new("", path.to_str().unwrap()));
        assert_eq!(md, "[[attachment]]");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a<b>c", FILENAME_MAX_LEN), "a_b_c");
        assert_eq!(sanitize_filename("notes: 2024/01", FILENAME_MAX_LEN), "notes_ 2024_01");
        assert_eq!(sanitize_filename("trailing.. ", FILENAME_MAX_LEN), "trailing");
        assert_eq!(sanitize_filename("tab\there", FILENAME_MAX_LEN), "tab_here");
        assert_eq!(sanitize_filename("abcdef", 3), "abc");
    }
}
