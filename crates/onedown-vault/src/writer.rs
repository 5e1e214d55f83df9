//! Obsidian vault writer.
//!
//! Materializes one converted page. Images and attachments land in their
//! configured folders; the note itself is written under the import folder
//! with a collision-free filename.

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use onedown::{sanitize_filename, CollectedAttachment, CollectedImage, FILENAME_MAX_LEN};

use crate::config::VaultConfig;
use crate::note::NoteMetadata;
use crate::Result;

/// Writes notes and their assets into a vault.
pub struct VaultWriter {
    import_dir: PathBuf,
    images_dir: PathBuf,
    attachments_dir: PathBuf,
}

impl VaultWriter {
    /// Create a writer, ensuring the target directories exist.
    pub fn new(config: &VaultConfig) -> Result<Self> {
        let writer = Self {
            import_dir: config.vault_path.join(&config.import_folder),
            images_dir: config.vault_path.join(&config.images_folder),
            attachments_dir: config.vault_path.join(&config.attachments_folder),
        };
        for dir in [&writer.import_dir, &writer.images_dir, &writer.attachments_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(writer)
    }

    /// Write a converted note plus its collected assets.
    ///
    /// Returns the path of the written note file.
    pub fn write_note(
        &self,
        metadata: &NoteMetadata,
        body: &str,
        images: &[CollectedImage],
        attachments: &[CollectedAttachment],
    ) -> Result<PathBuf> {
        for image in images {
            let dest = self.images_dir.join(&image.filename);
            fs::write(&dest, &image.bytes)?;
            debug!("wrote image {}", dest.display());
        }
        for attachment in attachments {
            self.copy_attachment(attachment);
        }

        let note_path = self.resolve_note_path(&metadata.title);
        let content = format!(
            "{}\n\n# {}\n\n{}\n",
            metadata.frontmatter(),
            metadata.title,
            body
        );
        fs::write(&note_path, content)?;
        debug!("wrote note {}", note_path.display());
        Ok(note_path)
    }

    /// Copy one attachment into the vault.
    ///
    /// The display name comes straight from the page XML, so it is
    /// sanitized before it becomes a file name. A destination that already
    /// exists with the same size is kept as-is. The source was only probed
    /// during conversion, so it may have vanished since; that degrades to
    /// a warning rather than failing the note.
    fn copy_attachment(&self, attachment: &CollectedAttachment) {
        let file_name = sanitize_filename(&attachment.name, FILENAME_MAX_LEN);
        let file_name = if file_name.is_empty() {
            "attachment".to_string()
        } else {
            file_name
        };
        let dest = self.attachments_dir.join(file_name);
        if let (Ok(dest_meta), Ok(src_meta)) =
            (fs::metadata(&dest), fs::metadata(&attachment.source))
        {
            if dest_meta.len() == src_meta.len() {
                debug!("attachment {} already in vault, skipped", attachment.name);
                return;
            }
        }
        if let Err(err) = fs::copy(&attachment.source, &dest) {
            warn!("could not copy attachment {:?}: {}", attachment.name, err);
        }
    }

    /// Note path for a title: `<import>/<title>.md`, suffixed `_2`, `_3`,
    /// ... until the name is free.
    fn resolve_note_path(&self, title: &str) -> PathBuf {
        let stem = sanitize_filename(title, FILENAME_MAX_LEN);
        let stem = if stem.is_empty() {
            "Untitled".to_string()
        } else {
            stem
        };

        let mut candidate = self.import_dir.join(format!("{}.md", stem));
        let mut counter = 2;
        while candidate.exists() {
            candidate = self.import_dir.join(format!("{}_{}.md", stem, counter));
            counter += 1;
        }
        candidate
    }
}
