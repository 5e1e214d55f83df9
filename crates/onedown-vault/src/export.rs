//! End-to-end page export.

use std::path::{Path, PathBuf};

use log::info;
use onedown::PageConverter;

use crate::config::VaultConfig;
use crate::note::{obsidian_uri, NoteMetadata};
use crate::writer::VaultWriter;
use crate::Result;

/// Summary of one exported page.
#[derive(Debug)]
pub struct ExportReport {
    /// Path of the written note file.
    pub note_path: PathBuf,
    /// Number of images written into the vault.
    pub image_count: usize,
    /// Number of attachments queued for the vault.
    pub attachment_count: usize,
}

/// Converts page XML and writes the result into a vault.
pub struct Exporter {
    config: VaultConfig,
    writer: VaultWriter,
}

impl Exporter {
    /// Create an exporter for a vault, ensuring its folders exist.
    pub fn new(config: VaultConfig) -> Result<Self> {
        let writer = VaultWriter::new(&config)?;
        Ok(Self { config, writer })
    }

    /// The vault configuration this exporter writes into.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Convert one page and write the note plus its assets.
    pub fn export_page(&self, xml: &str, metadata: &NoteMetadata) -> Result<ExportReport> {
        let mut converter = PageConverter::new(&metadata.title);
        let body = converter.convert_xml(xml)?;
        let (images, attachments) = converter.into_assets();

        let note_path = self
            .writer
            .write_note(metadata, &body, &images, &attachments)?;
        info!(
            "exported '{}' ({} images, {} attachments)",
            metadata.title,
            images.len(),
            attachments.len()
        );
        Ok(ExportReport {
            note_path,
            image_count: images.len(),
            attachment_count: attachments.len(),
        })
    }

    /// `obsidian://open` link for a note written by this exporter.
    pub fn note_uri(&self, note_path: &Path) -> Option<String> {
        obsidian_uri(&self.config.vault_name, &self.config.vault_path, note_path)
    }
}
