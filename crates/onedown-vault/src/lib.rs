//! # onedown-vault
//!
//! Persist converted OneNote pages into an Obsidian vault.
//!
//! [`onedown`] turns a page into Markdown plus queues of images and
//! attachments; this crate owns everything after that point: the vault
//! configuration, YAML frontmatter, collision-free note paths, and the
//! actual filesystem writes. [`Exporter`] ties the two halves together.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use onedown_vault::{Exporter, NoteMetadata, VaultConfig};
//!
//! let config = VaultConfig::load(Path::new("onedown.json")).unwrap();
//! let exporter = Exporter::new(config).unwrap();
//!
//! let xml = std::fs::read_to_string("page.xml").unwrap();
//! let report = exporter
//!     .export_page(&xml, &NoteMetadata::new("Meeting Notes"))
//!     .unwrap();
//! println!("wrote {}", report.note_path.display());
//! ```

mod config;
mod export;
mod note;
mod writer;

pub use config::VaultConfig;
pub use export::{ExportReport, Exporter};
pub use note::{obsidian_uri, NoteMetadata};
pub use writer::VaultWriter;

/// Error type for vault operations
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Conversion failed: {0}")]
    Convert(#[from] onedown::ConvertError),
}

pub type Result<T> = std::result::Result<T, VaultError>;
