//! # onedown
//!
//! Convert OneNote page trees to Obsidian-flavored Markdown.
//!
//! ## Design
//!
//! The converter works on an already-materialized [`Page`] tree rather than
//! raw XML. This design allows:
//!
//! - **Any source**: the bundled XML parser, a live application bridge, or
//!   hand-built fixtures all feed the same tree
//! - **Side channels**: images and attachments come back as data, not as
//!   files; the caller decides where they land
//! - **Smaller builds**: the XML parser stays behind a default feature
//!
//! Output is Obsidian's dialect: ATX headings, `- [ ]` task items,
//! `![[...]]` embeds and `[[...]]` links, two-space list indentation.
//!
//! ## Example (tree-based)
//!
//! ```rust
//! use onedown::{ContentNode, Outline, Page, PageConverter};
//!
//! let mut page = Page::new();
//! page.add_outline(Outline::new(vec![ContentNode::text("Hello <b>World</b>")]));
//!
//! let mut converter = PageConverter::new("Demo");
//! let markdown = converter.convert(&page).unwrap();
//! assert_eq!(markdown, "Hello **World**");
//! ```
//!
//! ## Example (page XML)
//!
//! ```rust
//! use onedown::PageConverter;
//!
//! let xml = r#"<one:Page xmlns:one="http://schemas.microsoft.com/office/onenote/2013/onenote">
//!   <one:Outline><one:OEChildren>
//!     <one:OE><one:T><![CDATA[Hello <b>World</b>]]></one:T></one:OE>
//!   </one:OEChildren></one:Outline>
//! </one:Page>"#;
//!
//! let mut converter = PageConverter::new("Demo");
//! let markdown = converter.convert_xml(xml).unwrap();
//! assert_eq!(markdown, "Hello **World**");
//! ```

pub mod assets;
pub mod inline;
pub mod page;
mod service;
pub mod style;
pub mod table;
#[cfg(feature = "xml")]
pub mod xml;

pub use assets::{
    sanitize_filename, AssetCollector, CollectedAttachment, CollectedImage, FILENAME_MAX_LEN,
};
pub use inline::{collect_text, translate};
pub use page::{
    ContentNode, FileRef, ImageData, ListMarker, NodeBody, NoteTag, Outline, Page, Table,
    TableCell, TableRow,
};
pub use service::PageConverter;
pub use style::{StyleDef, StyleRole, StyleTable};
#[cfg(feature = "xml")]
pub use xml::parse_page;

/// Error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
