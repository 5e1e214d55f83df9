//! Page tree structure for OneNote content.
//!
//! This module provides an owned tree mirroring the structural subset of a
//! OneNote page that conversion cares about. Any reader (the bundled XML
//! parser, a COM bridge, test fixtures) can build this structure and hand it
//! to [`PageConverter`](crate::PageConverter).
//!
//! The tree is deliberately lossless. List labels keep their literal marker
//! text and image payloads stay base64-encoded; style indices are resolved
//! only during conversion.

use crate::style::StyleDef;

/// A list marker attached to a content unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMarker {
    /// Unordered bullet item
    Bullet,
    /// Ordered item carrying the literal marker text from the source
    /// (for example `"3."`)
    Numbered(String),
}

/// A note tag attached to a content unit (to-do checkbox, star, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTag {
    /// Tag kind as declared by the source (a small numeric string)
    pub kind: String,
    /// Whether the tag is marked completed
    pub completed: bool,
}

impl NoteTag {
    pub fn new(kind: &str, completed: bool) -> Self {
        Self {
            kind: kind.to_string(),
            completed,
        }
    }
}

/// An embedded image: base64 payload text plus the declared format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Base64-encoded image bytes (may be empty when the source carried
    /// an image element without data)
    pub data: String,
    /// Declared image format (`"png"`, `"jpeg"`, ...), if any
    pub format: Option<String>,
}

impl ImageData {
    pub fn new(data: &str, format: Option<&str>) -> Self {
        Self {
            data: data.to_string(),
            format: format.map(str::to_string),
        }
    }
}

/// A reference to a file attached to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Display name of the attachment
    pub name: String,
    /// Source location on disk (may be empty when the cache path is gone)
    pub path: String,
}

impl FileRef {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

/// A table cell holding zero or more nested content units.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub content: Vec<ContentNode>,
}

impl TableCell {
    /// Create a cell containing a single text unit
    pub fn text(run: &str) -> Self {
        Self {
            content: vec![ContentNode::text(run)],
        }
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A row/cell grid embedded in the page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// Semantic payload of a content unit.
///
/// Exactly one variant is present per unit; units that carry nothing but
/// children use an empty `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    /// Inline rich-text runs (raw OneNote HTML subset, untranslated)
    Text(Vec<String>),
    /// An embedded image
    Image(ImageData),
    /// A file attachment reference
    File(FileRef),
    /// An embedded table
    Table(Table),
}

impl Default for NodeBody {
    fn default() -> Self {
        NodeBody::Text(Vec::new())
    }
}

/// One content unit of an outline: a line of content plus optional
/// nested children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentNode {
    /// Index into the page's quick style declarations
    pub style_index: Option<u32>,
    /// List marker, when the unit is a list item
    pub list: Option<ListMarker>,
    /// Note tag, when the unit carries one
    pub tag: Option<NoteTag>,
    /// The unit's payload
    pub body: NodeBody,
    /// Nested content units, rendered one indent level deeper
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Create an empty unit (no payload, no children)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text unit with a single run
    pub fn text(run: &str) -> Self {
        Self {
            body: NodeBody::Text(vec![run.to_string()]),
            ..Self::default()
        }
    }

    /// Create an image unit
    pub fn image(image: ImageData) -> Self {
        Self {
            body: NodeBody::Image(image),
            ..Self::default()
        }
    }

    /// Create a file attachment unit
    pub fn file(file: FileRef) -> Self {
        Self {
            body: NodeBody::File(file),
            ..Self::default()
        }
    }

    /// Create a table unit
    pub fn table(table: Table) -> Self {
        Self {
            body: NodeBody::Table(table),
            ..Self::default()
        }
    }

    /// Append a raw text run to a `Text` body.
    ///
    /// Does nothing when the unit carries a non-text payload.
    pub fn add_run(&mut self, run: &str) {
        if let NodeBody::Text(ref mut runs) = self.body {
            runs.push(run.to_string());
        }
    }

    /// Append a nested child unit
    pub fn add_child(&mut self, child: ContentNode) {
        self.children.push(child);
    }
}

/// A top-level outline: one independent block of content on the page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub children: Vec<ContentNode>,
}

impl Outline {
    pub fn new(children: Vec<ContentNode>) -> Self {
        Self { children }
    }
}

/// A complete page: quick style declarations plus outlines, in document
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub style_defs: Vec<StyleDef>,
    pub outlines: Vec<Outline>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outline
    pub fn add_outline(&mut self, outline: Outline) {
        self.outlines.push(outline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_body_is_empty_text() {
        let node = ContentNode::new();
        assert_eq!(node.body, NodeBody::Text(Vec::new()));
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_text_node() {
        let node = ContentNode::text("Hello");
        assert_eq!(node.body, NodeBody::Text(vec!["Hello".to_string()]));
    }

    #[test]
    fn test_add_run_appends_to_text_body() {
        let mut node = ContentNode::text("Hello");
        node.add_run("World");
        assert_eq!(
            node.body,
            NodeBody::Text(vec!["Hello".to_string(), "World".to_string()])
        );
    }

    #[test]
    fn test_add_run_ignored_on_image_body() {
        let mut node = ContentNode::image(ImageData::new("QUJD", Some("png")));
        node.add_run("ignored");
        match node.body {
            NodeBody::Image(ref img) => assert_eq!(img.data, "QUJD"),
            _ => panic!("body changed variant"),
        }
    }

    #[test]
    fn test_add_child() {
        let mut parent = ContentNode::text("parent");
        parent.add_child(ContentNode::text("child"));
        assert_eq!(parent.children.len(), 1);
    }

    #[test]
    fn test_cell_text_helper() {
        let cell = TableCell::text("A1");
        assert_eq!(cell.content.len(), 1);
        assert_eq!(cell.content[0].body, NodeBody::Text(vec!["A1".to_string()]));
    }
}
