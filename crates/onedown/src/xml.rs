//! OneNote page XML parsing.
//!
//! This module reads the XML a OneNote export produces for a single page
//! and builds the [`Page`](crate::Page) tree. Elements are matched by local
//! name, so the usual `one:` prefix (or any other binding of the namespace)
//! is accepted. Malformed XML fails the whole page; everything else
//! degrades per node.

use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::page::{
    ContentNode, FileRef, ImageData, ListMarker, NodeBody, NoteTag, Outline, Page, Table,
    TableCell, TableRow,
};
use crate::style::StyleDef;
use crate::{ConvertError, Result};

/// Parse page XML into a [`Page`] tree.
///
/// The root element must be a `Page`; anything else is rejected rather
/// than silently converting to an empty document.
pub fn parse_page(xml: &str) -> Result<Page> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut builder = Builder::default();
    let mut buf = Vec::new();
    // quick-xml reports a plain Eof even while elements are still open
    let mut open = 0usize;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                open += 1;
                if builder.skip_depth > 0 {
                    builder.skip_depth += 1;
                } else {
                    builder.start(&e)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if builder.skip_depth == 0 {
                    builder.empty(&e)?;
                }
            }
            Ok(Event::End(e)) => {
                open = open.saturating_sub(1);
                if builder.skip_depth > 0 {
                    builder.skip_depth -= 1;
                } else {
                    builder.end(local_name(e.name().as_ref()));
                }
            }
            Ok(Event::Text(t)) => {
                if builder.skip_depth == 0 && builder.capturing() {
                    let text = t
                        .unescape()
                        .map_err(|err| ConvertError::Xml(err.to_string()))?;
                    builder.append_text(&text);
                }
            }
            Ok(Event::CData(t)) => {
                if builder.skip_depth == 0 && builder.capturing() {
                    let bytes = t.into_inner();
                    builder.append_text(&String::from_utf8_lossy(&bytes));
                }
            }
            Ok(Event::Eof) => {
                if open > 0 {
                    return Err(ConvertError::Xml(
                        "unexpected end of document".to_string(),
                    ));
                }
                break;
            }
            Ok(_) => {}
            Err(err) => return Err(ConvertError::Xml(err.to_string())),
        }
        buf.clear();
    }

    builder.finish()
}

/// Strip a namespace prefix from an element or attribute name
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

/// Attribute lookup by local name
fn attr_val(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    for attr in e.attributes().with_checks(false).flatten() {
        if local_name(attr.key.as_ref()) == key {
            return attr.unescape_value().ok().map(|v| v.into_owned());
        }
    }
    None
}

/// One open `OE` element while its children are still being read.
#[derive(Default)]
struct OeFrame {
    style_index: Option<u32>,
    has_bullet: bool,
    number: Option<String>,
    tag: Option<NoteTag>,
    runs: Vec<String>,
    image: Option<ImageData>,
    file: Option<FileRef>,
    table: Option<Table>,
}

impl OeFrame {
    /// Close the frame into a content unit. When a source element carries
    /// several payloads the precedence is image, attachment, table, text.
    fn into_node(self, children: Vec<ContentNode>) -> ContentNode {
        let list = if self.has_bullet {
            Some(ListMarker::Bullet)
        } else {
            self.number.map(ListMarker::Numbered)
        };
        let body = if let Some(image) = self.image {
            NodeBody::Image(image)
        } else if let Some(file) = self.file {
            NodeBody::File(file)
        } else if let Some(table) = self.table {
            NodeBody::Table(table)
        } else {
            NodeBody::Text(self.runs)
        };
        ContentNode {
            style_index: self.style_index,
            list,
            tag: self.tag,
            body,
            children,
        }
    }
}

/// Streaming page builder: element stacks plus the text capture flags.
#[derive(Default)]
struct Builder {
    style_defs: Vec<StyleDef>,
    outlines: Vec<Outline>,
    /// Open node collections: one per open Outline, OE and Cell
    sinks: Vec<Vec<ContentNode>>,
    oe_stack: Vec<OeFrame>,
    table_stack: Vec<Table>,
    row_stack: Vec<TableRow>,
    /// Nesting depth inside a skipped subtree (Title)
    skip_depth: usize,
    saw_root: bool,
    in_t: bool,
    in_image: bool,
    in_data: bool,
    text_buf: String,
}

impl Builder {
    fn start(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let name = local_name(e.name().as_ref()).to_vec();
        self.check_root(&name)?;

        match name.as_slice() {
            b"Title" => self.skip_depth = 1,
            b"QuickStyleDef" => self.push_style_def(e),
            b"Outline" => self.sinks.push(Vec::new()),
            b"OE" => {
                self.oe_stack.push(OeFrame {
                    style_index: attr_val(e, b"quickStyleIndex").and_then(|v| v.parse().ok()),
                    ..OeFrame::default()
                });
                self.sinks.push(Vec::new());
            }
            b"T" => {
                self.in_t = true;
                self.text_buf.clear();
            }
            b"Bullet" => self.mark_bullet(),
            b"Number" => self.mark_number(e),
            b"Tag" => self.mark_tag(e),
            b"Image" => {
                if let Some(frame) = self.oe_stack.last_mut() {
                    if frame.image.is_none() {
                        frame.image = Some(ImageData {
                            data: String::new(),
                            format: attr_val(e, b"format"),
                        });
                        self.in_image = true;
                    }
                }
            }
            b"Data" => {
                if self.in_image {
                    self.in_data = true;
                }
            }
            b"InsertedFile" => self.mark_file(e),
            b"Table" => self.table_stack.push(Table::default()),
            b"Row" => self.row_stack.push(TableRow::default()),
            b"Cell" => self.sinks.push(Vec::new()),
            _ => {}
        }
        Ok(())
    }

    fn empty(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let name = local_name(e.name().as_ref()).to_vec();
        self.check_root(&name)?;

        match name.as_slice() {
            b"QuickStyleDef" => self.push_style_def(e),
            b"Outline" => self.outlines.push(Outline::default()),
            b"OE" => {
                let frame = OeFrame {
                    style_index: attr_val(e, b"quickStyleIndex").and_then(|v| v.parse().ok()),
                    ..OeFrame::default()
                };
                match self.sinks.last_mut() {
                    Some(sink) => sink.push(frame.into_node(Vec::new())),
                    None => warn!("content element outside any outline, dropped"),
                }
            }
            b"Bullet" => self.mark_bullet(),
            b"Number" => self.mark_number(e),
            b"Tag" => self.mark_tag(e),
            b"Image" => {
                if let Some(frame) = self.oe_stack.last_mut() {
                    if frame.image.is_none() {
                        frame.image = Some(ImageData {
                            data: String::new(),
                            format: attr_val(e, b"format"),
                        });
                    }
                }
            }
            b"InsertedFile" => self.mark_file(e),
            b"Table" => {
                if let Some(frame) = self.oe_stack.last_mut() {
                    if frame.table.is_none() {
                        frame.table = Some(Table::default());
                    }
                }
            }
            b"Row" => {
                if let Some(table) = self.table_stack.last_mut() {
                    table.rows.push(TableRow::default());
                }
            }
            b"Cell" => {
                if let Some(row) = self.row_stack.last_mut() {
                    row.cells.push(TableCell::default());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"T" => {
                self.in_t = false;
                if let Some(frame) = self.oe_stack.last_mut() {
                    frame.runs.push(std::mem::take(&mut self.text_buf));
                }
            }
            b"Data" => self.in_data = false,
            b"Image" => self.in_image = false,
            b"OE" => {
                let children = self.sinks.pop().unwrap_or_default();
                if let Some(frame) = self.oe_stack.pop() {
                    let node = frame.into_node(children);
                    match self.sinks.last_mut() {
                        Some(sink) => sink.push(node),
                        None => warn!("content element outside any outline, dropped"),
                    }
                }
            }
            b"Cell" => {
                let content = self.sinks.pop().unwrap_or_default();
                if let Some(row) = self.row_stack.last_mut() {
                    row.cells.push(TableCell { content });
                }
            }
            b"Row" => {
                if let Some(row) = self.row_stack.pop() {
                    if let Some(table) = self.table_stack.last_mut() {
                        table.rows.push(row);
                    }
                }
            }
            b"Table" => {
                if let Some(table) = self.table_stack.pop() {
                    if let Some(frame) = self.oe_stack.last_mut() {
                        if frame.table.is_none() {
                            frame.table = Some(table);
                        }
                    }
                }
            }
            b"Outline" => {
                let children = self.sinks.pop().unwrap_or_default();
                self.outlines.push(Outline { children });
            }
            _ => {}
        }
    }

    fn capturing(&self) -> bool {
        self.in_t || self.in_data
    }

    fn append_text(&mut self, text: &str) {
        if self.in_t {
            self.text_buf.push_str(text);
        } else if self.in_data {
            if let Some(frame) = self.oe_stack.last_mut() {
                if let Some(ref mut image) = frame.image {
                    image.data.push_str(text);
                }
            }
        }
    }

    fn check_root(&mut self, name: &[u8]) -> Result<()> {
        if self.saw_root {
            return Ok(());
        }
        if name != b"Page" {
            return Err(ConvertError::InvalidInput(format!(
                "expected a Page root element, found {:?}",
                String::from_utf8_lossy(name)
            )));
        }
        self.saw_root = true;
        Ok(())
    }

    fn push_style_def(&mut self, e: &BytesStart<'_>) {
        let name = attr_val(e, b"name").unwrap_or_default();
        match attr_val(e, b"index").and_then(|v| v.parse().ok()) {
            Some(index) => self.style_defs.push(StyleDef { index, name }),
            None => warn!("quick style def {:?} has no usable index, skipped", name),
        }
    }

    fn mark_bullet(&mut self) {
        if let Some(frame) = self.oe_stack.last_mut() {
            frame.has_bullet = true;
        }
    }

    fn mark_number(&mut self, e: &BytesStart<'_>) {
        if let Some(frame) = self.oe_stack.last_mut() {
            if frame.number.is_none() {
                frame.number = Some(attr_val(e, b"text").unwrap_or_else(|| "1".to_string()));
            }
        }
    }

    fn mark_tag(&mut self, e: &BytesStart<'_>) {
        if let Some(frame) = self.oe_stack.last_mut() {
            if frame.tag.is_none() {
                frame.tag = Some(NoteTag {
                    kind: attr_val(e, b"type").unwrap_or_default(),
                    completed: attr_val(e, b"completed")
                        .map(|v| v.eq_ignore_ascii_case("true"))
                        .unwrap_or(false),
                });
            }
        }
    }

    fn mark_file(&mut self, e: &BytesStart<'_>) {
        if let Some(frame) = self.oe_stack.last_mut() {
            if frame.file.is_none() {
                frame.file = Some(FileRef {
                    name: attr_val(e, b"preferredName")
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "attachment".to_string()),
                    path: attr_val(e, b"pathCache").unwrap_or_default(),
                });
            }
        }
    }

    fn finish(self) -> Result<Page> {
        if !self.saw_root {
            return Err(ConvertError::InvalidInput(
                "document contains no elements".to_string(),
            ));
        }
        Ok(Page {
            style_defs: self.style_defs,
            outlines: self.outlines,
        })
    }
}
