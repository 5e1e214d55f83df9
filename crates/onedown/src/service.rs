//! PageConverter - the main entry point for page tree to Markdown conversion.

use log::debug;

use crate::assets::{AssetCollector, CollectedAttachment, CollectedImage};
use crate::inline;
use crate::page::{ContentNode, ListMarker, NodeBody, Page};
use crate::style::{StyleRole, StyleTable};
use crate::table;
use crate::Result;

/// Tag kinds that render as task checkboxes
const TODO_TAG_KINDS: &[&str] = &["1", "3"];

/// The main service for converting a page tree to Markdown.
///
/// One converter handles one page: it owns the image and attachment queues
/// for that page, and their sequence counters. Create a fresh instance per
/// page.
pub struct PageConverter {
    styles: StyleTable,
    assets: AssetCollector,
}

impl PageConverter {
    /// Create a converter for a page. The title seeds asset filenames.
    pub fn new(page_title: &str) -> Self {
        Self {
            styles: StyleTable::default(),
            assets: AssetCollector::new(page_title),
        }
    }

    /// Convert a page tree to Markdown.
    ///
    /// Outlines render independently and join with a blank line; the final
    /// result is trimmed. Collected assets are available afterwards via
    /// [`images`](Self::images) and [`attachments`](Self::attachments).
    pub fn convert(&mut self, page: &Page) -> Result<String> {
        self.styles = StyleTable::build(&page.style_defs);
        debug!(
            "converting page: {} style defs, {} outlines",
            page.style_defs.len(),
            page.outlines.len()
        );

        let mut blocks = Vec::new();
        for outline in &page.outlines {
            let block = self.process_list(&outline.children, 0);
            if !block.trim().is_empty() {
                blocks.push(block);
            }
        }
        Ok(blocks.join("\n\n").trim().to_string())
    }

    /// Parse page XML and convert it in one step.
    #[cfg(feature = "xml")]
    pub fn convert_xml(&mut self, xml: &str) -> Result<String> {
        let page = crate::xml::parse_page(xml)?;
        self.convert(&page)
    }

    /// Images collected by the last conversion
    pub fn images(&self) -> &[CollectedImage] {
        self.assets.images()
    }

    /// Attachments collected by the last conversion
    pub fn attachments(&self) -> &[CollectedAttachment] {
        self.assets.attachments()
    }

    /// Consume the converter, yielding the collected assets
    pub fn into_assets(self) -> (Vec<CollectedImage>, Vec<CollectedAttachment>) {
        self.assets.into_parts()
    }

    /// Render a content list: units at one depth, non-empty renditions
    /// joined with newlines.
    fn process_list(&mut self, nodes: &[ContentNode], depth: usize) -> String {
        let parts: Vec<String> = nodes
            .iter()
            .map(|node| self.process_node(node, depth))
            .filter(|part| !part.is_empty())
            .collect();
        parts.join("\n")
    }

    /// Render one unit: its own line, then its children one level deeper.
    fn process_node(&mut self, node: &ContentNode, depth: usize) -> String {
        let prefix = "  ".repeat(depth);

        let mut line = match node.body {
            NodeBody::Image(ref image) => {
                format!("{}{}", prefix, self.assets.embed_image(image))
            }
            NodeBody::File(ref file) => {
                format!("{}{}", prefix, self.assets.queue_attachment(file))
            }
            // Pipe tables only parse flush-left, so the prefix is dropped
            NodeBody::Table(ref table) => table::render(table),
            NodeBody::Text(_) => {
                let text = inline::collect_text(node);
                let role = node
                    .style_index
                    .map(|index| self.styles.resolve(index))
                    .unwrap_or(StyleRole::Normal);
                match role {
                    StyleRole::Suppressed => String::new(),
                    StyleRole::Heading(level) => {
                        format!("{}{} {}", prefix, "#".repeat(level as usize), text)
                    }
                    StyleRole::Normal => match node.list {
                        Some(ListMarker::Bullet) => format!("{}- {}", prefix, text),
                        Some(ListMarker::Numbered(ref marker)) => {
                            format!("{}{}. {}", prefix, ordered_label(marker), text)
                        }
                        None => format!("{}{}", prefix, text),
                    },
                }
            }
        };

        // To-do tags rewrite the line into a task item. An empty line has
        // nothing to rewrite, so a tag on a suppressed unit is dropped.
        if let Some(ref tag) = node.tag {
            if !line.is_empty() && TODO_TAG_KINDS.contains(&tag.kind.as_str()) {
                let check = if tag.completed { "[x]" } else { "[ ]" };
                let stripped = line.strip_prefix(prefix.as_str()).unwrap_or(&line);
                let rest = stripped.strip_prefix("- ").unwrap_or(stripped);
                line = format!("{}- {} {}", prefix, check, rest);
            }
        }

        let nested = self.process_list(&node.children, depth + 1);
        if !nested.is_empty() {
            line = format!("{}\n{}", line, nested);
        }
        line
    }
}

/// Numeric label for an ordered item: the digits of the literal marker
/// text, defaulting to 1. Labels are echoed as-is, never renumbered.
fn ordered_label(marker: &str) -> u64 {
    let digits: String = marker.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(1)
}
