//! Table transcription.
//!
//! Renders an embedded table as a GitHub-flavored pipe table. GFM requires
//! a header row, so the first source row is always promoted to the header,
//! whether or not the source marked one.

use crate::inline;
use crate::page::{ContentNode, Table, TableCell};

/// Render a table as a pipe table. A table with no rows renders as the
/// empty string; otherwise the rendition ends with a newline.
pub fn render(table: &Table) -> String {
    if table.rows.is_empty() {
        return String::new();
    }

    let mut rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(cell_text).collect())
        .collect();

    // Pad short rows so every line has the same column count
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(&rows[0]));
    lines.push(format_row(&vec!["---".to_string(); width]));
    for row in &rows[1..] {
        lines.push(format_row(row));
    }
    lines.join("\n") + "\n"
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Text of one cell: inline translation of every unit in the cell, nested
/// ones included. Non-empty parts join with a space; pipes are escaped so
/// they cannot break the row.
fn cell_text(cell: &TableCell) -> String {
    let mut parts = Vec::new();
    for node in &cell.content {
        collect_unit_text(node, &mut parts);
    }
    parts.join(" ").replace('|', "\\|")
}

fn collect_unit_text(node: &ContentNode, parts: &mut Vec<String>) {
    let text = inline::collect_text(node);
    if !text.is_empty() {
        parts.push(text);
    }
    for child in &node.children {
        collect_unit_text(child, parts);
    }
}
