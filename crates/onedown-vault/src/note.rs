//! Note metadata and frontmatter.

use std::path::Path;

/// Metadata recorded in the note's YAML frontmatter.
///
/// Everything except the title is optional; dates pass through as the
/// strings the source supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteMetadata {
    pub title: String,
    /// Deep link back to the source page
    pub source_link: Option<String>,
    pub notebook: Option<String>,
    pub section: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

impl NoteMetadata {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Render the YAML frontmatter block, `---` delimiters included.
    ///
    /// Optional fields are omitted entirely when absent; the tag list is
    /// fixed so imported notes stay queryable.
    pub fn frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];
        lines.push(format!("title: \"{}\"", yaml_escape(&self.title)));
        if let Some(ref link) = self.source_link {
            lines.push(format!("source: \"{}\"", yaml_escape(link)));
        }
        if let Some(ref notebook) = self.notebook {
            lines.push(format!("notebook: \"{}\"", yaml_escape(notebook)));
        }
        if let Some(ref section) = self.section {
            lines.push(format!("section: \"{}\"", yaml_escape(section)));
        }
        if let Some(ref created) = self.created {
            lines.push(format!("created: {}", created));
        }
        if let Some(ref modified) = self.modified {
            lines.push(format!("modified: {}", modified));
        }
        lines.push("tags:".to_string());
        lines.push("  - onenote-import".to_string());
        lines.push("---".to_string());
        lines.join("\n")
    }
}

/// Escape a string for a double-quoted YAML scalar
fn yaml_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Build an `obsidian://open` URI for a note inside a vault.
///
/// Returns `None` when the note does not live under the vault root.
/// The file parameter is vault-relative with the `.md` extension dropped
/// and forward slashes kept literal, matching what Obsidian expects.
pub fn obsidian_uri(vault_name: &str, vault_path: &Path, note_path: &Path) -> Option<String> {
    let relative = note_path.strip_prefix(vault_path).ok()?;
    let target = relative.with_extension("");
    let file_param: Vec<String> = target
        .iter()
        .map(|segment| urlencoding::encode(&segment.to_string_lossy()).into_owned())
        .collect();
    Some(format!(
        "obsidian://open?vault={}&file={}",
        urlencoding::encode(vault_name),
        file_param.join("/")
    ))
}
