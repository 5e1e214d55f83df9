//! Quick style resolution.
//!
//! OneNote pages declare named quick styles and content units reference them
//! by index. Conversion distinguishes page-title styles, which are dropped
//! from the body, from heading styles that map to ATX depths; every other
//! style is plain text.

use indexmap::IndexMap;

/// One named quick style declaration from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDef {
    pub index: u32,
    pub name: String,
}

impl StyleDef {
    pub fn new(index: u32, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
        }
    }
}

/// Semantic role a style index resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRole {
    /// Page title styles: the unit's own line is dropped
    Suppressed,
    /// Heading styles, depth 1 through 6
    Heading(u8),
    /// Everything else: plain body text
    Normal,
}

/// Mapping from style indices to roles.
///
/// Built once per page; resolution never fails.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    roles: IndexMap<u32, StyleRole>,
}

impl StyleTable {
    /// Build a table from a page's style declarations.
    ///
    /// Pages stripped of their declarations get a fixed fallback table
    /// matching the indices OneNote assigns in practice.
    pub fn build(defs: &[StyleDef]) -> Self {
        if defs.is_empty() {
            return Self::fallback();
        }

        let mut roles = IndexMap::new();
        for def in defs {
            roles.insert(def.index, role_for_name(&def.name));
        }
        Self { roles }
    }

    /// Resolve a style index to its role. Unknown indices are `Normal`.
    pub fn resolve(&self, index: u32) -> StyleRole {
        self.roles.get(&index).copied().unwrap_or(StyleRole::Normal)
    }

    /// Number of mapped indices
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Default index assignment: 0 body, 1 title, 2..=7 headings 1..=6.
    fn fallback() -> Self {
        let mut roles = IndexMap::new();
        roles.insert(0, StyleRole::Normal);
        roles.insert(1, StyleRole::Suppressed);
        for depth in 1..=6u8 {
            roles.insert(u32::from(depth) + 1, StyleRole::Heading(depth));
        }
        Self { roles }
    }
}

/// Classify a style name. Matching is case-insensitive.
fn role_for_name(name: &str) -> StyleRole {
    let lower = name.to_lowercase();
    if lower == "pagetitle" {
        return StyleRole::Suppressed;
    }

    let mut chars = lower.chars();
    if let (Some('h'), Some(digit), None) = (chars.next(), chars.next(), chars.next()) {
        if let Some(depth) = digit.to_digit(10) {
            if (1..=6).contains(&depth) {
                return StyleRole::Heading(depth as u8);
            }
        }
    }

    StyleRole::Normal
}
