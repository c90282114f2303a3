//! Identifier parsing: base name, tags, hierarchy path, derived class names.
//!
//! Declared names follow a small convention:
//!
//! ```text
//! main.file_menu#submenu#pinned
//! ^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^
//! hierarchy path  tags
//! ```
//!
//! The last hierarchy segment is the declared (base) name; earlier segments
//! are implied ancestors. A trailing `.ui` segment is treated as a source
//! suffix and stripped. Parsing is permissive: anything that is not a
//! delimiter passes through literally.

use std::collections::BTreeSet;
use std::fmt;

use super::tokenizer::{lex_name, NameToken};

/// Reserved tag delimiter.
pub const TAG_DELIMITER: char = '#';

/// Reserved hierarchy delimiter.
pub const HIERARCHY_DELIMITER: char = '.';

/// Source suffix stripped from the last hierarchy segment.
pub const SOURCE_SUFFIX: &str = "ui";

/// Errors from identifier parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("malformed identifier {0:?}: empty after stripping")]
    MalformedIdentifier(String),
}

/// A parsed widget or UI name. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    raw: String,
    base_name: String,
    tags: BTreeSet<String>,
    hierarchy_path: Vec<String>,
}

/// Parse an identifier string.
///
/// Fails only when `input` is empty after trimming whitespace.
pub fn resolve(input: &str) -> Result<Identifier, NameError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(NameError::MalformedIdentifier(input.to_owned()));
    }

    let mut path: Vec<String> = Vec::new();
    let mut tags = BTreeSet::new();
    let mut current_tag: Option<String> = None;

    for (token, slice) in lex_name(trimmed) {
        if token == Some(NameToken::Tag) {
            push_tag(&mut tags, current_tag.take());
            current_tag = Some(String::new());
            continue;
        }
        // Inside a tag everything up to the next `#` belongs to it.
        if let Some(tag) = current_tag.as_mut() {
            tag.push_str(slice);
            continue;
        }
        if token != Some(NameToken::Dot) {
            path.push(slice.to_owned());
        }
    }
    push_tag(&mut tags, current_tag);

    if path.len() > 1 && path.last().map(String::as_str) == Some(SOURCE_SUFFIX) {
        path.pop();
    }

    let base_name = path.last().cloned().unwrap_or_default();
    Ok(Identifier {
        raw: trimmed.to_owned(),
        base_name,
        tags,
        hierarchy_path: path,
    })
}

fn push_tag(tags: &mut BTreeSet<String>, tag: Option<String>) {
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        tags.insert(tag);
    }
}

/// Replace every character that is not ASCII alphanumeric with `_`.
pub fn legal_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Title-case a legal name and drop underscores: `file_menu` -> `FileMenu`.
fn title_case(name: &str) -> String {
    legal_name(name)
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

impl Identifier {
    /// The trimmed input string this identifier was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Handler-matching key: the declared name without tags or ancestors.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Tags in sorted order.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Ancestor names followed by the declared name.
    pub fn hierarchy_path(&self) -> &[String] {
        &self.hierarchy_path
    }

    /// Implied ancestors, outermost first.
    pub fn ancestors(&self) -> &[String] {
        match self.hierarchy_path.split_last() {
            Some((_, parents)) => parents,
            None => &[],
        }
    }

    /// Hierarchy path joined with the hierarchy delimiter.
    pub fn path_string(&self) -> String {
        self.hierarchy_path
            .join(&HIERARCHY_DELIMITER.to_string())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether any of `tags` is present. With no tags given, whether the
    /// identifier carries any tag at all.
    pub fn has_any_tag<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> bool {
        let mut iter = tags.into_iter().peekable();
        if iter.peek().is_none() {
            return !self.tags.is_empty();
        }
        iter.any(|t| self.tags.contains(t))
    }

    /// Whether `self` lies strictly below `other` in the hierarchy.
    pub fn is_descendant_of(&self, other: &Identifier) -> bool {
        self.hierarchy_path.len() > other.hierarchy_path.len()
            && self.hierarchy_path.starts_with(&other.hierarchy_path)
    }

    /// Path plus sorted tags rendered back to a name string.
    pub fn canonical(&self) -> String {
        let mut out = self.path_string();
        for tag in &self.tags {
            out.push(TAG_DELIMITER);
            out.push_str(tag);
        }
        out
    }

    /// Derived class name of the full hierarchy path.
    pub fn class_name(&self) -> String {
        self.hierarchy_path.iter().map(|s| title_case(s)).collect()
    }

    /// Candidate handler class names, most specific first.
    ///
    /// For `main.file_menu` and suffix `Slots`:
    /// `MainFileMenuSlots`, `MainFileMenu`, `MainSlots`, `Main`.
    pub fn handler_class_candidates(&self, suffix: &str) -> Vec<String> {
        let mut out = Vec::new();
        for depth in (1..=self.hierarchy_path.len()).rev() {
            let class: String = self.hierarchy_path[..depth]
                .iter()
                .map(|s| title_case(s))
                .collect();
            if class.is_empty() {
                continue;
            }
            if !suffix.is_empty() {
                out.push(format!("{class}{suffix}"));
            }
            out.push(class);
        }
        out
    }

    /// Copy with `add` merged into the tag set.
    pub fn with_tags<'a>(&self, add: impl IntoIterator<Item = &'a str>) -> Identifier {
        let mut next = self.clone();
        next.tags.extend(add.into_iter().filter(|t| !t.is_empty()).map(str::to_owned));
        next.raw = next.canonical();
        next
    }

    /// Copy with `remove` dropped from the tag set.
    pub fn without_tags<'a>(&self, remove: impl IntoIterator<Item = &'a str>) -> Identifier {
        let mut next = self.clone();
        for tag in remove {
            next.tags.remove(tag);
        }
        next.raw = next.canonical();
        next
    }

    /// Copy keeping only the tags listed in `keep`.
    pub fn retain_tags<'a>(&self, keep: impl IntoIterator<Item = &'a str>) -> Identifier {
        let keep: BTreeSet<&str> = keep.into_iter().collect();
        let mut next = self.clone();
        next.tags.retain(|t| keep.contains(t.as_str()));
        next.raw = next.canonical();
        next
    }

    /// Tags that are not in `known`, in sorted order.
    pub fn unknown_tags<'a>(&self, known: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let known: BTreeSet<&str> = known.into_iter().collect();
        self.tags
            .iter()
            .filter(|t| !known.contains(t.as_str()))
            .cloned()
            .collect()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl std::str::FromStr for Identifier {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}
