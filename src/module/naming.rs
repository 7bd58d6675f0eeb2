//! Name derivation and precedence matching
//!
//! Shared by the export filter and the lookup policy. Class names are
//! dotted (`com.acme.api.Widget`), resource names are slash-delimited
//! (`com/acme/api/widget.properties`, optionally with one leading `/`).
//! A `.` inside a resource name is part of a file or folder name, never a
//! boundary. Everything here is total over arbitrary strings.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Separator between class package segments
pub const PACKAGE_SEPARATOR: char = '.';
/// Separator between resource folder segments
pub const RESOURCE_SEPARATOR: char = '/';
/// The default package / root folder
pub const EMPTY_PACKAGE: &str = "";

/// Which kind of name is being classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameKind {
    Class,
    Resource,
}

impl NameKind {
    /// The only character that separates segments of this kind of name
    #[inline]
    pub fn separator(self) -> char {
        match self {
            NameKind::Class => PACKAGE_SEPARATOR,
            NameKind::Resource => RESOURCE_SEPARATOR,
        }
    }
}

/// Package of a fully-qualified class name
///
/// Everything before the last `.`; the default package when there is no
/// `.` or the name is absent.
#[inline]
pub fn package_name(class_name: Option<&str>) -> &str {
    match class_name {
        None => EMPTY_PACKAGE,
        Some(name) => name
            .rfind(PACKAGE_SEPARATOR)
            .map_or(EMPTY_PACKAGE, |pos| &name[..pos]),
    }
}

/// Strips exactly one leading `/` from a resource name
#[inline]
pub fn normalize_resource_name(resource_name: &str) -> &str {
    resource_name
        .strip_prefix(RESOURCE_SEPARATOR)
        .unwrap_or(resource_name)
}

/// Folder of a resource name
///
/// The name is normalized first, then everything before the last `/` is
/// the folder; the root folder when there is no `/` or the name is absent.
#[inline]
pub fn resource_folder(resource_name: Option<&str>) -> &str {
    match resource_name {
        None => EMPTY_PACKAGE,
        Some(name) => {
            let name = normalize_resource_name(name);
            name.rfind(RESOURCE_SEPARATOR)
                .map_or(EMPTY_PACKAGE, |pos| &name[..pos])
        }
    }
}

/// Iterator over a name and its ancestors, most specific first
///
/// As a class name `a.b.C` yields `a.b.C`, `a.b`, `a`, then the root `""`.
/// As a resource name `a/v1.2/x.txt` yields `a/v1.2/x.txt`, `a/v1.2`, `a`,
/// then `""`.
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    next: Option<&'a str>,
    separator: char,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.rfind(self.separator) {
            Some(pos) => Some(&current[..pos]),
            None if !current.is_empty() => Some(EMPTY_PACKAGE),
            None => None,
        };
        Some(current)
    }
}

/// Walk `name` and its ancestors from most to least specific
///
/// A prefix covers a name exactly when it is one of these ancestors, so a
/// prefix never matches across a partial segment.
pub fn ancestry(name: &str, kind: NameKind) -> Ancestry<'_> {
    Ancestry {
        next: Some(name),
        separator: kind.separator(),
    }
}

/// How a pattern set matched a name
///
/// Ordered by precedence: any exact match outranks any prefix match, and a
/// longer (more specific) prefix outranks a shorter one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternMatch {
    /// Matched a prefix pattern; carries the pattern length in bytes
    Prefix(usize),
    /// Matched an exact pattern
    Exact,
}

/// Exact names plus package/folder prefixes
///
/// Immutable once built. Prefix entries match the entry itself and all
/// of its descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    exact: HashSet<String>,
    prefixes: HashSet<String>,
}

impl PatternSet {
    /// Create an empty pattern set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pattern set from exact names and prefixes
    pub fn from_parts<E, P, S>(exact: E, prefixes: P) -> Self
    where
        E: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exact: exact.into_iter().map(Into::into).collect(),
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn insert_exact(&mut self, name: String) -> bool {
        self.exact.insert(name)
    }

    pub(crate) fn insert_prefix(&mut self, prefix: String) -> bool {
        self.prefixes.insert(prefix)
    }

    pub(crate) fn remove_exact(&mut self, name: &str) -> bool {
        self.exact.remove(name)
    }

    pub(crate) fn remove_prefix(&mut self, prefix: &str) -> bool {
        self.prefixes.remove(prefix)
    }

    /// Best match for `name`, if any
    ///
    /// The exact set is always consulted first; the prefix walk stops at
    /// the most specific ancestor present, splitting only on the separator
    /// of `kind`.
    pub fn find(&self, name: &str, kind: NameKind) -> Option<PatternMatch> {
        if self.exact.contains(name) {
            return Some(PatternMatch::Exact);
        }
        if self.prefixes.is_empty() {
            return None;
        }
        ancestry(name, kind)
            .find(|candidate| self.prefixes.contains(*candidate))
            .map(|prefix| PatternMatch::Prefix(prefix.len()))
    }

    /// Whether any pattern matches `name`
    #[inline]
    pub fn matches(&self, name: &str, kind: NameKind) -> bool {
        self.find(name, kind).is_some()
    }

    pub fn contains_exact(&self, name: &str) -> bool {
        self.exact.contains(name)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    pub fn exact(&self) -> impl Iterator<Item = &str> {
        self.exact.iter().map(String::as_str)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }
}
