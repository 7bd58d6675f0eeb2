//! Lookup override sets
//!
//! An override corrects default delegation for one name or for a whole
//! package/folder. Textual entries use the compact form `[-][=]name`:
//! a leading `-` blocks the name (forces delegation), otherwise the name
//! is forced local; a following `=` restricts the entry to that exact
//! name, otherwise it also covers every descendant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::module::naming::{NameKind, PatternMatch, PatternSet};
use crate::module::traits::IsolationError;

const BLOCKED_MARKER: char = '-';
const EXACT_MARKER: char = '=';

/// What an override forces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Resolve in this module even if default rules would delegate
    Local,
    /// Never resolve in this module, even if it owns a matching class
    Blocked,
}

/// A single exact name or package/folder prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamePattern {
    Exact(String),
    Prefix(String),
}

impl NamePattern {
    pub fn as_str(&self) -> &str {
        match self {
            NamePattern::Exact(name) | NamePattern::Prefix(name) => name,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, NamePattern::Exact(_))
    }
}

/// A parsed override entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideEntry {
    pub pattern: NamePattern,
    pub disposition: Disposition,
}

impl FromStr for OverrideEntry {
    type Err = IsolationError;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let trimmed = entry.trim();
        let (disposition, rest) = match trimmed.strip_prefix(BLOCKED_MARKER) {
            Some(rest) => (Disposition::Blocked, rest),
            None => (Disposition::Local, trimmed),
        };
        let pattern = match rest.strip_prefix(EXACT_MARKER) {
            Some(name) => NamePattern::Exact(name.to_string()),
            None => NamePattern::Prefix(rest.to_string()),
        };

        if pattern.as_str().is_empty() {
            return Err(IsolationError::InvalidConfiguration(format!(
                "Override entry has no name: {:?}",
                entry
            )));
        }

        Ok(Self {
            pattern,
            disposition,
        })
    }
}

impl fmt::Display for OverrideEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.disposition == Disposition::Blocked {
            write!(f, "{}", BLOCKED_MARKER)?;
        }
        if self.pattern.is_exact() {
            write!(f, "{}", EXACT_MARKER)?;
        }
        write!(f, "{}", self.pattern.as_str())
    }
}

/// Forced-local and blocked patterns for one module
///
/// Built once through [`OverrideSetBuilder`] and never mutated afterwards.
/// No pattern appears in both dispositions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    local: PatternSet,
    blocked: PatternSet,
}

impl OverrideSet {
    pub fn builder() -> OverrideSetBuilder {
        OverrideSetBuilder::default()
    }

    /// An override set with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from separate local and blocked pattern sets
    ///
    /// Fails with `AmbiguousOverride` when a pattern is in both sets.
    pub fn from_sets(local: PatternSet, blocked: PatternSet) -> Result<Self, IsolationError> {
        let mut builder = Self::builder();
        builder.local = local;
        builder.blocked = blocked;
        builder.build(true)
    }

    /// Parse textual entries (`[-][=]name`)
    pub fn parse<I, S>(entries: I, reject_ambiguous: bool) -> Result<Self, IsolationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::builder();
        for entry in entries {
            builder = builder.entry(entry.as_ref().parse()?);
        }
        builder.build(reject_ambiguous)
    }

    /// The override that wins for `name`, if any
    ///
    /// An exact entry in either set beats every prefix entry; otherwise the
    /// most specific prefix wins. Prefixes match along the separator of
    /// `kind` only.
    pub fn resolve(&self, name: &str, kind: NameKind) -> Option<Disposition> {
        match (self.local.find(name, kind), self.blocked.find(name, kind)) {
            (None, None) => None,
            (Some(_), None) => Some(Disposition::Local),
            (None, Some(_)) => Some(Disposition::Blocked),
            (Some(local), Some(blocked)) => Some(Self::pick(local, blocked)),
        }
    }

    // Equal matches can only come from the same pattern in both sets, which
    // the builder rules out; blocking is the fallback regardless.
    fn pick(local: PatternMatch, blocked: PatternMatch) -> Disposition {
        if local > blocked {
            Disposition::Local
        } else {
            Disposition::Blocked
        }
    }

    pub fn local(&self) -> &PatternSet {
        &self.local
    }

    pub fn blocked(&self) -> &PatternSet {
        &self.blocked
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.blocked.is_empty()
    }

    /// All entries in textual form, sorted
    pub fn entries(&self) -> Vec<String> {
        let mut entries: Vec<String> = Self::entries_of(&self.local, Disposition::Local)
            .chain(Self::entries_of(&self.blocked, Disposition::Blocked))
            .map(|entry| entry.to_string())
            .collect();
        entries.sort();
        entries
    }

    fn entries_of(
        set: &PatternSet,
        disposition: Disposition,
    ) -> impl Iterator<Item = OverrideEntry> + '_ {
        set.exact()
            .map(|name| NamePattern::Exact(name.to_string()))
            .chain(set.prefixes().map(|name| NamePattern::Prefix(name.to_string())))
            .map(move |pattern| OverrideEntry {
                pattern,
                disposition,
            })
    }
}

/// Accumulates override entries before freezing them into an [`OverrideSet`]
#[derive(Debug, Default)]
pub struct OverrideSetBuilder {
    local: PatternSet,
    blocked: PatternSet,
}

impl OverrideSetBuilder {
    pub fn local(self, pattern: NamePattern) -> Self {
        self.entry(OverrideEntry {
            pattern,
            disposition: Disposition::Local,
        })
    }

    pub fn blocked(self, pattern: NamePattern) -> Self {
        self.entry(OverrideEntry {
            pattern,
            disposition: Disposition::Blocked,
        })
    }

    pub fn entry(mut self, entry: OverrideEntry) -> Self {
        let set = match entry.disposition {
            Disposition::Local => &mut self.local,
            Disposition::Blocked => &mut self.blocked,
        };
        match entry.pattern {
            NamePattern::Exact(name) => set.insert_exact(name),
            NamePattern::Prefix(prefix) => set.insert_prefix(prefix),
        };
        self
    }

    /// Patterns present in both dispositions, sorted
    fn conflicts(&self) -> Vec<NamePattern> {
        let mut conflicts: Vec<NamePattern> = self
            .local
            .exact()
            .filter(|name| self.blocked.contains_exact(name))
            .map(|name| NamePattern::Exact(name.to_string()))
            .chain(
                self.local
                    .prefixes()
                    .filter(|prefix| self.blocked.contains_prefix(prefix))
                    .map(|prefix| NamePattern::Prefix(prefix.to_string())),
            )
            .collect();
        conflicts.sort_by(|a, b| a.as_str().cmp(b.as_str()).then(a.is_exact().cmp(&b.is_exact())));
        conflicts
    }

    /// Freeze the entries
    ///
    /// With `reject_ambiguous`, a pattern configured both local and blocked
    /// fails the build. Otherwise every such pattern is dropped from both
    /// dispositions and logged.
    pub fn build(mut self, reject_ambiguous: bool) -> Result<OverrideSet, IsolationError> {
        let conflicts = self.conflicts();

        if !conflicts.is_empty() {
            let names: Vec<String> = conflicts
                .iter()
                .map(|pattern| {
                    OverrideEntry {
                        pattern: pattern.clone(),
                        disposition: Disposition::Local,
                    }
                    .to_string()
                })
                .collect();

            if reject_ambiguous {
                return Err(IsolationError::AmbiguousOverride(format!(
                    "configured as both local and blocked: {}",
                    names.join(", ")
                )));
            }

            warn!(
                "Ignoring overrides configured as both local and blocked: {}",
                names.join(", ")
            );
            for pattern in &conflicts {
                match pattern {
                    NamePattern::Exact(name) => {
                        self.local.remove_exact(name);
                        self.blocked.remove_exact(name);
                    }
                    NamePattern::Prefix(prefix) => {
                        self.local.remove_prefix(prefix);
                        self.blocked.remove_prefix(prefix);
                    }
                }
            }
        }

        debug!(
            "Built override set: {} local, {} blocked",
            self.local.len(),
            self.blocked.len()
        );
        Ok(OverrideSet {
            local: self.local,
            blocked: self.blocked,
        })
    }
}
