//! Report data model.
//!
//! A [`Report`] is the normalized outcome of one collection pass: an ordered
//! sequence of [`Group`]s, each an ordered mapping of field keys to
//! [`Fact`]s. It is built fresh for every view from live system state, never
//! persisted and never mutated after construction.

pub mod collector;
pub mod render;

pub use collector::{Collector, ReportSettings};
pub use render::{render, RenderMode};

/// A fact's display value: a scalar string or named sub-entries (used for
/// module lists, name mapped to an author line).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactValue {
    Text(String),
    List(Vec<(String, String)>),
}

/// A single named, possibly-absent piece of diagnostic information.
#[derive(Clone, Debug)]
pub struct Fact {
    /// Display label.
    pub label: &'static str,
    /// Display value.
    pub value: FactValue,
    /// Credential-like values are flagged for redaction by presentation
    /// policy; the collector itself never enforces this.
    pub sensitive: bool,
}

impl Fact {
    /// A plain text fact.
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: FactValue::Text(value.into()),
            sensitive: false,
        }
    }

    /// A text fact flagged as sensitive.
    pub fn sensitive(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: FactValue::Text(value.into()),
            sensitive: true,
        }
    }

    /// A fact whose value is a list of named entries.
    pub fn list(label: &'static str, entries: Vec<(String, String)>) -> Self {
        Self {
            label,
            value: FactValue::List(entries),
            sensitive: false,
        }
    }
}

/// A labeled collection of related facts. Field insertion order is display
/// order; keys are stable identifiers for lookup.
#[derive(Clone, Debug)]
pub struct Group {
    pub key: &'static str,
    pub label: &'static str,
    fields: Vec<(&'static str, Fact)>,
}

impl Group {
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            fields: Vec::new(),
        }
    }

    /// Append a field. Display order follows insertion order.
    pub fn push(&mut self, key: &'static str, fact: Fact) {
        self.fields.push((key, fact));
    }

    /// Look up a field by key.
    pub fn get(&self, key: &str) -> Option<&Fact> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, fact)| fact)
    }

    /// Fields in display order.
    pub fn fields(&self) -> &[(&'static str, Fact)] {
        &self.fields
    }

    /// A group may legitimately end up with no fields (every probe failed);
    /// the renderer skips it rather than emitting an empty table.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The full ordered collection of groups produced by one collection pass.
#[derive(Clone, Debug)]
pub struct Report {
    groups: Vec<Group>,
}

impl Report {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Groups in display order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Look up a group by key.
    pub fn group(&self, key: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.key == key)
    }
}
