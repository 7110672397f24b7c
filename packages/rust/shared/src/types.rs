//! Core domain types for the part catalog.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Part
// ---------------------------------------------------------------------------

/// One buildable part, as recorded in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Top-level mod folder under the data directory that owns the file.
    pub dir: String,
    /// File the part was found in, relative to the scan root, `/`-separated.
    pub path: String,
    /// Resolved mod name; equals `dir` unless overridden.
    #[serde(rename = "mod")]
    pub mod_name: String,
    /// Whether `dir` belongs to the base game.
    pub stock: bool,
    /// Display name (`title`), falling back to the identifier.
    pub name: String,
    /// Top-level key/value pairs of the part block.
    pub attributes: IndexMap<String, String>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Mapping from part identifier to [`Part`], in file-scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(IndexMap<String, Part>);

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a part, replacing any earlier part with the same identifier.
    /// Returns the replaced part.
    pub fn insert(&mut self, identifier: impl Into<String>, part: Part) -> Option<Part> {
        self.0.insert(identifier.into(), part)
    }

    pub fn get(&self, identifier: &str) -> Option<&Part> {
        self.0.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.0.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifiers in catalog order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Part)> {
        self.0.iter().map(|(id, part)| (id.as_str(), part))
    }

    /// Group identifiers by resolved mod name, dropping every other field.
    ///
    /// Mods appear in the order their first part was cataloged.
    pub fn grouped_by_mod(&self) -> IndexMap<String, Vec<String>> {
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        for (identifier, part) in &self.0 {
            groups
                .entry(part.mod_name.clone())
                .or_default()
                .push(identifier.clone());
        }
        groups
    }

    /// The part records belonging to one mod, keyed by identifier.
    pub fn part_attributes(&self, mod_name: &str) -> IndexMap<&str, &Part> {
        self.0
            .iter()
            .filter(|(_, part)| part.mod_name == mod_name)
            .map(|(id, part)| (id.as_str(), part))
            .collect()
    }

    /// One upload payload per mod, in catalog order.
    pub fn mod_payloads(&self) -> Vec<ModPayload<'_>> {
        self.grouped_by_mod()
            .into_iter()
            .map(|(mod_name, parts)| {
                let part_attributes = self.part_attributes(&mod_name);
                ModPayload {
                    mod_name,
                    parts,
                    part_attributes,
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = (&'a String, &'a Part);
    type IntoIter = indexmap::map::Iter<'a, String, Part>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Everything the knowledge-base upload needs to know about one mod.
#[derive(Debug, Clone, Serialize)]
pub struct ModPayload<'a> {
    /// Resolved mod name.
    #[serde(rename = "mod")]
    pub mod_name: String,
    /// Identifiers of the mod's parts.
    pub parts: Vec<String>,
    /// Full records of the mod's parts.
    pub part_attributes: IndexMap<&'a str, &'a Part>,
}

// ---------------------------------------------------------------------------
// Scan outcome
// ---------------------------------------------------------------------------

/// Relative paths of files that were scanned but held no part.
pub type IgnoredSet = IndexSet<String>;

/// The finished result of one catalog scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Parts keyed by identifier.
    pub parts: Catalog,
    /// Files that yielded no part.
    pub ignored: IgnoredSet,
}
