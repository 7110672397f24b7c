//! Block classification and part extraction.
//!
//! Every top-level block is tagged with a [`BlockKind`]. Only [`BlockKind::Part`]
//! produces a catalog entry; module, resource, agency and patch blocks are
//! recognised and rejected, and anything else is inert.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use partcatalog_shared::{PartCatalogError, Result};

use crate::tokenizer::Block;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Known block tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// `PART`: a buildable part.
    Part,
    /// `MODULE`: a part module (e.g. TweakScale definitions).
    Module,
    /// `RESOURCE` / `RESOURCE_DEFINITION`.
    Resource,
    /// `AGENCY`: contract agency definitions.
    Agency,
    /// A ModuleManager patch (`@PART[...]`, `+PART[...]`, `!PART[...]`, ...).
    Patch,
    /// Any other tag, kept verbatim.
    Unknown(String),
}

/// The catalog-relevant data of one `PART` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDefinition {
    /// Normalised `name` attribute.
    pub identifier: String,
    /// `title` attribute, or the identifier when absent.
    pub display_name: String,
    /// Top-level key/value pairs; later duplicates overwrite earlier ones.
    pub attributes: IndexMap<String, String>,
    /// Line where the block opens.
    pub line: usize,
}

/// Splits a header into its ModuleManager operator and bare tag.
///
/// `@PART[foo]:NEEDS[Bar]` → op `@`, tag `PART`.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<op>[@+$\-!%|#]?)\s*(?P<tag>[A-Za-z_][A-Za-z0-9_]*)").expect("header regex")
});

const IDENTIFIER_KEY: &str = "name";
const DISPLAY_NAME_KEY: &str = "title";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Tag a block by its header.
pub fn classify(block: &Block) -> BlockKind {
    let Some(caps) = HEADER_RE.captures(&block.name) else {
        return BlockKind::Unknown(block.name.clone());
    };

    if !caps["op"].is_empty() {
        return BlockKind::Patch;
    }

    let tag = &caps["tag"];
    match tag.to_ascii_uppercase().as_str() {
        "PART" => BlockKind::Part,
        "MODULE" => BlockKind::Module,
        "RESOURCE" | "RESOURCE_DEFINITION" => BlockKind::Resource,
        "AGENCY" => BlockKind::Agency,
        _ => BlockKind::Unknown(tag.to_string()),
    }
}

/// Extract a [`PartDefinition`] from a block already tagged [`BlockKind::Part`].
///
/// Fails with [`PartCatalogError::MissingIdentifier`] when the block has no
/// non-empty `name`.
pub fn extract_part(block: &Block) -> Result<PartDefinition> {
    let mut attributes: IndexMap<String, String> = IndexMap::new();
    for kv in &block.values {
        attributes.insert(kv.key.clone(), kv.value.clone());
    }

    let identifier = block
        .value(IDENTIFIER_KEY)
        .map(normalize_identifier)
        .filter(|id| !id.is_empty())
        .ok_or(PartCatalogError::MissingIdentifier { line: block.line })?;

    let display_name = block
        .value(DISPLAY_NAME_KEY)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| identifier.clone());

    Ok(PartDefinition {
        identifier,
        display_name,
        attributes,
        line: block.line,
    })
}

/// The game loads part names with underscores turned into dots.
pub fn normalize_identifier(name: &str) -> String {
    name.trim().replace('_', ".")
}

/// Every part defined by a file's top-level blocks, plus the blocks that
/// looked like parts but could not be extracted.
pub fn collect_parts(blocks: &[Block]) -> (Vec<PartDefinition>, Vec<PartCatalogError>) {
    let mut parts = Vec::new();
    let mut skipped = Vec::new();

    for block in blocks {
        match classify(block) {
            BlockKind::Part => match extract_part(block) {
                Ok(part) => parts.push(part),
                Err(e) => skipped.push(e),
            },
            kind => {
                tracing::trace!(?kind, line = block.line, "skipping non-part block");
            }
        }
    }

    (parts, skipped)
}
