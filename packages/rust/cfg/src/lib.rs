//! Game `.cfg` parsing: brace-block tokenizing and part classification.
//!
//! This crate provides:
//! - [`tokenizer`]: decodes raw file bytes and builds the [`Block`] tree
//! - [`classifier`]: tags blocks with a [`BlockKind`] and extracts
//!   [`PartDefinition`]s from `PART` blocks

pub mod classifier;
pub mod tokenizer;

use partcatalog_shared::{PartCatalogError, Result};

pub use classifier::{BlockKind, PartDefinition, classify, collect_parts, extract_part};
pub use tokenizer::{Block, KeyValue, decode, parse_blocks};

/// Parts found in a single file.
#[derive(Debug, Default)]
pub struct ParsedCfg {
    /// Successfully extracted parts, in file order.
    pub parts: Vec<PartDefinition>,
    /// Part blocks that had to be skipped.
    pub skipped: Vec<PartCatalogError>,
}

/// Decode, tokenize, and classify the contents of one config file.
///
/// Structural errors fail the whole file; per-block problems are collected in
/// [`ParsedCfg::skipped`].
pub fn parse_cfg(bytes: &[u8]) -> Result<ParsedCfg> {
    let text = decode(bytes);
    let blocks = parse_blocks(&text)?;
    let (parts, skipped) = collect_parts(&blocks);
    Ok(ParsedCfg { parts, skipped })
}
