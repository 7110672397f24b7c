//! Core scan pipeline for PartCatalog.
//!
//! This crate ties together file discovery, `.cfg` parsing, mod attribution,
//! and catalog assembly into a single [`PartParser::process`] call.

pub mod assembler;
pub mod attribution;
pub mod discover;
pub mod pipeline;

pub use assembler::CatalogAssembler;
pub use attribution::{Attribution, mod_dir, to_slash};
pub use discover::{Discover, FixedFiles, GameDataDiscoverer, has_candidate_extension};
pub use pipeline::{PartParser, ProgressReporter, ScanPhase, SilentProgress};
