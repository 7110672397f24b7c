//! Shared types, error model, and configuration for PartCatalog.
//!
//! This crate is the foundation depended on by all other PartCatalog crates.
//! It provides:
//! - [`PartCatalogError`]: the unified error type
//! - Domain types ([`Part`], [`Catalog`], [`ScanOutcome`])
//! - Configuration ([`AppConfig`], [`ScanOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_DATA_DIR, DEFAULT_STOCK_MODS, ScanOptions, ScanSection, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_scan_config,
};
pub use error::{PartCatalogError, Result};
pub use types::{Catalog, IgnoredSet, ModPayload, Part, ScanOutcome};
