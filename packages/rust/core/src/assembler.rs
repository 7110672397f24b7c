//! Catalog assembler.
//!
//! Accumulates per-file results into the final [`Catalog`] and [`IgnoredSet`].
//! Parts are merged in the order files are fed in; a repeated identifier
//! replaces the earlier record.

use tracing::debug;

use partcatalog_cfg::PartDefinition;
use partcatalog_shared::{Catalog, IgnoredSet, Part, ScanOutcome};

use crate::attribution::Attribution;

/// Builds a [`ScanOutcome`] one file at a time.
#[derive(Debug, Default)]
pub struct CatalogAssembler {
    parts: Catalog,
    ignored: IgnoredSet,
    replaced: usize,
}

impl CatalogAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the parts of one file. A file with no parts is marked ignored.
    pub fn add_file(&mut self, path: &str, attribution: &Attribution, parts: Vec<PartDefinition>) {
        if parts.is_empty() {
            self.mark_ignored(path);
            return;
        }

        for def in parts {
            let part = Part {
                dir: attribution.dir.clone(),
                path: path.to_string(),
                mod_name: attribution.mod_name.clone(),
                stock: attribution.stock,
                name: def.display_name,
                attributes: def.attributes,
            };

            if let Some(previous) = self.parts.insert(def.identifier.clone(), part) {
                self.replaced += 1;
                debug!(
                    identifier = %def.identifier,
                    previous = %previous.path,
                    current = %path,
                    "identifier redefined, keeping the later definition"
                );
            }
        }
    }

    /// Record a scanned file that produced no part.
    pub fn mark_ignored(&mut self, path: &str) {
        self.ignored.insert(path.to_string());
    }

    /// Number of parts that overwrote an earlier definition.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn finish(self) -> ScanOutcome {
        ScanOutcome {
            parts: self.parts,
            ignored: self.ignored,
        }
    }
}
