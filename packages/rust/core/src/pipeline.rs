//! End-to-end scan: root → discover → parse each file → assemble catalog.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use partcatalog_cfg::{ParsedCfg, PartDefinition, parse_cfg};
use partcatalog_shared::{PartCatalogError, Result, ScanOptions, ScanOutcome};

use crate::assembler::CatalogAssembler;
use crate::attribution::{Attribution, to_slash};
use crate::discover::{Discover, GameDataDiscoverer};

/// Phases of one `process` call, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Discovering,
    Parsing,
    Assembled,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Discovering => "Discovering config files",
            Self::Parsing => "Parsing config files",
            Self::Assembled => "Catalog assembled",
        };
        f.write_str(label)
    }
}

/// Progress callback for reporting scan status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, phase: ScanPhase);
    /// Called after each candidate file has been handled.
    fn file_scanned(&self, path: &str, current: usize, total: usize);
    /// Called when the scan completes.
    fn done(&self, outcome: &ScanOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _phase: ScanPhase) {}
    fn file_scanned(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _outcome: &ScanOutcome) {}
}

/// What happened to a single candidate file.
#[derive(Debug)]
enum FileOutcome {
    /// File parsed; may hold zero parts.
    Parsed(Attribution, Vec<PartDefinition>),
    /// Owning mod is on the ignore list.
    Excluded,
    /// File could not be read, tokenized, or attributed.
    Failed(PartCatalogError),
}

/// Builds a part catalog from a game install (or any tree with the same
/// `GameData/<mod>/...` layout).
pub struct PartParser {
    root: PathBuf,
    options: ScanOptions,
    discoverer: Box<dyn Discover>,
}

impl PartParser {
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            options,
            discoverer: Box::new(GameDataDiscoverer),
        }
    }

    /// Replace the discovery step (e.g. with [`FixedFiles`](crate::discover::FixedFiles)).
    pub fn with_discoverer(mut self, discoverer: impl Discover + 'static) -> Self {
        self.discoverer = Box::new(discoverer);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan without progress reporting.
    pub fn scan(&self) -> ScanOutcome {
        self.process(&SilentProgress)
    }

    /// Run a fresh scan.
    ///
    /// Per-file problems never abort the run: unreadable or malformed files
    /// land in the ignored set and the scan moves on.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn process(&self, progress: &dyn ProgressReporter) -> ScanOutcome {
        let start = Instant::now();

        progress.phase(ScanPhase::Discovering);
        let candidates = self.discoverer.discover(&self.root, &self.options);
        info!(candidates = candidates.len(), "starting catalog scan");

        progress.phase(ScanPhase::Parsing);
        let mut assembler = CatalogAssembler::new();
        let mut excluded = 0usize;
        let total = candidates.len();

        for (i, candidate) in candidates.iter().enumerate() {
            let relative = self.relative_path(candidate);
            let path = to_slash(&relative);

            match self.scan_file(&relative) {
                FileOutcome::Parsed(attribution, parts) => {
                    assembler.add_file(&path, &attribution, parts);
                }
                FileOutcome::Excluded => {
                    excluded += 1;
                    debug!(%path, "skipping file from ignored mod");
                }
                FileOutcome::Failed(e) => {
                    warn!(%path, error = %e, "ignoring unparseable file");
                    assembler.mark_ignored(&path);
                }
            }

            progress.file_scanned(&path, i + 1, total);
        }

        let replaced = assembler.replaced();
        let outcome = assembler.finish();
        progress.phase(ScanPhase::Assembled);

        info!(
            parts = outcome.parts.len(),
            ignored = outcome.ignored.len(),
            excluded,
            replaced,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog scan complete"
        );

        progress.done(&outcome);
        outcome
    }

    /// Attribute, filter, read, and parse one candidate.
    fn scan_file(&self, relative: &Path) -> FileOutcome {
        let Some(attribution) = Attribution::for_path(relative, &self.options) else {
            return FileOutcome::Failed(PartCatalogError::validation(format!(
                "{} is not inside a {} mod folder",
                relative.display(),
                self.options.data_dir
            )));
        };

        if attribution.is_excluded(&self.options) {
            return FileOutcome::Excluded;
        }

        match self.read_parts(relative) {
            Ok(parsed) => {
                for skipped in &parsed.skipped {
                    debug!(path = %relative.display(), error = %skipped, "skipping part block");
                }
                FileOutcome::Parsed(attribution, parsed.parts)
            }
            Err(e) => FileOutcome::Failed(e),
        }
    }

    fn read_parts(&self, relative: &Path) -> Result<ParsedCfg> {
        let full = self.root.join(relative);
        let bytes = std::fs::read(&full).map_err(|e| PartCatalogError::io(&full, e))?;
        parse_cfg(&bytes)
    }

    /// Candidates may be absolute (from custom discoverers); make them
    /// relative to the root when possible.
    fn relative_path(&self, candidate: &Path) -> PathBuf {
        candidate
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| candidate.to_path_buf())
    }
}
