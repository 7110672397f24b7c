//! Candidate file discovery under the game's data folder.
//!
//! Discovery is a seam: [`PartParser`](crate::pipeline::PartParser) accepts any
//! [`Discover`] implementation, so tests and partial scans can hand in a fixed
//! file list instead of walking the tree.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use partcatalog_shared::ScanOptions;

/// Produces the ordered list of candidate files, relative to the scan root.
pub trait Discover: Send + Sync {
    fn discover(&self, root: &Path, options: &ScanOptions) -> Vec<PathBuf>;
}

// ---------------------------------------------------------------------------
// GameDataDiscoverer
// ---------------------------------------------------------------------------

/// Walks `<root>/<data_dir>` for files with a candidate extension.
///
/// Only files inside a mod folder are returned; loose files directly under the
/// data folder are skipped. Results come in depth-first walk order with
/// siblings sorted by file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameDataDiscoverer;

impl Discover for GameDataDiscoverer {
    fn discover(&self, root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
        let data_root = root.join(&options.data_dir);
        if !data_root.is_dir() {
            debug!(path = %data_root.display(), "data directory not found, nothing to scan");
            return Vec::new();
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&data_root)
            .min_depth(2)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !has_candidate_extension(entry.path(), options) {
                continue;
            }

            match entry.path().strip_prefix(root) {
                Ok(relative) => files.push(relative.to_path_buf()),
                Err(_) => warn!(path = %entry.path().display(), "file escaped scan root"),
            }
        }

        debug!(count = files.len(), "candidate files discovered");
        files
    }
}

// ---------------------------------------------------------------------------
// FixedFiles
// ---------------------------------------------------------------------------

/// Returns a caller-supplied file list unchanged.
#[derive(Debug, Clone, Default)]
pub struct FixedFiles(pub Vec<PathBuf>);

impl FixedFiles {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl Discover for FixedFiles {
    fn discover(&self, _root: &Path, _options: &ScanOptions) -> Vec<PathBuf> {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether `path` ends in one of the configured extensions (case-insensitive).
pub fn has_candidate_extension(path: &Path, options: &ScanOptions) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            options
                .extensions
                .iter()
                .any(|ext| e.eq_ignore_ascii_case(ext.trim_start_matches('.')))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "PART\n{\nname = x\n}\n").unwrap();
    }

    #[test]
    fn finds_cfg_files_in_mod_folders_sorted() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "GameData/Zeta/Parts/b.cfg");
        touch(temp.path(), "GameData/Alpha/Parts/Deep/Nested/a.CFG");
        touch(temp.path(), "GameData/Alpha/readme.txt");
        touch(temp.path(), "GameData/ModuleManager.ConfigCache.cfg");
        touch(temp.path(), "Ships/VAB/craft.cfg");

        let files = GameDataDiscoverer.discover(temp.path(), &ScanOptions::default());
        assert_eq!(
            files,
            vec![
                PathBuf::from("GameData/Alpha/Parts/Deep/Nested/a.CFG"),
                PathBuf::from("GameData/Zeta/Parts/b.cfg"),
            ]
        );
    }

    #[test]
    fn directory_contents_precede_longer_sibling_names() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "GameData/Mod/a.cfg");
        touch(temp.path(), "GameData/Mod/a/z.cfg");
        touch(temp.path(), "GameData/Mod/b.cfg");

        let files = GameDataDiscoverer.discover(temp.path(), &ScanOptions::default());
        assert_eq!(
            files,
            vec![
                PathBuf::from("GameData/Mod/a/z.cfg"),
                PathBuf::from("GameData/Mod/a.cfg"),
                PathBuf::from("GameData/Mod/b.cfg"),
            ]
        );
    }

    #[test]
    fn missing_data_dir_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let files = GameDataDiscoverer.discover(temp.path(), &ScanOptions::default());
        assert!(files.is_empty());
    }

    #[test]
    fn custom_data_dir_and_extensions() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "Mods/Alpha/part.txt");
        touch(temp.path(), "Mods/Alpha/part.cfg");

        let mut options = ScanOptions::default();
        options.data_dir = "Mods".into();
        options.extensions = vec![".txt".into()];

        let files = GameDataDiscoverer.discover(temp.path(), &options);
        assert_eq!(files, vec![PathBuf::from("Mods/Alpha/part.txt")]);
    }

    #[test]
    fn fixed_files_are_returned_as_given() {
        let fixed = FixedFiles::new(["GameData/B/x.cfg", "GameData/A/y.cfg"]);
        let files = fixed.discover(Path::new("/nowhere"), &ScanOptions::default());
        assert_eq!(files[0], PathBuf::from("GameData/B/x.cfg"));
        assert_eq!(files.len(), 2);
    }
}
