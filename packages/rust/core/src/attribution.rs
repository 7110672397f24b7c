//! Mod attribution: which mod folder owns a file, its resolved mod name, and
//! whether it counts as stock.

use std::path::{Component, Path};

use partcatalog_shared::ScanOptions;

/// Ownership details shared by every part in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Top-level mod folder under the data directory.
    pub dir: String,
    /// Resolved mod name (`dir` unless overridden).
    pub mod_name: String,
    /// Whether `dir` is a stock folder.
    pub stock: bool,
}

impl Attribution {
    /// Attribute a file given its path relative to the scan root.
    ///
    /// Returns `None` when the path does not live inside a mod folder of the
    /// configured data directory.
    pub fn for_path(relative: &Path, options: &ScanOptions) -> Option<Self> {
        let dir = mod_dir(relative, &options.data_dir)?;
        Some(Self::for_dir(dir, options))
    }

    /// Attribute a known mod folder.
    pub fn for_dir(dir: impl Into<String>, options: &ScanOptions) -> Self {
        let dir = dir.into();
        Self {
            mod_name: options.mod_name(&dir).to_string(),
            stock: options.stock_mods.contains(&dir),
            dir,
        }
    }

    /// Whether the owning folder is on the ignore list.
    pub fn is_excluded(&self, options: &ScanOptions) -> bool {
        options.ignore_mods.contains(&self.dir)
    }
}

/// The folder directly under `data_dir` containing `relative`.
///
/// `GameData/B9_Aerospace/Parts/x.cfg` → `B9_Aerospace`. The path must have at
/// least one component below the mod folder.
pub fn mod_dir(relative: &Path, data_dir: &str) -> Option<String> {
    let mut components = relative.components().filter(|c| !matches!(c, Component::CurDir));

    match components.next() {
        Some(Component::Normal(first)) if first == data_dir => {}
        _ => return None,
    }

    let dir = match components.next() {
        Some(Component::Normal(dir)) => dir.to_string_lossy().into_owned(),
        _ => return None,
    };

    components.next().map(|_| dir)
}

/// Render a relative path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_dir_is_first_folder_under_data_dir() {
        let path = Path::new("GameData/B9_Aerospace/Parts/Control/RCS/part.cfg");
        assert_eq!(mod_dir(path, "GameData").as_deref(), Some("B9_Aerospace"));
        assert_eq!(
            mod_dir(Path::new("./GameData/Squad/x.cfg"), "GameData").as_deref(),
            Some("Squad")
        );
    }

    #[test]
    fn mod_dir_rejects_paths_outside_mod_folders() {
        assert_eq!(mod_dir(Path::new("GameData/loose.cfg"), "GameData"), None);
        assert_eq!(mod_dir(Path::new("Ships/VAB/x.cfg"), "GameData"), None);
        assert_eq!(mod_dir(Path::new("GameData"), "GameData"), None);
    }

    #[test]
    fn stock_follows_configured_set() {
        let options = ScanOptions::default();
        let squad = Attribution::for_dir("Squad", &options);
        assert!(squad.stock);
        assert_eq!(squad.mod_name, "Squad");
        assert!(!Attribution::for_dir("B9_Aerospace", &options).stock);

        let options = options.with_stock_mods(["B9_Aerospace"]);
        assert!(!Attribution::for_dir("Squad", &options).stock);
        assert!(Attribution::for_dir("B9_Aerospace", &options).stock);
    }

    #[test]
    fn mod_name_override() {
        let mut options = ScanOptions::default();
        options
            .mod_names
            .insert("MagicSmokeIndustries".into(), "Infernal Robotics".into());
        let attr = Attribution::for_path(
            Path::new("GameData/MagicSmokeIndustries/Parts/piston.cfg"),
            &options,
        )
        .unwrap();
        assert_eq!(attr.dir, "MagicSmokeIndustries");
        assert_eq!(attr.mod_name, "Infernal Robotics");
    }

    #[test]
    fn exclusion_uses_dir() {
        let options = ScanOptions::default().with_ignore_mods(["NASAmission"]);
        assert!(Attribution::for_dir("NASAmission", &options).is_excluded(&options));
        assert!(!Attribution::for_dir("Squad", &options).is_excluded(&options));
    }

    #[test]
    fn to_slash_joins_components() {
        let path: std::path::PathBuf = ["GameData", "Squad", "Parts", "part.cfg"].iter().collect();
        assert_eq!(to_slash(&path), "GameData/Squad/Parts/part.cfg");
    }
}
