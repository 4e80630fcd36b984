use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::config::ExtractionConfig;

/// Find archives under `root`, sorted by path.
///
/// A `root` that is itself a file is returned as-is, whatever its extension.
/// Ignore files are not honoured: build outputs holding jars are usually
/// git-ignored.
pub fn discover_jars(root: impl AsRef<Path>, config: &ExtractionConfig) -> Vec<PathBuf> {
    let root = root.as_ref();
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let exclude_dirs = config.exclude_dirs.clone();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !(is_dir && exclude_dirs.iter().any(|d| entry.file_name() == d.as_str()))
        })
        .build();

    let mut jars: Vec<PathBuf> = walker
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .filter(|path| config.is_jar_path(path))
        .collect();
    jars.sort();
    jars
}
