//! File discovery (C7). Grounded on `original_source/scanner.py::scan_files`:
//! glob `include`/`exclude` matching against a path relative to a resolved
//! "base" directory, with `exclude` always winning over `include`.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSetBuilder};

/// Structured failures the scanner can produce, so callers can match on
/// failure kind instead of string-sniffing an `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("could not walk {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/__pycache__/**",
    "**/.*",
    "**/.git/**",
    "**/.venv/**",
    "**/venv/**",
    "**/env/**",
    "build/**",
    "dist/**",
    "*.egg-info/**",
];

/// Walks `roots`, returning every file whose path (relative to its own
/// base directory) matches `include` and not `exclude`.
///
/// `roots` may mix files and directories. A directory is walked
/// recursively and each entry's base is the directory itself; an
/// explicitly-named file's base is its parent. Neither kind is exempt from
/// `include` filtering -- this mirrors the original scanner exactly, which
/// surprises users expecting "files named on the CLI always get checked."
pub fn scan_files(
    roots: &[PathBuf],
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let include_set = build_globset(include)?;
    let exclude_set = build_globset(exclude)?;

    let mut found = Vec::new();
    for root in roots {
        if root.is_dir() {
            walk_dir(root, root, &include_set, &exclude_set, &mut found).map_err(|source| {
                ScanError::Io {
                    path: root.clone(),
                    source,
                }
            })?;
        } else {
            let base = root.parent().unwrap_or_else(|| Path::new("."));
            let rel = root.strip_prefix(base).unwrap_or(root);
            if is_included(rel, &include_set, &exclude_set) {
                found.push(root.clone());
            }
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn walk_dir(
    base: &Path,
    dir: &Path,
    include: &globset::GlobSet,
    exclude: &globset::GlobSet,
    found: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.path());
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk_dir(base, &path, include, exclude, found)?;
        } else if file_type.is_file() {
            let rel = path.strip_prefix(base).unwrap_or(&path);
            if is_included(rel, include, exclude) {
                found.push(path);
            }
        }
    }
    Ok(())
}

fn is_included(rel: &Path, include: &globset::GlobSet, exclude: &globset::GlobSet) -> bool {
    if exclude.is_match(rel) {
        return false;
    }
    include.is_match(rel)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<globset::GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScanError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    Ok(builder.build().map_err(|source| ScanError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_excludes_skip_venv() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join(".venv").join("lib");
        fs::create_dir_all(&venv).unwrap();
        fs::write(venv.join("mod.py"), "x = 1\n").unwrap();
        fs::write(tmp.path().join("main.py"), "x = 1\n").unwrap();

        let include = vec!["**/*.py".to_string()];
        let exclude: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        let found = scan_files(&[tmp.path().to_path_buf()], &include, &exclude).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0], tmp.path().join("main.py"));
    }

    #[test]
    fn explicit_file_still_filtered_by_include() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("notes.txt");
        fs::write(&file, "hello\n").unwrap();

        let include = vec!["**/*.py".to_string()];
        let found = scan_files(&[file], &include, &[]).unwrap();
        assert!(found.is_empty());
    }
}
