//! Filesystem access: config file and the markdown content tree.

use std::fs;
use std::path::{Path, PathBuf};

use radar_core::{BlipRecord, ConfigError, LoadError, RadarConfig};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors from reading radar files
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

impl FileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A content file that could not be turned into a blip.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Every blip under a content directory, plus the files that failed.
#[derive(Debug, Default)]
pub struct LoadedRadar {
    pub blips: Vec<BlipRecord>,
    pub failures: Vec<LoadFailure>,
}

/// All `*.md` files under `dir`, recursively, in sorted path order.
///
/// Symlinked directories are not descended into; symlinks to files are kept.
pub fn collect_markdown(dir: &Path) -> Result<Vec<PathBuf>, FileError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| FileError::Walk {
            path: source.path().unwrap_or(dir).to_path_buf(),
            source,
        })?;
        let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && entry.path().extension().is_some_and(|ext| ext == "md") {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Read and validate the radar configuration file.
pub fn load_config(path: &Path) -> Result<RadarConfig, FileError> {
    let text = fs::read_to_string(path).map_err(|e| FileError::io(path, e))?;
    RadarConfig::from_yaml(&text).map_err(|source| FileError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Load one content file.
pub fn load_blip(path: &Path) -> Result<Result<BlipRecord, LoadError>, FileError> {
    let text = fs::read_to_string(path).map_err(|e| FileError::io(path, e))?;
    Ok(BlipRecord::from_document(&text, Some(path.to_path_buf())))
}

/// Load every content file under `dir`.
///
/// Unreadable files abort; malformed ones are collected as failures so a
/// single bad record does not hide the rest.
pub fn load_blips(dir: &Path) -> Result<LoadedRadar, FileError> {
    let mut loaded = LoadedRadar::default();

    for path in collect_markdown(dir)? {
        match load_blip(&path)? {
            Ok(blip) => {
                for warning in radar_core::check_history(&blip) {
                    warn!(file = %path.display(), "{warning}");
                }
                loaded.blips.push(blip);
            }
            Err(error) => {
                debug!(file = %path.display(), error = %error, "Skipping invalid blip");
                loaded.failures.push(LoadFailure { path, error });
            }
        }
    }

    debug!(
        dir = %dir.display(),
        blips = loaded.blips.len(),
        failures = loaded.failures.len(),
        "Loaded content"
    );
    Ok(loaded)
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<(), FileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| FileError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| FileError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RUST: &str = "---\nname: Rust\nquadrant: Languages & Frameworks\nring: Adopt\nstatus: New\n---\n\nBody\n";

    #[test]
    fn test_collect_markdown_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("tools/b.md"), "").unwrap();
        write_file(&dir.path().join("platforms/a.md"), "").unwrap();
        write_file(&dir.path().join("platforms/notes.txt"), "").unwrap();

        let files = collect_markdown(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, vec![PathBuf::from("platforms/a.md"), PathBuf::from("tools/b.md")]);
    }

    #[test]
    fn test_load_blips_collects_failures() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("languages/rust.md"), RUST).unwrap();
        write_file(&dir.path().join("tools/broken.md"), "---\nname: Broken\n---\n").unwrap();

        let loaded = load_blips(dir.path()).unwrap();
        assert_eq!(loaded.blips.len(), 1);
        assert_eq!(loaded.blips[0].content, "Body");
        assert_eq!(loaded.failures.len(), 1);
        assert!(loaded.failures[0].path.ends_with("tools/broken.md"));
    }

    #[test]
    fn test_missing_dir_is_scan_error() {
        let dir = TempDir::new().unwrap();
        let err = load_blips(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FileError::Walk { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_markdown_ignores_symlink_loops() {
        let dir = TempDir::new().unwrap();
        let radar = dir.path().join("radar");
        write_file(&radar.join("tools/a.md"), RUST).unwrap();
        std::os::unix::fs::symlink(&radar, radar.join("tools/loop")).unwrap();

        let files = collect_markdown(&radar).unwrap();
        assert_eq!(files, vec![radar.join("tools/a.md")]);

        let loaded = load_blips(&radar).unwrap();
        assert_eq!(loaded.blips.len(), 1);
    }

    #[test]
    fn test_load_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radar.config.yml");
        write_file(&path, "title: Radar\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("radar.config.yml"));
        assert!(matches!(err, FileError::Config { .. }));
    }
}
