//! Where the CLI keeps its config, preferences and logs.
//!
//! Platform directories by default (XDG on Linux), or a single root
//! given with `--home`.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::DateTime;
use chrono::Local;
use directories::ProjectDirs;

/// Archived logs kept by [`AppPaths::rotate_logs`] at startup.
pub const MAX_OLD_LOGS: usize = 25;

const LATEST_LOG: &str = "latest.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    config: PathBuf,
    cache: PathBuf,
}

impl AppPaths {
    /// Platform directories, `None` when there is no home directory.
    ///
    /// - Linux: `~/.config/dashboard`, logs in `~/.cache/dashboard`
    /// - macOS: `~/Library/Application Support/dev.dashboard.dashboard`, logs in `~/Library/Caches/...`
    /// - Windows: `%APPDATA%\dashboard\dashboard\config`, logs in `%LOCALAPPDATA%\...\cache`
    pub fn discover() -> Option<Self> {
        let dirs = ProjectDirs::from("dev", "dashboard", "dashboard")?;
        Some(Self {
            config: dirs.config_dir().to_path_buf(),
            cache: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Everything under `root`: files at the top, logs in `root/logs`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            cache: root.join("logs"),
            config: root,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Persisted theme and direction.
    pub fn preferences_file(&self) -> PathBuf {
        self.config.join("preferences.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.cache.join(LATEST_LOG)
    }

    /// Archives the previous `latest.log` under the time it was last written,
    /// then deletes all but the newest `keep` archives.
    ///
    /// Call before creating the new log file.
    pub fn rotate_logs(&self, keep: usize) -> io::Result<()> {
        let latest = self.log_file();
        if let Ok(modified) = fs::metadata(&latest).and_then(|m| m.modified()) {
            fs::rename(&latest, self.cache.join(archive_name(modified)))?;
        }
        prune_archives(&self.cache, keep)
    }
}

fn archive_name(modified: SystemTime) -> String {
    let stamp = DateTime::<Local>::from(modified).format("%Y%m%d_%H%M%S%.3f");
    format!("{}.log", stamp)
}

fn prune_archives(dir: &Path, keep: usize) -> io::Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let mut archives: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension().is_some_and(|ext| ext == "log")
                && p.file_name().is_some_and(|name| name != LATEST_LOG)
        })
        .collect();

    // Archive names are timestamps, so name order is age order.
    archives.sort();
    let excess = archives.len().saturating_sub(keep);
    for path in &archives[..excess] {
        fs::remove_file(path)?;
    }
    Ok(())
}
