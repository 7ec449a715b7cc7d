//! Path utilities for the config, data, log and per-run temp directories.

use std::io;
use std::path::PathBuf;

const APP_DIR: &str = "transcriptor";

/// Base data directory (e.g. ~/.local/share/transcriptor).
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{}", APP_DIR)))
}

/// Path to the config file (e.g. ~/.config/transcriptor/config.json).
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(data_dir)
        .join("config.json")
}

/// Log directory, created if necessary.
pub fn log_dir() -> io::Result<PathBuf> {
    let dir = data_dir().join("logs");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Create a fresh run-scoped temp directory for the normalized WAV and the
/// segment files. Each run gets its own UUID-named directory so interrupted
/// or back-to-back runs cannot clobber each other's intermediates.
pub fn create_run_dir() -> io::Result<PathBuf> {
    let dir = data_dir()
        .join("runs")
        .join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Best-effort removal of a run directory and everything in it.
pub fn remove_run_dir(dir: &std::path::Path) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        log::warn!("Failed to clean up run dir {}: {}", dir.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_dirs_are_unique() {
        let a = create_run_dir().unwrap();
        let b = create_run_dir().unwrap();
        assert_ne!(a, b);
        assert!(a.is_dir());
        assert!(b.is_dir());
        remove_run_dir(&a);
        remove_run_dir(&b);
        assert!(!a.exists());
    }
}
