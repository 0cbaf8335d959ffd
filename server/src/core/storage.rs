//! Platform-aware data storage directory management
//!
//! ## Platform Paths
//!
//! | Type | Windows | macOS | Linux |
//! |------|---------|-------|-------|
//! | Data | `%APPDATA%\SitePulse\` | `~/Library/Application Support/SitePulse/` | `$XDG_DATA_HOME/sitepulse/` |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::constants::{APP_DOT_FOLDER, APP_NAME, ENV_DATA_DIR};
use crate::utils::file::expand_path;

/// Data subdirectories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSubdir {
    Sqlite,
    Secrets,
}

impl DataSubdir {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataSubdir::Sqlite => "sqlite",
            DataSubdir::Secrets => "secrets",
        }
    }

    /// Returns subdirectories that should always be created.
    pub const fn all() -> &'static [DataSubdir] {
        &[DataSubdir::Sqlite, DataSubdir::Secrets]
    }
}

/// Application storage manager
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Initialize storage with platform-appropriate data directory
    pub async fn init() -> Result<Self> {
        let data_dir = Self::resolve_data_dir();

        // Create directories first (canonicalize requires path to exist)
        Self::ensure_directories_static(&data_dir).await?;

        // Now canonicalize to get clean path for logging
        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        tracing::debug!(data_dir = %data_dir.display(), "Storage initialized");

        Ok(Self { data_dir })
    }

    /// Resolve data directory from env var or platform default
    pub fn resolve_data_dir() -> PathBuf {
        // Check env var override first
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            return expand_path(&dir);
        }

        // Use platform-specific directory
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            return proj_dirs.data_dir().to_path_buf();
        }

        // Fallback to local .sitepulse
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        cwd.join(APP_DOT_FOLDER)
    }

    /// Create data directory and subdirectories (static version for init)
    async fn ensure_directories_static(data_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        for subdir in DataSubdir::all() {
            let path = data_dir.join(subdir.as_str());
            tokio::fs::create_dir_all(&path).await.with_context(|| {
                format!(
                    "Failed to create {} directory: {}",
                    subdir.as_str(),
                    path.display()
                )
            })?;
        }

        // Signing key lives here; keep it owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let secrets = data_dir.join(DataSubdir::Secrets.as_str());
            tokio::fs::set_permissions(&secrets, std::fs::Permissions::from_mode(0o700))
                .await
                .with_context(|| {
                    format!("Failed to restrict secrets directory: {}", secrets.display())
                })?;
        }

        Ok(())
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to a file within a subdirectory
    pub fn subdir_path(&self, subdir: DataSubdir, filename: &str) -> PathBuf {
        self.data_dir.join(subdir.as_str()).join(filename)
    }

    /// Create AppStorage for testing with a specific data directory
    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_subdir_as_str() {
        assert_eq!(DataSubdir::Sqlite.as_str(), "sqlite");
        assert_eq!(DataSubdir::Secrets.as_str(), "secrets");
    }

    #[test]
    fn test_data_subdir_all() {
        let all = DataSubdir::all();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&DataSubdir::Sqlite));
        assert!(all.contains(&DataSubdir::Secrets));
    }

    #[test]
    fn test_subdir_path() {
        let storage = AppStorage::init_for_test(PathBuf::from("/tmp/sitepulse-test"));
        assert_eq!(
            storage.subdir_path(DataSubdir::Secrets, "signing.key"),
            PathBuf::from("/tmp/sitepulse-test/secrets/signing.key")
        );
    }

    #[tokio::test]
    async fn test_ensure_directories_creates_subdirs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        AppStorage::ensure_directories_static(&data_dir).await.unwrap();
        for subdir in DataSubdir::all() {
            assert!(data_dir.join(subdir.as_str()).is_dir());
        }
    }

    #[test]
    fn test_resolve_data_dir_fallback() {
        // SAFETY: Test runs single-threaded, no concurrent access to env var
        unsafe { std::env::remove_var(ENV_DATA_DIR) };
        let path = AppStorage::resolve_data_dir();
        assert!(!path.as_os_str().is_empty());
    }
}
