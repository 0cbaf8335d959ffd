//! Session signing key management
//!
//! The HS256 key used for session cookies comes from one of two places:
//!
//! | Source | When |
//! |--------|------|
//! | `SITEPULSE_AUTH_SECRET` | set in the environment (hex, or a raw string of at least 32 bytes) |
//! | `<data_dir>/secrets/signing.key` | otherwise; generated on first start and reused |

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::constants::{ENV_AUTH_SECRET, MIN_SIGNING_SECRET_LEN, SIGNING_KEY_FILENAME};
use super::storage::{AppStorage, DataSubdir};
use crate::utils::crypto;

/// Where the signing key was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretBackend {
    Env,
    File(PathBuf),
}

impl SecretBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Env => "environment",
            Self::File(_) => "file",
        }
    }
}

/// Holds the session signing key for the lifetime of the process
#[derive(Clone)]
pub struct SecretManager {
    backend: SecretBackend,
    signing_key: Vec<u8>,
}

impl std::fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManager")
            .field("backend", &self.backend)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

impl SecretManager {
    /// Resolve the signing key from the environment or the data directory
    pub async fn init(storage: &AppStorage) -> Result<Self> {
        let env_value = std::env::var(ENV_AUTH_SECRET).ok();
        let path = storage.subdir_path(DataSubdir::Secrets, SIGNING_KEY_FILENAME);
        Self::resolve(env_value.as_deref(), path).await
    }

    async fn resolve(env_value: Option<&str>, path: PathBuf) -> Result<Self> {
        if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
            let signing_key = parse_configured_secret(value)?;
            tracing::debug!(backend = "environment", "Signing key loaded");
            return Ok(Self {
                backend: SecretBackend::Env,
                signing_key,
            });
        }

        let signing_key = load_or_create_key_file(&path).await?;
        tracing::debug!(backend = "file", path = %path.display(), "Signing key loaded");
        Ok(Self {
            backend: SecretBackend::File(path),
            signing_key,
        })
    }

    pub fn backend(&self) -> &SecretBackend {
        &self.backend
    }

    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }
}

/// Accept a hex-encoded key or a raw passphrase; both must carry 32+ bytes
fn parse_configured_secret(value: &str) -> Result<Vec<u8>> {
    let value = value.trim();
    if let Ok(bytes) = crypto::decode_hex(value)
        && bytes.len() >= MIN_SIGNING_SECRET_LEN
    {
        return Ok(bytes);
    }
    if value.len() < MIN_SIGNING_SECRET_LEN {
        anyhow::bail!(
            "{} must be at least {} bytes (got {})",
            ENV_AUTH_SECRET,
            MIN_SIGNING_SECRET_LEN,
            value.len()
        );
    }
    Ok(value.as_bytes().to_vec())
}

async fn load_or_create_key_file(path: &PathBuf) -> Result<Vec<u8>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => match crypto::decode_hex(&content) {
            Ok(key) if key.len() == 32 => return Ok(key),
            _ => tracing::warn!(
                path = %path.display(),
                "Stored signing key has invalid format, regenerating"
            ),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read signing key: {}", path.display()));
        }
    }

    let key = crypto::generate_signing_key();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .context("Failed to create secrets directory")?;
    }
    tokio::fs::write(path, crypto::encode_hex(&key))
        .await
        .with_context(|| format!("Failed to write signing key: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .context("Failed to restrict signing key permissions")?;
    }

    tracing::debug!("Created new signing key");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let manager = SecretManager {
            backend: SecretBackend::Env,
            signing_key: vec![7u8; 32],
        };
        let debug = format!("{:?}", manager);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("7, 7"));
    }

    #[test]
    fn test_parse_configured_secret_hex() {
        let hex = "ab".repeat(32);
        assert_eq!(parse_configured_secret(&hex).unwrap(), vec![0xab; 32]);
    }

    #[test]
    fn test_parse_configured_secret_raw() {
        let raw = "a-long-enough-passphrase-for-sessions!";
        assert_eq!(parse_configured_secret(raw).unwrap(), raw.as_bytes());
    }

    #[test]
    fn test_parse_configured_secret_too_short() {
        let err = parse_configured_secret("short").unwrap_err();
        assert!(err.to_string().contains(ENV_AUTH_SECRET));
    }

    #[tokio::test]
    async fn test_file_key_created_and_reused() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("secrets").join(SIGNING_KEY_FILENAME);

        let first = SecretManager::resolve(None, path.clone()).await.unwrap();
        assert_eq!(first.signing_key().len(), 32);
        assert_eq!(first.backend(), &SecretBackend::File(path.clone()));

        let second = SecretManager::resolve(None, path).await.unwrap();
        assert_eq!(first.signing_key(), second.signing_key());
    }

    #[tokio::test]
    async fn test_corrupt_key_file_regenerated() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(SIGNING_KEY_FILENAME);
        std::fs::write(&path, "not-hex").unwrap();

        let manager = SecretManager::resolve(None, path.clone()).await.unwrap();
        assert_eq!(manager.signing_key().len(), 32);
        let stored = std::fs::read_to_string(&path).unwrap();
        assert_eq!(crypto::decode_hex(&stored).unwrap(), manager.signing_key());
    }

    #[tokio::test]
    async fn test_env_secret_takes_precedence() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(SIGNING_KEY_FILENAME);
        let manager = SecretManager::resolve(Some(&"cd".repeat(32)), path.clone())
            .await
            .unwrap();
        assert_eq!(manager.backend().name(), "environment");
        assert!(!path.exists());
    }
}
