//! Filesystem-based credential storage.
//!
//! One YAML document per credential kind under a single directory
//! (`~/.envseal/credentials/` by default), written owner-only.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{Credential, CredentialKind, CredentialStore};
use crate::error::{Result, StoreError};

/// Filesystem-based credential storage.
#[derive(Debug, Clone)]
pub struct Filesystem {
    dir: PathBuf,
}

impl Filesystem {
    /// Store credentials under `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the credential files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, kind: CredentialKind) -> PathBuf {
        self.dir.join(format!("{}.yaml", kind.file_stem()))
    }

    #[cfg(unix)]
    fn check_permissions(path: &Path) {
        use std::os::unix::fs::PermissionsExt;

        if let Ok(metadata) = fs::metadata(path) {
            let mode = metadata.permissions().mode() & 0o777;
            if mode != 0o600 {
                warn!(
                    path = %path.display(),
                    mode = %format!("{:o}", mode),
                    "insecure credential file permissions"
                );
            }
        }
    }
}

impl CredentialStore for Filesystem {
    fn load(&self, kind: CredentialKind) -> Result<Credential> {
        let path = self.path(kind);
        debug!(path = %path.display(), kind = kind.name(), "loading credential");

        if !path.exists() {
            return Err(StoreError::NotFound(kind.name()).into());
        }

        #[cfg(unix)]
        Self::check_permissions(&path);

        let contents = fs::read_to_string(&path).map_err(StoreError::ReadFailed)?;
        Credential::from_yaml(kind, &contents)
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let kind = credential.kind();
        let path = self.path(kind);
        debug!(path = %path.display(), kind = kind.name(), "saving credential");

        let contents = credential.to_yaml()?;
        fs::create_dir_all(&self.dir).map_err(StoreError::WriteFailed)?;

        // Unique sibling temp file per save, renamed into place. Created 0600.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", kind.file_stem()))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(StoreError::WriteFailed)?;
        tmp.write_all(contents.as_bytes())
            .map_err(StoreError::WriteFailed)?;
        tmp.as_file().sync_all().map_err(StoreError::WriteFailed)?;
        tmp.persist(&path)
            .map_err(|e| StoreError::WriteFailed(e.error))?;
        Ok(())
    }

    fn exists(&self, kind: CredentialKind) -> bool {
        self.path(kind).exists()
    }

    fn delete(&self, kind: CredentialKind) -> Result<()> {
        let path = self.path(kind);
        debug!(path = %path.display(), kind = kind.name(), "deleting credential");

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteFailed(e).into()),
        }
    }
}
