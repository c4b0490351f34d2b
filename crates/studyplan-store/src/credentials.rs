//! Append-only credential file.
//!
//! Each line is `username:sha256_hex`. Writes append a line, reads scan the
//! whole file for an exact username + hash match. There is no locking.
//!
//! The hash is a single unsalted SHA-256 round, which keeps the file
//! compatible with existing `users.txt` stores but is weak against offline
//! guessing. Treat the file as sensitive.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;

/// Errors from credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("username and password must both be non-empty")]
    MissingField,

    #[error("username {0:?} contains ':', a line break, or surrounding whitespace")]
    InvalidUsername(String),

    #[error("username {0:?} is already registered")]
    UsernameTaken(String),

    #[error("credential file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Hex-encoded SHA-256 digest of the password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Handle to a credential file on disk.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Open the store described by `config`. The file is created lazily on
    /// the first sign-up.
    pub fn open(config: &StoreConfig) -> Self {
        Self {
            path: config.users_file.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a new user by appending a `username:hash` line.
    pub fn sign_up(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        if username.is_empty() || password.is_empty() {
            return Err(CredentialError::MissingField);
        }
        if username.contains([':', '\n', '\r']) || username != username.trim() {
            return Err(CredentialError::InvalidUsername(username.to_string()));
        }
        if self.lines()?.iter().any(|(name, _)| name == username) {
            return Err(CredentialError::UsernameTaken(username.to_string()));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        writeln!(file, "{username}:{}", hash_password(password)).map_err(|e| self.io_error(e))?;

        info!(username, path = %self.path.display(), "user signed up");
        Ok(())
    }

    /// Check a username/password pair against the file.
    ///
    /// A missing file means no users are registered and yields `Ok(false)`.
    pub fn check_credentials(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let hashed = hash_password(password);
        let found = self
            .lines()?
            .iter()
            .any(|(name, hash)| name == username && *hash == hashed);
        debug!(username, found, "checked credentials");
        Ok(found)
    }

    /// Read every well-formed `(username, hash)` pair in file order.
    fn lines(&self) -> Result<Vec<(String, String)>, CredentialError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut pairs = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            // Only the line ending is stripped; names are compared verbatim.
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((name, hash)) if !hash.contains(':') => {
                    pairs.push((name.to_string(), hash.to_string()));
                }
                _ => warn!(
                    path = %self.path.display(),
                    line = idx + 1,
                    "skipping malformed credential line"
                ),
            }
        }
        Ok(pairs)
    }

    fn io_error(&self, source: std::io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::open(&StoreConfig::new(dir.path().join("users.txt")));
        (dir, store)
    }

    #[test]
    fn hash_is_sha256_hex() {
        assert_eq!(
            hash_password("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn sign_up_writes_username_and_hash() {
        let (_dir, store) = temp_store();
        store.sign_up("alice", "secret").unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, format!("alice:{}\n", hash_password("secret")));
    }

    #[test]
    fn sign_up_then_check() {
        let (_dir, store) = temp_store();
        store.sign_up("alice", "secret").unwrap();

        assert!(store.check_credentials("alice", "secret").unwrap());
        assert!(!store.check_credentials("alice", "wrong").unwrap());
        assert!(!store.check_credentials("bob", "secret").unwrap());
    }

    #[test]
    fn missing_file_has_no_users() {
        let (_dir, store) = temp_store();
        assert!(!store.check_credentials("alice", "secret").unwrap());
    }

    #[test]
    fn rejects_empty_fields() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.sign_up("", "secret"),
            Err(CredentialError::MissingField)
        ));
        assert!(matches!(
            store.sign_up("alice", ""),
            Err(CredentialError::MissingField)
        ));
    }

    #[test]
    fn rejects_separator_in_username() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.sign_up("al:ice", "secret"),
            Err(CredentialError::InvalidUsername(_))
        ));
    }

    #[test]
    fn rejects_padded_username() {
        let (_dir, store) = temp_store();
        store.sign_up("alice", "secret").unwrap();

        for name in [" alice", "alice ", "\talice"] {
            assert!(
                matches!(
                    store.sign_up(name, "mallory"),
                    Err(CredentialError::InvalidUsername(_))
                ),
                "{name:?} should be rejected"
            );
        }
        assert!(!store.check_credentials("alice", "mallory").unwrap());
        assert!(store.check_credentials("alice", "secret").unwrap());
    }

    #[test]
    fn stored_names_are_not_trimmed_on_read() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            format!(" alice:{}\r\nbob:{}\r\n", hash_password("mallory"), hash_password("pw")),
        )
        .unwrap();

        assert!(!store.check_credentials("alice", "mallory").unwrap());
        assert!(store.check_credentials(" alice", "mallory").unwrap());
        assert!(store.check_credentials("bob", "pw").unwrap());
    }

    #[test]
    fn rejects_duplicate_username() {
        let (_dir, store) = temp_store();
        store.sign_up("alice", "secret").unwrap();
        assert!(matches!(
            store.sign_up("alice", "other"),
            Err(CredentialError::UsernameTaken(_))
        ));
        assert!(!store.check_credentials("alice", "other").unwrap());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            format!("garbage\n\nbob:{}\n", hash_password("pw")),
        )
        .unwrap();
        assert!(store.check_credentials("bob", "pw").unwrap());
    }
}
