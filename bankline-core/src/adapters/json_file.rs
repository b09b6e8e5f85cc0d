//! JSON file repository - the flat-file persistence adapter

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::BankState;
use crate::ports::Repository;

/// Stores the whole bank as one pretty-printed JSON document
///
/// An exclusive advisory lock on `<path>.lock` is held for as long as the
/// repository lives, so a second session on the same file fails at open.
pub struct JsonFileRepository {
    path: PathBuf,
    _lock: File,
}

impl JsonFileRepository {
    /// Open the repository, taking the session lock
    pub fn open(path: &Path) -> Result<Self> {
        let lock_path = Self::lock_path(path);
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;

        lock.try_lock_exclusive().map_err(|_| {
            Error::storage(format!(
                "data file {} is in use by another session",
                path.display()
            ))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            _lock: lock,
        })
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl Repository for JsonFileRepository {
    fn load(&self) -> Result<BankState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BankState::default()),
            Err(e) => return Err(e.into()),
        };

        let mut state: BankState = serde_json::from_str(&content).map_err(|e| {
            Error::storage(format!("{} is not a valid data file: {}", self.path.display(), e))
        })?;
        state.validate()?;
        state.normalize()?;
        Ok(state)
    }

    /// Write to a temp file next to the target, then rename over it
    fn save(&self, state: &BankState) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_string_pretty(state)?;
        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty_state() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepository::open(&dir.path().join("bank.json")).unwrap();

        let state = repo.load().unwrap();
        assert!(state.users.is_empty());
        assert!(state.accounts.is_empty());
        assert_eq!(state.next_account_number, 1);
    }

    #[test]
    fn test_save_creates_file_and_no_temp_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.json");
        let repo = JsonFileRepository::open(&path).unwrap();

        repo.save(&BankState::default()).unwrap();
        assert!(path.exists());

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries.len(), 2, "unexpected files: {:?}", entries);
        assert!(entries.contains(&"bank.json.lock".to_string()));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.json");
        fs::write(&path, "{ not json").unwrap();

        let repo = JsonFileRepository::open(&path).unwrap();
        assert!(matches!(repo.load(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_highest_account_number_is_a_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.json");
        let document = r#"{
            "users": [{"tax_id": "12345678901", "name": "Ana", "birth_date": "1990-05-17", "address": "Rua A, 10"}],
            "accounts": [{"number": 4294967295, "branch": "0001", "pin": "1234", "balance": "0",
                          "owner_tax_id": "12345678901", "transactions": []}],
            "next_account_number": 1
        }"#;
        fs::write(&path, document).unwrap();

        let repo = JsonFileRepository::open(&path).unwrap();
        assert!(matches!(repo.load(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_second_session_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.json");

        let first = JsonFileRepository::open(&path).unwrap();
        assert!(matches!(JsonFileRepository::open(&path), Err(Error::Storage(_))));

        drop(first);
        assert!(JsonFileRepository::open(&path).is_ok());
    }

    #[test]
    fn test_location() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.json");
        let repo = JsonFileRepository::open(&path).unwrap();
        assert_eq!(repo.location(), Some(path.as_path()));
    }
}
