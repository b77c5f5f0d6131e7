//! The whole-file JSON snapshot that persists the ledger.
//!
//! Every request re-reads the file and writes it back wholesale. Reads are
//! self-healing: a missing, unreadable, or malformed file is replaced with
//! the empty document instead of failing the request, trading strict
//! durability for availability.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Error, ledger::LedgerEntry};

/// The persisted document: `{"entries": [...]}`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerFile {
    /// Every recorded entry, in insertion order (newest prepended).
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
}

/// Reads and writes the ledger file.
///
/// The store itself holds no data; callers load a snapshot, work on it, and
/// save it back. Wrap the store in an `Arc<Mutex<..>>` (see
/// [AppState](crate::AppState)) so concurrent writers cannot interleave
/// their read-modify-write cycles.
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Open the store at `path`, creating the parent directory and an empty
    /// ledger file if they do not exist yet.
    ///
    /// # Errors
    /// Returns [Error::StoreWrite] if the directory or file cannot be
    /// created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|error| Error::StoreWrite(format!("{}: {error}", parent.display())))?;
        }

        let store = Self { path };
        if !store.path.exists() {
            store.save(&LedgerFile::default())?;
        }

        Ok(store)
    }

    /// The path of the underlying ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a snapshot of the ledger.
    ///
    /// Never fails: a file that cannot be read or parsed is logged, rewritten
    /// as the empty document, and returned as empty.
    pub fn load(&self) -> LedgerFile {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!("repairing unreadable ledger file {:?}: {error}", self.path);
                return self.heal();
            }
        };

        if raw.trim().is_empty() {
            return self.heal();
        }

        match serde_json::from_str(&raw) {
            Ok(ledger) => ledger,
            Err(error) => {
                tracing::warn!("repairing malformed ledger file {:?}: {error}", self.path);
                self.heal()
            }
        }
    }

    /// Persist `ledger`, replacing the whole file.
    ///
    /// # Errors
    /// Returns [Error::StoreWrite] if serialization or the write fails.
    pub fn save(&self, ledger: &LedgerFile) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(ledger)
            .map_err(|error| Error::StoreWrite(error.to_string()))?;

        fs::write(&self.path, json)
            .map_err(|error| Error::StoreWrite(format!("{}: {error}", self.path.display())))
    }

    fn heal(&self) -> LedgerFile {
        let fresh = LedgerFile::default();

        if let Err(error) = self.save(&fresh) {
            tracing::error!("could not rewrite ledger file {:?}: {error}", self.path);
        }

        fresh
    }
}
