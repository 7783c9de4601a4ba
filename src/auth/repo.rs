use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::auth::repo_types::UserTable;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize users: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Flat-file JSON store for [`UserTable`]. Every call goes to disk; nothing is cached.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable users file is moved to.
    pub fn corrupt_path(&self) -> PathBuf {
        with_suffix(&self.path, ".corrupt")
    }

    fn tmp_path(&self) -> PathBuf {
        with_suffix(&self.path, ".tmp")
    }

    /// Reads the whole table.
    ///
    /// A missing file is an empty table. A file that is not valid JSON, or whose
    /// top level is not an object, is renamed to `<file>.corrupt` and also reads
    /// as empty; if that rename fails it is only logged. Entries are taken as-is
    /// whatever their shape, so one odd record never costs the others. Any other
    /// read failure is returned.
    pub fn load(&self) -> Result<UserTable, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "users file missing, starting empty");
                return Ok(UserTable::new());
            }
            Err(source) => {
                error!(path = %self.path.display(), error = %source, "failed to read users file");
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_slice::<UserTable>(&raw) {
            Ok(table) => Ok(table),
            Err(e) => {
                self.quarantine(&e);
                Ok(UserTable::new())
            }
        }
    }

    fn quarantine(&self, cause: &serde_json::Error) {
        let target = self.corrupt_path();
        match fs::rename(&self.path, &target) {
            Ok(()) => warn!(
                path = %self.path.display(),
                moved_to = %target.display(),
                error = %cause,
                "corrupt users file quarantined"
            ),
            Err(e) => error!(
                path = %self.path.display(),
                error = %e,
                "could not rename corrupt users file"
            ),
        }
    }

    /// Writes the whole table as indented JSON to a sibling temp file, then
    /// renames it over the real file so readers never see a partial write.
    pub fn save(&self, table: &UserTable) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(table)?;
        let tmp = self.tmp_path();

        let written = write_synced(&tmp, &body).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(source) = written {
            error!(path = %self.path.display(), error = %source, "failed to save users file");
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io {
                path: self.path.clone(),
                source,
            });
        }

        info!(path = %self.path.display(), users = table.len(), "users file saved");
        Ok(())
    }
}

fn write_synced(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(body)?;
    file.sync_all()
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
