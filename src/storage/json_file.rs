use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use super::{normalize_key, PlayerStore, StoreError};
use crate::player::PlayerRecord;

/// One pretty-printed JSON document per player in a directory.
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes the version check and the write.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// `~/.fitquest/players`
    pub fn default_dir() -> io::Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        Ok(home_dir.join(".fitquest").join("players"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, username: &str) -> PathBuf {
        let filename = format!("{}.json", sanitize_name(&normalize_key(username)));
        self.dir.join(filename)
    }

    fn read(&self, username: &str) -> Result<PlayerRecord, StoreError> {
        let json = match fs::read_to_string(self.path_for(username)) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(username.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    /// Writes via a temp file and rename so readers never see half a record.
    fn write_atomic(&self, path: &Path, json: &str) -> io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)
    }
}

impl PlayerStore for JsonFileStore {
    fn load(&self, username: &str) -> Result<PlayerRecord, StoreError> {
        self.read(username)
    }

    fn create(&self, record: &PlayerRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let json = serde_json::to_string_pretty(record)?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(&record.username))
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(record.username.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn save(&self, record: &PlayerRecord) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let stored = self.read(&record.username)?;
        if stored.version != record.version {
            warn!(
                player = %record.username,
                expected = record.version,
                found = stored.version,
                "save_conflict"
            );
            return Err(StoreError::Conflict {
                username: record.username.clone(),
                expected: record.version,
                found: stored.version,
            });
        }

        let mut next = record.clone();
        next.version += 1;
        let json = serde_json::to_string_pretty(&next)?;
        self.write_atomic(&self.path_for(&record.username), &json)?;
        Ok(next.version)
    }
}

/// Keeps only filename-safe characters.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
