// Local song store.
// A schema-versioned key-value table of songs persisted as a single JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::feed::Song;

use super::paths::DATABASE_NAME;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk layout of the database file.
#[derive(Debug, Serialize, Deserialize)]
struct DatabaseFile {
    name: String,
    version: u32,
    key_path: String,
    #[serde(default)]
    songs: BTreeMap<String, Song>,
}

/// Just enough of the file to check its version before decoding the rest.
#[derive(Debug, Deserialize)]
struct VersionHeader {
    version: u32,
}

/// Persistent song table keyed by song id.
///
/// Opened once at startup and shared by reference. Every transaction holds
/// the table lock for its whole duration, so a reader sees either all of an
/// upsert or none of it.
#[derive(Debug)]
pub struct SongStore {
    path: PathBuf,
    songs: Mutex<BTreeMap<String, Song>>,
}

impl SongStore {
    /// Open the database at `path`, creating it at the current schema version if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let songs = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let header: VersionHeader = serde_json::from_str(&contents).map_err(corrupt)?;
            if header.version > SCHEMA_VERSION {
                return Err(Error::SchemaVersion {
                    found: header.version,
                    supported: SCHEMA_VERSION,
                });
            }
            let file: DatabaseFile = serde_json::from_str(&contents).map_err(corrupt)?;
            info!(path = %path.display(), records = file.songs.len(), "opened song store");
            file.songs
        } else {
            let songs = BTreeMap::new();
            write_database(&path, &songs)?;
            info!(path = %path.display(), version = SCHEMA_VERSION, "initialized song store");
            songs
        };

        Ok(Self {
            path,
            songs: Mutex::new(songs),
        })
    }

    /// Location of the database file.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or overwrite every song in one transaction.
    ///
    /// If any record is rejected or the commit fails, the store is left unchanged.
    pub fn upsert_all(&self, songs: &[Song]) -> Result<()> {
        let mut table = self.lock()?;

        let mut staged = table.clone();
        for (index, song) in songs.iter().enumerate() {
            if song.id.is_empty() {
                return Err(Error::Persistence(format!(
                    "record {} has an empty id; transaction aborted",
                    index
                )));
            }
            staged.insert(song.id.clone(), song.clone());
        }

        write_database(&self.path, &staged)?;
        *table = staged;

        info!(count = songs.len(), total = table.len(), "upserted songs");
        Ok(())
    }

    /// Every stored song, in key order.
    pub fn get_all(&self) -> Result<Vec<Song>> {
        let table = self.lock()?;
        debug!(records = table.len(), "read all songs");
        Ok(table.values().cloned().collect())
    }

    /// Number of stored songs.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Song>>> {
        self.songs
            .lock()
            .map_err(|_| Error::Persistence("song table lock poisoned".to_string()))
    }
}

fn corrupt(e: serde_json::Error) -> Error {
    Error::Persistence(format!("database file is corrupt: {}", e))
}

/// Write the table atomically via a temp file.
fn write_database(path: &Path, songs: &BTreeMap<String, Song>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = DatabaseFile {
        name: DATABASE_NAME.to_string(),
        version: SCHEMA_VERSION,
        key_path: "id".to_string(),
        songs: songs.clone(),
    };
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| Error::Persistence(format!("could not encode song table: {}", e)))?;

    let temp_path = path.with_extension("tmp");
    let mut out = fs::File::create(&temp_path)?;
    out.write_all(json.as_bytes())?;
    out.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
