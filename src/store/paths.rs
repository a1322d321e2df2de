// Filesystem locations for persisted state.
// Resolves the database, config, and log paths from the platform directories.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Fixed database identifier; the file is named after it.
pub const DATABASE_NAME: &str = "SunoSongsDB";

/// Platform directories for the application.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "songsearch")
}

/// Base data directory (~/.local/share/songsearch on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default path of the song database.
pub fn database_path() -> Option<PathBuf> {
    data_dir().map(|dir| database_path_in(&dir))
}

/// Database path within a given directory.
pub fn database_path_in(dir: &Path) -> PathBuf {
    dir.join(format!("{}.json", DATABASE_NAME))
}

/// Path to the user configuration file.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

/// Path to the log file. The terminal is owned by the UI, so logs go here.
pub fn log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join("songsearch.log"))
}
