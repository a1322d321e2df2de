// Local store module.
// Persists fetched songs on disk so searches run against the local copy.

pub mod paths;
pub mod songs;

pub use songs::SongStore;
