// Song feed module.
// Provides the HTTP client and record types for the remote song feed.

pub mod client;
pub mod types;

pub use client::FeedClient;
pub use types::{FeedPage, Song};
