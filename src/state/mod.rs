// State management module.
// Holds the search view state machine and its result filtering.

pub mod search;

pub use search::{NoticeLevel, SearchRequest, SearchView, ViewState, filter_songs};
