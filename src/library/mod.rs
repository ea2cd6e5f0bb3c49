//! Library view - an in-memory song collection with filtered, sorted and
//! grouped projections and admin-gated mutations.

pub mod catalog;
pub mod derive;
pub mod view;

pub use derive::{derive_view, filter_songs, group_songs, sort_songs, DerivedCache, DerivedView, SongGroup, ViewKey};
pub use view::{LibraryProps, LibrarySnapshot, LibraryView, SongAddedHook, SongDeletedHook};
