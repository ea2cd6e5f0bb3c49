//! Derived projections of the song collection.
//!
//! filter → sort → group, each a pure function of its inputs. The only
//! caching is [`DerivedCache`], which holds the last result together with the
//! [`ViewKey`] it was computed for.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::constants::ALL_SONGS_GROUP;
use crate::models::{GroupField, SortDirection, SortField, Song};

/// Songs matching `filter` (case-insensitive substring of title, artist,
/// album, genre or year). A blank filter matches everything.
pub fn filter_songs<'a>(songs: &'a [Song], filter: &str) -> Vec<&'a Song> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return songs.iter().collect();
    }

    songs.iter().filter(|song| matches(song, &needle)).collect()
}

fn matches(song: &Song, needle: &str) -> bool {
    song.title.to_lowercase().contains(needle)
        || song.artist.to_lowercase().contains(needle)
        || song.album.to_lowercase().contains(needle)
        || song.genre.to_lowercase().contains(needle)
        || song.year.to_string().contains(needle)
}

/// Natural ordering of `field`: lexicographic for text, numeric for year
pub fn compare(a: &Song, b: &Song, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.cmp(&b.title),
        SortField::Artist => a.artist.cmp(&b.artist),
        SortField::Album => a.album.cmp(&b.album),
        SortField::Year => a.year.cmp(&b.year),
    }
}

pub fn sort_songs(songs: &mut [&Song], field: SortField, direction: SortDirection) {
    songs.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// A bucket of songs sharing one group key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongGroup {
    pub name: String,
    pub songs: Vec<Song>,
}

fn group_key(song: &Song, field: GroupField) -> &str {
    match field {
        GroupField::None => ALL_SONGS_GROUP,
        GroupField::Artist => &song.artist,
        GroupField::Album => &song.album,
        GroupField::Genre => &song.genre,
    }
}

/// Partition an already sorted sequence into buckets in first-seen order
pub fn group_songs(sorted: &[&Song], field: GroupField) -> Vec<SongGroup> {
    if field == GroupField::None {
        return vec![SongGroup {
            name: String::from(ALL_SONGS_GROUP),
            songs: sorted.iter().map(|s| (*s).clone()).collect(),
        }];
    }

    let mut groups: Vec<SongGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for song in sorted {
        let key = group_key(song, field);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(SongGroup {
                name: key.to_string(),
                songs: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].songs.push((*song).clone());
    }

    groups
}

/// Everything a derived view depends on besides the songs themselves
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewKey {
    /// Bumped on every mutation of the collection
    pub version: u64,
    pub filter: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub group_field: GroupField,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedView {
    pub groups: Vec<SongGroup>,
    /// Number of songs that passed the filter
    pub match_count: usize,
}

impl DerivedView {
    /// Songs in display order: bucket by bucket, sorted within each
    pub fn ordered(&self) -> impl Iterator<Item = &Song> {
        self.groups.iter().flat_map(|g| g.songs.iter())
    }
}

pub fn derive_view(songs: &[Song], key: &ViewKey) -> DerivedView {
    let mut filtered = filter_songs(songs, &key.filter);
    let match_count = filtered.len();
    sort_songs(&mut filtered, key.sort_field, key.sort_direction);
    DerivedView {
        groups: group_songs(&filtered, key.group_field),
        match_count,
    }
}

/// Single-entry memo of [`derive_view`]
#[derive(Debug, Default)]
pub struct DerivedCache {
    entry: Option<(ViewKey, DerivedView)>,
}

impl DerivedCache {
    pub fn get_or_compute(&mut self, songs: &[Song], key: &ViewKey) -> &DerivedView {
        if !self.is_cached(key) {
            self.entry = None;
        }
        let (_, view) = self
            .entry
            .get_or_insert_with(|| (key.clone(), derive_view(songs, key)));
        view
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_cached(&self, key: &ViewKey) -> bool {
        matches!(&self.entry, Some((cached, _)) if cached == key)
    }
}
