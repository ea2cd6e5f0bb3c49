use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

/// Access level of a signed-in user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Badge label shown next to the user's name
    pub fn badge(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A demo account. The set is fixed at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: &'static str,
    /// Plaintext, demo only.
    pub password: &'static str,
    pub role: Role,
    pub display_name: &'static str,
}

/// A song in the library
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Free text, usually `m:ss`
    pub duration: String,
    pub year: i32,
}

impl Song {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        genre: impl Into<String>,
        duration: impl Into<String>,
        year: i32,
    ) -> Self {
        Song {
            id,
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            genre: genre.into(),
            duration: duration.into(),
            year,
        }
    }
}

/// Fields of the add-song entry form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Artist,
    Album,
    Genre,
    Duration,
    Year,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Title,
        DraftField::Artist,
        DraftField::Album,
        DraftField::Genre,
        DraftField::Duration,
        DraftField::Year,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Title => "Title",
            DraftField::Artist => "Artist",
            DraftField::Album => "Album",
            DraftField::Genre => "Genre",
            DraftField::Duration => "Duration (e.g., 3:45)",
            DraftField::Year => "Year",
        }
    }

    pub fn next(&self) -> DraftField {
        match self {
            DraftField::Title => DraftField::Artist,
            DraftField::Artist => DraftField::Album,
            DraftField::Album => DraftField::Genre,
            DraftField::Genre => DraftField::Duration,
            DraftField::Duration => DraftField::Year,
            DraftField::Year => DraftField::Title,
        }
    }

    pub fn prev(&self) -> DraftField {
        match self {
            DraftField::Title => DraftField::Year,
            DraftField::Artist => DraftField::Title,
            DraftField::Album => DraftField::Artist,
            DraftField::Genre => DraftField::Album,
            DraftField::Duration => DraftField::Genre,
            DraftField::Year => DraftField::Duration,
        }
    }
}

/// Unsubmitted contents of the add-song form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: String,
    pub year: String,
}

impl SongDraft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Artist => &self.artist,
            DraftField::Album => &self.album,
            DraftField::Genre => &self.genre,
            DraftField::Duration => &self.duration,
            DraftField::Year => &self.year,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Title => &mut self.title,
            DraftField::Artist => &mut self.artist,
            DraftField::Album => &mut self.album,
            DraftField::Genre => &mut self.genre,
            DraftField::Duration => &mut self.duration,
            DraftField::Year => &mut self.year,
        }
    }

    /// First field left blank, if any
    pub fn first_blank(&self) -> Option<DraftField> {
        DraftField::ALL
            .into_iter()
            .find(|f| self.field(*f).trim().is_empty())
    }

    /// Build the song this draft describes. An unparseable (or zero) year
    /// falls back to `fallback_year`.
    pub fn into_song(self, id: u64, fallback_year: i32) -> Song {
        let year = parse_year(&self.year).unwrap_or(fallback_year);
        Song {
            id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            genre: self.genre,
            duration: self.duration,
            year,
        }
    }
}

/// Parse the leading integer of `input`, ignoring trailing garbage
/// ("1999abc" -> 1999). Zero counts as no year. Values past the `i32`
/// range clamp to its bounds.
pub fn parse_year(input: &str) -> Option<i32> {
    let trimmed = input.trim_start();
    let sign_len = match trimmed.as_bytes().first() {
        Some(b'-' | b'+') => 1,
        _ => 0,
    };

    let end = trimmed[sign_len..]
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| sign_len + i)
        .unwrap_or(trimmed.len());

    let value = match trimmed[..end].parse::<i32>() {
        Ok(value) => value,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i32::MAX,
            IntErrorKind::NegOverflow => i32::MIN,
            _ => return None,
        },
    };

    (value != 0).then_some(value)
}

/// Field the library is sorted by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Title,
    Artist,
    Album,
    Year,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Artist => "Artist",
            SortField::Album => "Album",
            SortField::Year => "Year",
        }
    }

    pub fn next(&self) -> SortField {
        match self {
            SortField::Title => SortField::Artist,
            SortField::Artist => SortField::Album,
            SortField::Album => SortField::Year,
            SortField::Year => SortField::Title,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Field the library is grouped by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroupField {
    #[default]
    None,
    Artist,
    Album,
    Genre,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::None => "None",
            GroupField::Artist => "Artist",
            GroupField::Album => "Album",
            GroupField::Genre => "Genre",
        }
    }

    pub fn next(&self) -> GroupField {
        match self {
            GroupField::None => GroupField::Artist,
            GroupField::Artist => GroupField::Album,
            GroupField::Album => GroupField::Genre,
            GroupField::Genre => GroupField::None,
        }
    }
}
