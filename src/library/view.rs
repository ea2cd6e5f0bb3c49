//! The mounted library component.
//!
//! Owns its songs and UI state; the host only supplies [`LibraryProps`].
//! Dropping the view and mounting a new one discards every mutation.

use std::fmt;

use chrono::Datelike;

use crate::library::derive::{DerivedCache, SongGroup, ViewKey};
use crate::models::{DraftField, GroupField, Role, SongDraft, SortDirection, SortField, Song};

/// Called after a song was added
pub type SongAddedHook = Box<dyn Fn(&Song) + Send>;
/// Called with the id of a deleted song
pub type SongDeletedHook = Box<dyn Fn(u64) + Send>;

/// What the host passes to the component on mount
pub struct LibraryProps {
    pub role: Role,
    pub on_song_add: Option<SongAddedHook>,
    pub on_song_delete: Option<SongDeletedHook>,
}

impl LibraryProps {
    pub fn new(role: Role) -> Self {
        LibraryProps {
            role,
            on_song_add: None,
            on_song_delete: None,
        }
    }

    pub fn on_song_add(mut self, hook: impl Fn(&Song) + Send + 'static) -> Self {
        self.on_song_add = Some(Box::new(hook));
        self
    }

    pub fn on_song_delete(mut self, hook: impl Fn(u64) + Send + 'static) -> Self {
        self.on_song_delete = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for LibraryProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryProps")
            .field("role", &self.role)
            .field("on_song_add", &self.on_song_add.is_some())
            .field("on_song_delete", &self.on_song_delete.is_some())
            .finish()
    }
}

/// Everything the UI needs to draw the library
#[derive(Clone, Debug, Default)]
pub struct LibrarySnapshot {
    pub role: Option<Role>,
    pub groups: Vec<SongGroup>,
    pub match_count: usize,
    pub total: usize,
    pub filter: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub group_field: GroupField,
    /// Index into the display order, see [`crate::library::DerivedView::ordered`]
    pub selected: usize,
    pub draft: SongDraft,
    pub draft_field: Option<DraftField>,
    pub form_error: Option<String>,
}

impl LibrarySnapshot {
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|r| r.is_admin())
    }

    /// "Found N songs matching ..." line, shown while a filter is active
    pub fn results_summary(&self) -> Option<String> {
        if self.filter.is_empty() {
            return None;
        }
        Some(match self.match_count {
            0 => format!("No songs found matching \"{}\"", self.filter),
            1 => format!("Found 1 song matching \"{}\"", self.filter),
            n => format!("Found {} songs matching \"{}\"", n, self.filter),
        })
    }
}

pub struct LibraryView {
    songs: Vec<Song>,
    version: u64,
    filter: String,
    sort_field: SortField,
    sort_direction: SortDirection,
    group_field: GroupField,
    selected: usize,
    draft: SongDraft,
    draft_field: Option<DraftField>,
    form_error: Option<String>,
    props: LibraryProps,
    cache: DerivedCache,
}

impl LibraryView {
    /// Mount a fresh view over `seed`
    pub fn mount(seed: Vec<Song>, props: LibraryProps) -> Self {
        tracing::debug!(songs = seed.len(), role = props.role.as_str(), "Mounting library view");
        LibraryView {
            songs: seed,
            version: 0,
            filter: String::new(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            group_field: GroupField::default(),
            selected: 0,
            draft: SongDraft::default(),
            draft_field: None,
            form_error: None,
            props,
            cache: DerivedCache::default(),
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn role(&self) -> Role {
        self.props.role
    }

    pub fn is_admin(&self) -> bool {
        self.props.role.is_admin()
    }

    /// Collection version; bumped by every add or delete
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn view_key(&self) -> ViewKey {
        ViewKey {
            version: self.version,
            filter: self.filter.clone(),
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
            group_field: self.group_field,
        }
    }

    // ========================
    // Filter / sort / group
    // ========================

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.selected = 0;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    pub fn cycle_sort_field(&mut self) {
        self.sort_field = self.sort_field.next();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggle();
    }

    pub fn set_group_field(&mut self, field: GroupField) {
        self.group_field = field;
    }

    pub fn cycle_group_field(&mut self) {
        self.group_field = self.group_field.next();
    }

    /// Current grouped projection, recomputed only when its key changed
    pub fn groups(&mut self) -> &[SongGroup] {
        let key = self.view_key();
        &self.cache.get_or_compute(&self.songs, &key).groups
    }

    // ========================
    // Selection
    // ========================

    fn visible_len(&mut self) -> usize {
        let key = self.view_key();
        self.cache.get_or_compute(&self.songs, &key).match_count
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Id of the highlighted song in display order
    pub fn selected_song_id(&mut self) -> Option<u64> {
        let key = self.view_key();
        let selected = self.selected;
        self.cache
            .get_or_compute(&self.songs, &key)
            .ordered()
            .nth(selected)
            .map(|s| s.id)
    }

    // ========================
    // Mutations (admin only)
    // ========================

    /// Append a song built from `draft`. Non-admins are silently ignored.
    pub fn add_song(&mut self, draft: SongDraft) -> Option<Song> {
        if !self.is_admin() {
            tracing::debug!(role = self.props.role.as_str(), "Ignoring add from non-admin");
            return None;
        }

        let Some(id) = self.songs.iter().map(|s| s.id).max().unwrap_or(0).checked_add(1) else {
            tracing::warn!("Song ids exhausted, ignoring add");
            return None;
        };
        let song = draft.into_song(id, chrono::Local::now().year());

        self.songs.push(song.clone());
        self.version += 1;
        self.draft = SongDraft::default();
        self.form_error = None;

        if let Some(hook) = &self.props.on_song_add {
            hook(&song);
        }
        Some(song)
    }

    /// Remove the song with `id`. Non-admins are silently ignored.
    /// Returns true when the caller was allowed to delete.
    pub fn delete_song(&mut self, id: u64) -> bool {
        if !self.is_admin() {
            tracing::debug!(role = self.props.role.as_str(), id, "Ignoring delete from non-admin");
            return false;
        }

        self.songs.retain(|s| s.id != id);
        self.version += 1;

        let len = self.visible_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }

        if let Some(hook) = &self.props.on_song_delete {
            hook(id);
        }
        true
    }

    pub fn delete_selected(&mut self) -> Option<u64> {
        let id = self.selected_song_id()?;
        self.delete_song(id).then_some(id)
    }

    // ========================
    // Entry form
    // ========================

    /// Open the add-song form; only admins get one
    pub fn open_form(&mut self) -> bool {
        if self.is_admin() {
            self.draft_field = Some(DraftField::Title);
            self.form_error = None;
        }
        self.draft_field.is_some()
    }

    pub fn close_form(&mut self) {
        self.draft_field = None;
        self.form_error = None;
    }

    pub fn is_form_open(&self) -> bool {
        self.draft_field.is_some()
    }

    pub fn draft(&self) -> &SongDraft {
        &self.draft
    }

    pub fn form_char(&mut self, c: char) {
        if let Some(field) = self.draft_field {
            self.draft.field_mut(field).push(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(field) = self.draft_field {
            self.draft.field_mut(field).pop();
        }
    }

    pub fn form_next_field(&mut self) {
        self.draft_field = self.draft_field.map(|f| f.next());
    }

    pub fn form_prev_field(&mut self) {
        self.draft_field = self.draft_field.map(|f| f.prev());
    }

    /// Submit the entry form. Every field is required; on success the form
    /// closes and the new song is returned.
    pub fn submit_form(&mut self) -> Option<Song> {
        if let Some(blank) = self.draft.first_blank() {
            self.form_error = Some(format!("{} is required", blank.label()));
            self.draft_field = Some(blank);
            return None;
        }

        let draft = std::mem::take(&mut self.draft);
        let added = self.add_song(draft);
        if added.is_some() {
            self.draft_field = None;
        }
        added
    }

    pub fn snapshot(&mut self) -> LibrarySnapshot {
        let key = self.view_key();
        let view = self.cache.get_or_compute(&self.songs, &key);
        LibrarySnapshot {
            role: Some(self.props.role),
            groups: view.groups.clone(),
            match_count: view.match_count,
            total: self.songs.len(),
            filter: self.filter.clone(),
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
            group_field: self.group_field,
            selected: self.selected,
            draft: self.draft.clone(),
            draft_field: self.draft_field,
            form_error: self.form_error.clone(),
        }
    }
}

impl fmt::Debug for LibraryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryView")
            .field("songs", &self.songs.len())
            .field("version", &self.version)
            .field("filter", &self.filter)
            .field("props", &self.props)
            .finish()
    }
}
