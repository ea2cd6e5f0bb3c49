//! Command handlers - business logic for processing UI events

use chrono::{DateTime, Utc};

use crate::app::state::{LoginForm, RemoteState};
use crate::app::AppState;
use crate::auth::{AuthError, LoginOutcome};
use crate::library::{LibraryProps, LibraryView};
use crate::messages::ui_events::{InputMode, Popup};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::Role;
use crate::remote::ProvidedView;

/// Props handed to every mount. The hooks are the shell's notification
/// channel for library mutations.
fn library_props(role: Role) -> LibraryProps {
    LibraryProps::new(role)
        .on_song_add(|song| tracing::info!(id = song.id, title = %song.title, artist = %song.artist, "Song added"))
        .on_song_delete(|id| tracing::info!(id, "Song deleted"))
}

impl AppState {
    /// Restore a persisted session and, if there is one, start loading the
    /// dashboard
    pub fn startup(&mut self) -> Option<NetworkCommand> {
        if self.session.restore_session().is_some() {
            self.enter_dashboard()
        } else {
            None
        }
    }

    // ========================
    // Login form
    // ========================

    pub fn login_char(&mut self, c: char) {
        if !self.login.busy {
            self.login.active_input_mut().push(c);
        }
    }

    pub fn login_backspace(&mut self) {
        if !self.login.busy {
            self.login.active_input_mut().pop();
        }
    }

    pub fn login_next_field(&mut self) {
        self.login.active_field = self.login.active_field.toggle();
    }

    /// Mark the form busy and hand out the credentials to check.
    /// Returns None while an attempt is already running.
    pub fn begin_login(&mut self) -> Option<(String, String)> {
        if self.login.busy {
            return None;
        }
        self.login.busy = true;
        self.login.error = None;
        Some((self.login.username.clone(), self.login.password.clone()))
    }

    pub fn finish_login(&mut self, result: Result<LoginOutcome, AuthError>) -> Option<NetworkCommand> {
        self.login.busy = false;
        match result {
            Ok(outcome) => {
                self.login = LoginForm::default();
                self.status = Some(format!("Signed in as {}", outcome.user.display_name));
                self.enter_dashboard()
            }
            Err(e) => {
                self.login.error = Some(e.to_string());
                None
            }
        }
    }

    // ========================
    // Library component
    // ========================

    /// Mount the library from the cached resolution, or request one
    pub fn enter_dashboard(&mut self) -> Option<NetworkCommand> {
        self.reset_dashboard();
        match self.remote {
            RemoteState::Idle => Some(self.request_view()),
            RemoteState::Pending { .. } => None,
            RemoteState::Resolved(_) => {
                self.mount_library();
                None
            }
        }
    }

    pub fn request_view(&mut self) -> NetworkCommand {
        let id = self.next_id();
        self.remote = RemoteState::Pending { id };
        self.library = None;
        NetworkCommand::ResolveView { id }
    }

    /// Handle response from network layer
    pub fn handle_response(&mut self, response: NetworkResponse) {
        let NetworkResponse::ViewResolved { id, view, time_ms } = response;

        if !matches!(self.remote, RemoteState::Pending { id: pending } if pending == id) {
            tracing::debug!(id, "Ignoring stale library resolution");
            return;
        }

        tracing::info!(id, time_ms, loaded = view.is_loaded(), "Library component resolved");
        self.remote = RemoteState::Resolved(view);
        if self.session.is_authenticated() {
            self.mount_library();
        }
    }

    /// Replace the mounted view with a fresh instance of the resolved module
    fn mount_library(&mut self) {
        let (RemoteState::Resolved(ProvidedView::Loaded(module)), Some(user)) =
            (&self.remote, self.session.user())
        else {
            self.library = None;
            return;
        };
        self.library = Some(module.mount(library_props(user.role)));
    }

    /// Remount the library, dropping every mutation and view setting
    pub fn refresh(&mut self) {
        if self.library.is_some() {
            self.input_mode = InputMode::Normal;
            self.mount_library();
            self.status = Some(String::from("Library refreshed"));
        }
    }

    /// Forget the cached resolution and resolve again
    pub fn retry_remote(&mut self) -> Option<NetworkCommand> {
        if !self.session.is_authenticated() {
            return None;
        }
        tracing::info!(location = %self.remote_location, "Retrying library component");
        self.status = None;
        Some(self.request_view())
    }

    /// URL to open for a manual look at the remote endpoint
    pub fn probe_target(&mut self) -> Option<String> {
        if self.remote_location.starts_with("http://") || self.remote_location.starts_with("https://") {
            self.status = Some(format!("Opening {}", self.remote_location));
            Some(self.remote_location.clone())
        } else {
            self.status = Some(String::from("The bundled library has no remote endpoint"));
            None
        }
    }

    fn reset_dashboard(&mut self) {
        self.library = None;
        self.input_mode = InputMode::Normal;
        self.popup = Popup::None;
    }

    fn with_library(&mut self, f: impl FnOnce(&mut LibraryView)) {
        if let Some(view) = self.library.as_mut() {
            f(view);
        }
    }

    // ========================
    // Search / sort / group
    // ========================

    pub fn start_search(&mut self) {
        if self.library.is_some() {
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn search_char(&mut self, c: char) {
        self.with_library(|view| view.push_filter_char(c));
    }

    pub fn search_backspace(&mut self) {
        self.with_library(|view| view.pop_filter_char());
    }

    pub fn clear_search(&mut self) {
        self.with_library(|view| view.clear_filter());
    }

    pub fn cycle_sort(&mut self) {
        self.with_library(|view| view.cycle_sort_field());
    }

    pub fn toggle_sort_direction(&mut self) {
        self.with_library(|view| view.toggle_sort_direction());
    }

    pub fn cycle_group(&mut self) {
        self.with_library(|view| view.cycle_group_field());
    }

    pub fn select_next(&mut self) {
        self.with_library(|view| view.select_next());
    }

    pub fn select_prev(&mut self) {
        self.with_library(|view| view.select_prev());
    }

    // ========================
    // Admin actions
    // ========================

    pub fn delete_selected(&mut self) {
        let deleted = self.library.as_mut().and_then(|view| view.delete_selected());
        if let Some(id) = deleted {
            self.status = Some(format!("Deleted song #{}", id));
        }
    }

    pub fn open_add_form(&mut self) {
        if self.library.as_mut().is_some_and(|view| view.open_form()) {
            self.popup = Popup::AddSong;
        }
    }

    pub fn close_add_form(&mut self) {
        self.with_library(|view| view.close_form());
        self.popup = Popup::None;
    }

    pub fn form_char(&mut self, c: char) {
        self.with_library(|view| view.form_char(c));
    }

    pub fn form_backspace(&mut self) {
        self.with_library(|view| view.form_backspace());
    }

    pub fn form_next_field(&mut self) {
        self.with_library(|view| view.form_next_field());
    }

    pub fn form_prev_field(&mut self) {
        self.with_library(|view| view.form_prev_field());
    }

    pub fn submit_add_form(&mut self) {
        let added = self.library.as_mut().and_then(|view| view.submit_form());
        if let Some(song) = added {
            self.popup = Popup::None;
            self.status = Some(format!("Added \"{}\"", song.title));
        }
    }

    // ========================
    // Sign out / expiry
    // ========================

    pub fn request_sign_out(&mut self) {
        self.popup = Popup::ConfirmSignOut;
    }

    pub fn cancel_sign_out(&mut self) {
        self.popup = Popup::None;
    }

    pub fn confirm_sign_out(&mut self) {
        self.session.logout();
        self.reset_dashboard();
        self.login = LoginForm::default();
        self.status = None;
    }

    /// Drop the session once its token has run out. Returns true when the
    /// screen changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.session.expire_if_stale(now) {
            return false;
        }
        self.reset_dashboard();
        self.login = LoginForm {
            error: Some(String::from("Your session has expired. Please sign in again.")),
            ..LoginForm::default()
        };
        self.status = None;
        true
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.popup = match self.popup {
            Popup::Help => Popup::None,
            _ => Popup::Help,
        };
    }

    pub fn close_help(&mut self) {
        if self.popup == Popup::Help {
            self.popup = Popup::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthSettings, SessionContext};
    use crate::library::catalog::sample_songs;
    use crate::messages::render::PaneRender;
    use crate::messages::ui_events::Screen;
    use crate::remote::{LibraryModule, RemoteLoadError};
    use crate::storage::Storage;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;

    fn test_state(dir: &Path, location: &str) -> AppState {
        let settings = AuthSettings {
            login_delay: Duration::ZERO,
            token_ttl: chrono::Duration::hours(24),
        };
        AppState::new(SessionContext::new(Storage::at(dir), settings), location)
    }

    fn loaded() -> ProvidedView {
        ProvidedView::Loaded(LibraryModule {
            remote: "musicLibrary".into(),
            version: "1.0.0".into(),
            seed: sample_songs(),
        })
    }

    async fn sign_in(state: &mut AppState, username: &str, password: &str) -> Option<NetworkCommand> {
        state.login.username = username.into();
        state.login.password = password.into();
        let (username, password) = state.begin_login().unwrap();
        let result = state.session.login(&username, &password).await;
        state.finish_login(result)
    }

    fn resolve(state: &mut AppState, cmd: Option<NetworkCommand>, view: ProvidedView) {
        let Some(NetworkCommand::ResolveView { id }) = cmd else {
            panic!("expected a resolve request, got {cmd:?}");
        };
        state.handle_response(NetworkResponse::ViewResolved { id, view, time_ms: 0 });
    }

    fn song_count(state: &AppState) -> usize {
        state.library.as_ref().map(|v| v.songs().len()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_admin_adds_song_through_form() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        let cmd = sign_in(&mut state, "admin", "admin123").await;
        resolve(&mut state, cmd, loaded());

        state.open_add_form();
        assert_eq!(state.popup, Popup::AddSong);
        for value in ["Test", "Tester", "Fixtures", "Noise", "1:23", "2020"] {
            for c in value.chars() {
                state.form_char(c);
            }
            state.form_next_field();
        }
        state.submit_add_form();

        assert_eq!(state.popup, Popup::None);
        assert_eq!(state.status.as_deref(), Some("Added \"Test\""));
        let view = state.library.as_ref().unwrap();
        let added = view.songs().last().unwrap();
        assert_eq!((added.id, added.year), (11, 2020));
    }

    #[tokio::test]
    async fn test_user_cannot_mutate() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        let cmd = sign_in(&mut state, "user", "user123").await;
        resolve(&mut state, cmd, loaded());

        state.delete_selected();
        state.open_add_form();

        assert_eq!(song_count(&state), 10);
        assert_eq!(state.popup, Popup::None);
        assert!(!state.to_render_state().is_admin());
    }

    #[tokio::test]
    async fn test_refresh_discards_mutations_and_view_state() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        let cmd = sign_in(&mut state, "admin", "admin123").await;
        resolve(&mut state, cmd, loaded());

        state.delete_selected();
        state.search_char('x');
        assert_eq!(song_count(&state), 9);

        state.refresh();
        assert_eq!(song_count(&state), 10);
        assert_eq!(state.library.as_ref().map(|v| v.filter().to_string()), Some(String::new()));
    }

    #[tokio::test]
    async fn test_failed_resolution_shows_fallback_until_retry() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "http://localhost:5001/assets/remoteEntry.json");
        let cmd = sign_in(&mut state, "user", "user123").await;
        let failure = RemoteLoadError::Timeout {
            url: state.remote_location.clone(),
        };
        resolve(&mut state, cmd, ProvidedView::Failed(failure));

        match state.to_render_state().pane {
            PaneRender::Failed { message, diagnostic, .. } => {
                assert!(message.contains("Timed out"));
                assert!(diagnostic.contains("Timeout"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }

        // Refresh has nothing to remount
        state.refresh();
        assert!(state.library.is_none());

        let retry = state.retry_remote();
        assert!(matches!(state.to_render_state().pane, PaneRender::Loading));
        resolve(&mut state, retry, loaded());
        assert_eq!(song_count(&state), 10);
    }

    #[tokio::test]
    async fn test_stale_resolution_is_ignored() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        let first = sign_in(&mut state, "admin", "admin123").await;
        let second = state.retry_remote();

        resolve(&mut state, first, ProvidedView::Failed(RemoteLoadError::Malformed { detail: "x".into() }));
        assert!(matches!(state.remote, RemoteState::Pending { .. }));

        resolve(&mut state, second, loaded());
        assert!(state.library.is_some());
    }

    #[tokio::test]
    async fn test_resolution_is_cached_across_sign_out() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        let cmd = sign_in(&mut state, "admin", "admin123").await;
        resolve(&mut state, cmd, loaded());
        state.delete_selected();

        state.request_sign_out();
        assert_eq!(state.popup, Popup::ConfirmSignOut);
        state.confirm_sign_out();
        assert_eq!(state.screen(), Screen::Login);
        assert!(state.library.is_none());
        assert_eq!(state.session.storage().load_token(), None);

        // No new request; the fresh mount starts from the seed
        assert!(sign_in(&mut state, "user", "user123").await.is_none());
        assert_eq!(song_count(&state), 10);
        assert_eq!(state.library.as_ref().map(|v| v.role()), Some(Role::User));
    }

    #[tokio::test]
    async fn test_bad_credentials_show_inline_error() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        assert!(sign_in(&mut state, "admin", "wrong").await.is_none());

        let render = state.to_render_state();
        assert_eq!(render.screen, Screen::Login);
        assert_eq!(render.login.error.as_deref(), Some("Invalid username or password"));
        assert!(!render.login.busy);
        assert_eq!(render.login.password_len, 5);
    }

    #[test]
    fn test_begin_login_refuses_while_busy() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        state.login.error = Some("old".into());
        assert!(state.begin_login().is_some());
        assert!(state.login.error.is_none());
        assert!(state.begin_login().is_none());

        state.login_char('a');
        assert!(state.login.username.is_empty());
    }

    #[tokio::test]
    async fn test_expiry_tick_returns_to_login() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path(), "bundled");
        let cmd = sign_in(&mut state, "admin", "admin123").await;
        resolve(&mut state, cmd, loaded());

        assert!(!state.tick(Utc::now()));
        assert!(state.tick(Utc::now() + chrono::Duration::hours(25)));
        assert_eq!(state.screen(), Screen::Login);
        assert!(state.library.is_none());
        assert!(state.login.error.is_some());
    }

    #[tokio::test]
    async fn test_startup_restores_session_and_requests_view() {
        let dir = tempdir().unwrap();
        let mut first = test_state(dir.path(), "bundled");
        sign_in(&mut first, "admin", "admin123").await;

        let mut second = test_state(dir.path(), "bundled");
        let cmd = second.startup();
        assert!(matches!(cmd, Some(NetworkCommand::ResolveView { .. })));
        assert_eq!(second.screen(), Screen::Dashboard);

        let mut empty = test_state(tempdir().unwrap().path(), "bundled");
        assert!(empty.startup().is_none());
    }

    #[test]
    fn test_probe_target_only_for_http_locations() {
        let dir = tempdir().unwrap();
        let mut bundled = test_state(dir.path(), "bundled");
        assert_eq!(bundled.probe_target(), None);

        let mut http = test_state(dir.path(), "http://localhost:5001/assets/remoteEntry.json");
        assert_eq!(
            http.probe_target().as_deref(),
            Some("http://localhost:5001/assets/remoteEntry.json")
        );
    }
}
