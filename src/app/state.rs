//! App state - pure data structure with no I/O logic

use crate::auth::SessionContext;
use crate::library::LibraryView;
use crate::messages::render::{LoginRender, PaneRender, UserBadge};
use crate::messages::ui_events::{InputMode, LoginField, Popup, Screen};
use crate::messages::RenderState;
use crate::remote::ProvidedView;

/// Login form state
#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub active_field: LoginField,
    pub error: Option<String>,
    /// A login attempt is in flight
    pub busy: bool,
}

impl LoginForm {
    pub fn active_input_mut(&mut self) -> &mut String {
        match self.active_field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Resolution of the library component. A finished resolution is kept
/// until the user explicitly retries.
#[derive(Clone, Debug, Default)]
pub enum RemoteState {
    #[default]
    Idle,
    Pending { id: u64 },
    Resolved(ProvidedView),
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub session: SessionContext,
    pub login: LoginForm,

    // Library component
    pub remote_location: String,
    pub remote: RemoteState,
    pub library: Option<LibraryView>,
    pub next_request_id: u64,

    // UI state
    pub input_mode: InputMode,
    pub popup: Popup,
    pub status: Option<String>,
}

impl AppState {
    pub fn new(session: SessionContext, remote_location: impl Into<String>) -> Self {
        AppState {
            session,
            login: LoginForm::default(),
            remote_location: remote_location.into(),
            remote: RemoteState::Idle,
            library: None,
            next_request_id: 1,
            input_mode: InputMode::Normal,
            popup: Popup::None,
            status: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        }
    }

    fn pane(&mut self) -> PaneRender {
        if let Some(view) = self.library.as_mut() {
            return PaneRender::Ready(view.snapshot());
        }
        match &self.remote {
            RemoteState::Resolved(ProvidedView::Failed(e)) => PaneRender::Failed {
                message: e.to_string(),
                diagnostic: e.diagnostic(),
                location: self.remote_location.clone(),
            },
            _ => PaneRender::Loading,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&mut self) -> RenderState {
        RenderState {
            screen: self.screen(),
            login: LoginRender {
                username: self.login.username.clone(),
                password_len: self.login.password.chars().count(),
                active_field: self.login.active_field,
                error: self.login.error.clone(),
                busy: self.login.busy,
            },
            user: self.session.user().map(|u| UserBadge {
                display_name: u.display_name.to_string(),
                role: u.role,
            }),
            pane: self.pane(),
            remote_location: self.remote_location.clone(),
            input_mode: self.input_mode,
            popup: self.popup,
            status: self.status.clone(),
        }
    }
}
