//! Render state - data structure sent from App layer to UI for rendering

use crate::library::LibrarySnapshot;
use crate::messages::ui_events::{InputMode, KeyContext, LoginField, PaneKind, Popup, Screen};
use crate::models::Role;

/// Login form as the UI draws it
#[derive(Debug, Clone, Default)]
pub struct LoginRender {
    pub username: String,
    /// Only the length leaves the app layer
    pub password_len: usize,
    pub active_field: LoginField,
    pub error: Option<String>,
    pub busy: bool,
}

/// Signed-in user shown in the dashboard header
#[derive(Debug, Clone)]
pub struct UserBadge {
    pub display_name: String,
    pub role: Role,
}

/// Content pane of the dashboard
#[derive(Debug, Clone, Default)]
pub enum PaneRender {
    #[default]
    Loading,
    Ready(LibrarySnapshot),
    Failed {
        message: String,
        diagnostic: String,
        location: String,
    },
}

impl PaneRender {
    pub fn kind(&self) -> PaneKind {
        match self {
            PaneRender::Loading => PaneKind::Loading,
            PaneRender::Ready(_) => PaneKind::Ready,
            PaneRender::Failed { .. } => PaneKind::Failed,
        }
    }
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub screen: Screen,
    pub login: LoginRender,
    pub user: Option<UserBadge>,
    pub pane: PaneRender,
    /// Where the library component comes from
    pub remote_location: String,
    pub input_mode: InputMode,
    pub popup: Popup,
    /// Last notification for the status bar
    pub status: Option<String>,
}

impl RenderState {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }

    /// Context for [`crate::messages::ui_events::key_to_ui_event`]
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            screen: self.screen,
            input_mode: self.input_mode,
            popup: self.popup,
            pane: self.pane.kind(),
            is_admin: self.is_admin(),
            busy: self.login.busy,
        }
    }
}
