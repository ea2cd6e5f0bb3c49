//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Top-level screen
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Login,
    Dashboard,
}

/// Focused field of the login form
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

impl LoginField {
    pub fn toggle(&self) -> LoginField {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        }
    }
}

/// Input mode of the dashboard; `Editing` means the search box has focus
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Popup drawn over the dashboard
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Popup {
    #[default]
    None,
    Help,
    AddSong,
    ConfirmSignOut,
}

/// What the content pane is showing
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PaneKind {
    #[default]
    Loading,
    Ready,
    Failed,
}

/// Everything the key mapper needs to know about the current UI
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct KeyContext {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub popup: Popup,
    pub pane: PaneKind,
    pub is_admin: bool,
    /// A login attempt is in flight
    pub busy: bool,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    // Login form
    LoginChar(char),
    LoginBackspace,
    LoginNextField,
    LoginSubmit,

    // Search box
    StartSearch,
    StopSearch,
    SearchChar(char),
    SearchBackspace,
    ClearSearch,

    // View controls
    CycleSort,
    ToggleSortDirection,
    CycleGroup,
    SelectNext,
    SelectPrev,

    // Admin actions
    DeleteSelected,
    OpenAddForm,
    CloseAddForm,
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    SubmitAddForm,

    // Dashboard
    Refresh,
    RetryRemote,
    ProbeRemote,
    RequestSignOut,
    ConfirmSignOut,
    CancelSignOut,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(UiEvent::Quit),
            _ => None,
        };
    }

    match ctx.screen {
        Screen::Login => handle_login_keys(key, ctx.busy),
        Screen::Dashboard => handle_dashboard_keys(key, ctx),
    }
}

/// Handle keys on the login screen
fn handle_login_keys(key: KeyEvent, busy: bool) -> Option<UiEvent> {
    // Form is disabled while signing in
    if busy {
        return None;
    }

    match key.code {
        KeyCode::Esc => Some(UiEvent::Quit),
        KeyCode::Enter => Some(UiEvent::LoginSubmit),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => Some(UiEvent::LoginNextField),
        KeyCode::Backspace => Some(UiEvent::LoginBackspace),
        KeyCode::Char(c) => Some(UiEvent::LoginChar(c)),
        _ => None,
    }
}

/// Handle keys on the dashboard
fn handle_dashboard_keys(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    // Popups take every key
    match ctx.popup {
        Popup::Help => return Some(UiEvent::CloseHelp),
        Popup::ConfirmSignOut => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(UiEvent::ConfirmSignOut),
                KeyCode::Char('n') | KeyCode::Esc => Some(UiEvent::CancelSignOut),
                _ => None,
            };
        }
        Popup::AddSong => {
            return match key.code {
                KeyCode::Esc => Some(UiEvent::CloseAddForm),
                KeyCode::Enter => Some(UiEvent::SubmitAddForm),
                KeyCode::Tab | KeyCode::Down => Some(UiEvent::FormNextField),
                KeyCode::BackTab | KeyCode::Up => Some(UiEvent::FormPrevField),
                KeyCode::Backspace => Some(UiEvent::FormBackspace),
                KeyCode::Char(c) => Some(UiEvent::FormChar(c)),
                _ => None,
            };
        }
        Popup::None => {}
    }

    if ctx.input_mode == InputMode::Editing {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopSearch),
            KeyCode::Backspace => Some(UiEvent::SearchBackspace),
            KeyCode::Char(c) => Some(UiEvent::SearchChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('l') => return Some(UiEvent::RequestSignOut),
        _ => {}
    }

    match ctx.pane {
        PaneKind::Loading => None,
        PaneKind::Failed => match key.code {
            KeyCode::Char('r') | KeyCode::Enter => Some(UiEvent::RetryRemote),
            KeyCode::Char('p') => Some(UiEvent::ProbeRemote),
            _ => None,
        },
        PaneKind::Ready => match key.code {
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('/') => Some(UiEvent::StartSearch),
            KeyCode::Char('c') => Some(UiEvent::ClearSearch),
            KeyCode::Char('s') => Some(UiEvent::CycleSort),
            KeyCode::Char('o') => Some(UiEvent::ToggleSortDirection),
            KeyCode::Char('g') => Some(UiEvent::CycleGroup),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Char('a') if ctx.is_admin => Some(UiEvent::OpenAddForm),
            KeyCode::Char('d') | KeyCode::Delete if ctx.is_admin => Some(UiEvent::DeleteSelected),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard(pane: PaneKind, is_admin: bool) -> KeyContext {
        KeyContext {
            screen: Screen::Dashboard,
            pane,
            is_admin,
            ..Default::default()
        }
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let busy_login = KeyContext {
            busy: true,
            ..Default::default()
        };
        assert_eq!(key_to_ui_event(key, busy_login), Some(UiEvent::Quit));
        assert_eq!(key_to_ui_event(key, dashboard(PaneKind::Ready, false)), Some(UiEvent::Quit));
    }

    #[test]
    fn test_login_keys_type_into_form() {
        let ctx = KeyContext::default();
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), ctx), Some(UiEvent::LoginChar('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Tab), ctx), Some(UiEvent::LoginNextField));
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), ctx), Some(UiEvent::LoginSubmit));
    }

    #[test]
    fn test_login_ignores_input_while_busy() {
        let ctx = KeyContext {
            busy: true,
            ..Default::default()
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('a')), ctx), None);
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), ctx), None);
    }

    #[test]
    fn test_admin_only_keys() {
        let admin = dashboard(PaneKind::Ready, true);
        let user = dashboard(PaneKind::Ready, false);

        assert_eq!(key_to_ui_event(press(KeyCode::Char('a')), admin), Some(UiEvent::OpenAddForm));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('d')), admin), Some(UiEvent::DeleteSelected));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('a')), user), None);
        assert_eq!(key_to_ui_event(press(KeyCode::Char('d')), user), None);

        // Viewing is open to everyone
        assert_eq!(key_to_ui_event(press(KeyCode::Char('s')), user), Some(UiEvent::CycleSort));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('g')), user), Some(UiEvent::CycleGroup));
    }

    #[test]
    fn test_refresh_key_depends_on_pane() {
        let r = press(KeyCode::Char('r'));
        assert_eq!(key_to_ui_event(r, dashboard(PaneKind::Ready, false)), Some(UiEvent::Refresh));
        assert_eq!(key_to_ui_event(r, dashboard(PaneKind::Failed, false)), Some(UiEvent::RetryRemote));
        assert_eq!(key_to_ui_event(r, dashboard(PaneKind::Loading, false)), None);
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('p')), dashboard(PaneKind::Failed, false)),
            Some(UiEvent::ProbeRemote)
        );
    }

    #[test]
    fn test_search_mode_captures_characters() {
        let ctx = KeyContext {
            input_mode: InputMode::Editing,
            ..dashboard(PaneKind::Ready, true)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), ctx), Some(UiEvent::SearchChar('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('d')), ctx), Some(UiEvent::SearchChar('d')));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::StopSearch));
    }

    #[test]
    fn test_popups_take_precedence() {
        let help = KeyContext {
            popup: Popup::Help,
            ..dashboard(PaneKind::Ready, true)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), help), Some(UiEvent::CloseHelp));

        let confirm = KeyContext {
            popup: Popup::ConfirmSignOut,
            ..dashboard(PaneKind::Ready, true)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('y')), confirm), Some(UiEvent::ConfirmSignOut));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), confirm), Some(UiEvent::CancelSignOut));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), confirm), None);

        let form = KeyContext {
            popup: Popup::AddSong,
            ..dashboard(PaneKind::Ready, true)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), form), Some(UiEvent::FormChar('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), form), Some(UiEvent::SubmitAddForm));
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(key_to_ui_event(key, dashboard(PaneKind::Ready, false)), None);
    }
}
