//! App actor - message loop processing UI events and network responses

use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::auth::SessionContext;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// How often the session's expiry is checked
const SESSION_TICK: Duration = Duration::from_secs(1);

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        session: SessionContext,
        remote_location: impl Into<String>,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(session, remote_location),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        if let Some(cmd) = self.state.startup() {
            self.send_network(cmd);
        }
        self.render();

        let mut ticker = tokio::time::interval(SESSION_TICK);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event).await {
                        // Quit signal received
                        self.send_network(NetworkCommand::Shutdown);
                        break;
                    }
                    self.render();
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    self.render();
                }
                _ = ticker.tick() => {
                    if self.state.tick(chrono::Utc::now()) {
                        self.render();
                    }
                }
                else => break,
            }
        }
    }

    fn render(&mut self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    fn send_network(&self, cmd: NetworkCommand) {
        let _ = self.network_tx.send(cmd);
    }

    /// Handle a UI event, returns true if quit was requested
    async fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Login
            UiEvent::LoginChar(c) => self.state.login_char(c),
            UiEvent::LoginBackspace => self.state.login_backspace(),
            UiEvent::LoginNextField => self.state.login_next_field(),
            UiEvent::LoginSubmit => {
                if let Some((username, password)) = self.state.begin_login() {
                    // Show "Signing in..." while the check runs
                    self.render();
                    let result = self.state.session.login(&username, &password).await;
                    if let Some(cmd) = self.state.finish_login(result) {
                        self.send_network(cmd);
                    }
                }
            }

            // Search
            UiEvent::StartSearch => self.state.start_search(),
            UiEvent::StopSearch => self.state.stop_search(),
            UiEvent::SearchChar(c) => self.state.search_char(c),
            UiEvent::SearchBackspace => self.state.search_backspace(),
            UiEvent::ClearSearch => self.state.clear_search(),

            // View controls
            UiEvent::CycleSort => self.state.cycle_sort(),
            UiEvent::ToggleSortDirection => self.state.toggle_sort_direction(),
            UiEvent::CycleGroup => self.state.cycle_group(),
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),

            // Admin
            UiEvent::DeleteSelected => self.state.delete_selected(),
            UiEvent::OpenAddForm => self.state.open_add_form(),
            UiEvent::CloseAddForm => self.state.close_add_form(),
            UiEvent::FormChar(c) => self.state.form_char(c),
            UiEvent::FormBackspace => self.state.form_backspace(),
            UiEvent::FormNextField => self.state.form_next_field(),
            UiEvent::FormPrevField => self.state.form_prev_field(),
            UiEvent::SubmitAddForm => self.state.submit_add_form(),

            // Dashboard
            UiEvent::Refresh => self.state.refresh(),
            UiEvent::RetryRemote => {
                if let Some(cmd) = self.state.retry_remote() {
                    self.send_network(cmd);
                }
            }
            UiEvent::ProbeRemote => {
                if let Some(url) = self.state.probe_target() {
                    if let Err(e) = webbrowser::open(&url) {
                        tracing::warn!(url = %url, error = %e, "Could not open browser");
                        self.state.status = Some(format!("Could not open browser: {}", e));
                    }
                }
            }
            UiEvent::RequestSignOut => self.state.request_sign_out(),
            UiEvent::ConfirmSignOut => self.state.confirm_sign_out(),
            UiEvent::CancelSignOut => self.state.cancel_sign_out(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthSettings;
    use crate::messages::render::PaneRender;
    use crate::messages::ui_events::Screen;
    use crate::remote::{BundledViewProvider, ProvidedView, ViewProvider};
    use crate::storage::Storage;
    use tempfile::tempdir;

    async fn next_render(rx: &mut mpsc::UnboundedReceiver<RenderState>) -> RenderState {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("render timed out")
            .expect("render channel closed")
    }

    #[tokio::test]
    async fn test_login_flow_reaches_library() {
        let dir = tempdir().unwrap();
        let settings = AuthSettings {
            login_delay: Duration::ZERO,
            token_ttl: chrono::Duration::hours(24),
        };
        let session = SessionContext::new(Storage::at(dir.path()), settings);

        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_tx, mut net_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(session, "bundled", net_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, resp_rx));

        assert_eq!(next_render(&mut render_rx).await.screen, Screen::Login);

        for c in "admin".chars() {
            ui_tx.send(UiEvent::LoginChar(c)).unwrap();
        }
        ui_tx.send(UiEvent::LoginNextField).unwrap();
        for c in "admin123".chars() {
            ui_tx.send(UiEvent::LoginChar(c)).unwrap();
        }
        ui_tx.send(UiEvent::LoginSubmit).unwrap();

        let Some(NetworkCommand::ResolveView { id }) = net_rx.recv().await else {
            panic!("expected a resolve request");
        };
        let view: ProvidedView = BundledViewProvider::new().resolve().await;
        resp_tx
            .send(NetworkResponse::ViewResolved { id, view, time_ms: 0 })
            .unwrap();

        let ready = loop {
            let state = next_render(&mut render_rx).await;
            if let PaneRender::Ready(snapshot) = &state.pane {
                break (state.screen, snapshot.total, state.is_admin());
            }
        };
        assert_eq!(ready, (Screen::Dashboard, 10, true));

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }
}
