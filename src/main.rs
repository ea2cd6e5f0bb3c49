//! Music Dashboard - Actor-based terminal shell for the music library
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - session and library state machine
//! - Network Layer (Tokio) - async resolution of the library component

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use musicdash::app::AppActor;
use musicdash::auth::{AuthSettings, SessionContext};
use musicdash::config::{Config, RemoteMode};
use musicdash::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use musicdash::library::LibrarySnapshot;
use musicdash::messages::render::{LoginRender, PaneRender};
use musicdash::messages::ui_events::{key_to_ui_event, InputMode, LoginField, Popup, Screen};
use musicdash::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use musicdash::models::{DraftField, GroupField, Song};
use musicdash::network::NetworkActor;
use musicdash::remote::{BundledViewProvider, HttpViewProvider, ViewProvider};
use musicdash::storage::Storage;
use musicdash::ui::{
    centered_rect, hint_line, input_cursor_x, masked, render_input, role_badge, role_hint,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let storage = Storage::new();
    storage.ensure_dir().context("creating data directory")?;

    // Initialize logging to file; the terminal belongs to the UI
    let file_appender = tracing_appender::rolling::never(storage.data_dir(), LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load(storage.data_dir())?;
    tracing::info!(
        version = APP_VERSION,
        mode = ?config.remote.mode,
        url = %config.remote.url,
        "Starting {}",
        APP_NAME
    );

    let provider: Arc<dyn ViewProvider> = match config.remote.mode {
        RemoteMode::Http => Arc::new(HttpViewProvider::new(config.remote.url.clone(), config.remote.timeout())),
        RemoteMode::Bundled => Arc::new(BundledViewProvider::new()),
    };
    let remote_location = provider.location().to_string();
    let session = SessionContext::new(storage, AuthSettings::from(&config.auth));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(provider, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(session, remote_location, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context()) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    match state.screen {
        Screen::Login => draw_login(f, &state.login, area),
        Screen::Dashboard => draw_dashboard(f, state, area),
    }
}

// ----------------------------------------------------------------------------
// Login
// ----------------------------------------------------------------------------

fn draw_login(f: &mut Frame, login: &LoginRender, area: Rect) {
    let card = centered_rect(60, 80, area);
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" 🎵 {} ", APP_NAME)),
        card,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(2), // Subtitle
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(2), // Error / progress
            Constraint::Min(6),    // Demo credentials
        ])
        .split(card);

    let subtitle = Paragraph::new("Sign in to access your music library")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(subtitle, chunks[0]);

    let editing_username = login.active_field == LoginField::Username && !login.busy;
    let editing_password = login.active_field == LoginField::Password && !login.busy;

    let password = masked(login.password_len);
    f.render_widget(
        render_input(login.username.as_str(), " Username ", editing_username),
        chunks[1],
    );
    f.render_widget(render_input(password.as_str(), " Password ", editing_password), chunks[2]);

    let feedback = if login.busy {
        Line::from(Span::styled("Signing in...", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &login.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red).bold()))
    } else {
        hint_line(&[("Enter", "sign in"), ("Tab", "switch field"), ("Esc", "quit")])
    };
    f.render_widget(Paragraph::new(feedback).alignment(Alignment::Center), chunks[3]);

    let demo = vec![
        Line::from(Span::styled("Demo Credentials:", Style::default().bold())),
        Line::from(vec![
            Span::styled("Admin: ", Style::default().fg(Color::Red)),
            Span::raw("admin / admin123 "),
            Span::styled("(Can add/delete songs)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled("User: ", Style::default().fg(Color::Green)),
            Span::raw("user / user123 "),
            Span::styled("(Can view/filter songs)", Style::default().fg(Color::DarkGray)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(demo).block(Block::default().borders(Borders::TOP)),
        chunks[4],
    );

    // Cursor
    let (field_area, len) = match login.active_field {
        LoginField::Username => (chunks[1], login.username.chars().count()),
        LoginField::Password => (chunks[2], login.password_len),
    };
    if !login.busy {
        set_input_cursor(f, field_area, len);
    }
}

fn set_input_cursor(f: &mut Frame, area: Rect, len: usize) {
    let cursor_x = input_cursor_x(area, len);
    f.set_cursor_position(Position::new(cursor_x, area.y.saturating_add(1)));
}

// ----------------------------------------------------------------------------
// Dashboard
// ----------------------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Content header
            Constraint::Min(5),    // Library
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, chunks[0]);
    draw_content_header(f, state, chunks[1]);

    match &state.pane {
        PaneRender::Loading => draw_loading(f, chunks[2]),
        PaneRender::Ready(snapshot) => draw_library(f, snapshot, state.input_mode, chunks[2]),
        PaneRender::Failed {
            message,
            diagnostic,
            location,
        } => draw_fallback(f, message, diagnostic, location, chunks[2]),
    }

    draw_status_bar(f, state, chunks[3]);

    match state.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, area),
        Popup::ConfirmSignOut => draw_sign_out_popup(f, area),
        Popup::AddSong => {
            if let PaneRender::Ready(snapshot) = &state.pane {
                draw_add_song_popup(f, snapshot, area);
            }
        }
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(format!("🎵 {}", APP_NAME), Style::default().fg(Color::Cyan).bold()),
        Span::styled("  Micro Frontend Architecture Demo", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(title), halves[0]);

    let mut who = Vec::new();
    if let Some(user) = &state.user {
        who.push(Span::raw(format!("Welcome, {}! ", user.display_name)));
        who.push(role_badge(user.role));
    }
    who.push(Span::raw("  "));
    who.push(Span::styled("l", Style::default().fg(Color::Cyan).bold()));
    who.push(Span::raw(":sign out"));
    f.render_widget(Paragraph::new(Line::from(who)).alignment(Alignment::Right), halves[1]);
}

fn draw_content_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let hint = state.user.as_ref().map(|u| role_hint(u.role)).unwrap_or_default();
    let mut lines = vec![Line::from(vec![
        Span::styled("Music Library", Style::default().bold()),
        Span::styled(format!("  {}", hint), Style::default().fg(Color::Gray)),
    ])];
    if matches!(state.pane, PaneRender::Ready(_)) {
        lines.push(hint_line(&[("r", "refresh library")]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_loading(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Loading Music Library...", Style::default().fg(Color::Yellow).bold())),
    ];
    let loading = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn draw_fallback(f: &mut Frame, message: &str, diagnostic: &str, location: &str, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "The music library micro frontend could not be loaded.",
            Style::default().bold(),
        )),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Make sure the remote application is running at {}", location)),
        Line::from(""),
        Line::from(Span::styled("Diagnostic:", Style::default().fg(Color::Gray))),
    ];
    lines.extend(
        diagnostic
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::DarkGray)))),
    );
    lines.push(Line::from(""));
    lines.push(hint_line(&[("r", "retry"), ("p", "test remote entry")]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Music Library Unavailable ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_library(f: &mut Frame, snapshot: &LibrarySnapshot, input_mode: InputMode, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search + view controls
            Constraint::Length(1), // Results summary
            Constraint::Min(3),    // Songs
        ])
        .split(area);

    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let editing = input_mode == InputMode::Editing;
    let search = if snapshot.filter.is_empty() && !editing {
        Line::from(Span::styled(
            "Search by title, artist, album, genre, or year...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(snapshot.filter.as_str())
    };
    f.render_widget(render_input(search, " Search (/) ", editing), controls[0]);
    if editing {
        set_input_cursor(f, controls[0], snapshot.filter.chars().count());
    }

    let view = Line::from(vec![
        Span::raw("Sort: "),
        Span::styled(
            format!("{} {}", snapshot.sort_field.as_str(), snapshot.sort_direction.arrow()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("   Group: "),
        Span::styled(snapshot.group_field.as_str(), Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(
        Paragraph::new(view).block(Block::default().borders(Borders::ALL).title(" View (s/o/g) ")),
        controls[1],
    );

    let summary = match snapshot.results_summary() {
        Some(summary) => Line::from(vec![
            Span::styled(summary, Style::default().fg(Color::Gray)),
            Span::styled("  c:clear search", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(
            format!("{} songs", snapshot.total),
            Style::default().fg(Color::Gray),
        )),
    };
    f.render_widget(Paragraph::new(summary), chunks[1]);

    let title = if snapshot.is_admin() {
        " Songs (a:add d:delete) "
    } else {
        " Songs "
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if snapshot.match_count == 0 {
        let empty = if snapshot.filter.is_empty() {
            "No songs in the library."
        } else {
            "No songs found. Try a different search."
        };
        f.render_widget(
            Paragraph::new(empty).alignment(Alignment::Center).block(block),
            chunks[2],
        );
        return;
    }

    let show_headers = snapshot.group_field != GroupField::None;
    let mut items = Vec::new();
    let mut selected_row = None;
    let mut index = 0;
    for group in &snapshot.groups {
        if show_headers {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(group.name.clone(), Style::default().fg(Color::Magenta).bold()),
                Span::styled(format!(" ({})", group.songs.len()), Style::default().fg(Color::DarkGray)),
            ])));
        }
        for song in &group.songs {
            if index == snapshot.selected {
                selected_row = Some(items.len());
            }
            items.push(ListItem::new(song_line(song)));
            index += 1;
        }
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default();
    list_state.select(selected_row);
    f.render_stateful_widget(list, chunks[2], &mut list_state);
}

fn song_line(song: &Song) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>3} ", song.id), Style::default().fg(Color::DarkGray)),
        Span::styled(song.title.clone(), Style::default().bold()),
        Span::raw(format!(" - {}", song.artist)),
        Span::styled(
            format!("  {} · {} · {} · {}", song.album, song.genre, song.duration, song.year),
            Style::default().fg(Color::Gray),
        ),
    ])
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.input_mode == InputMode::Editing {
        hint_line(&[("Esc/Enter", "done"), ("Backspace", "delete")])
    } else {
        match state.pane {
            PaneRender::Loading => hint_line(&[("?", "help"), ("q", "quit")]),
            PaneRender::Failed { .. } => hint_line(&[("r", "retry"), ("p", "probe"), ("?", "help"), ("q", "quit")]),
            PaneRender::Ready(_) => hint_line(&[("/", "search"), ("↑/↓", "select"), ("?", "help"), ("q", "quit")]),
        }
    };

    let mut spans = hints.spans;
    if let Some(status) = &state.status {
        spans.push(Span::styled(format!("   {}", status), Style::default().fg(Color::Green)));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

// ----------------------------------------------------------------------------
// Popups
// ----------------------------------------------------------------------------

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 MUSIC DASHBOARD - Keyboard Shortcuts

 LIBRARY
   /                  Search (Esc/Enter to finish)
   c                  Clear search
   s                  Cycle sort field
   o                  Toggle sort order
   g                  Cycle grouping
   ↑ / ↓  (k / j)     Move selection
   r                  Refresh library

 ADMIN
   a                  Add a song
   d / Delete         Delete selected song

 REMOTE UNAVAILABLE
   r / Enter          Retry loading
   p                  Open the remote entry in a browser

 GENERAL
   l                  Sign out
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_sign_out_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(40, 20, area);

    let text = vec![
        Line::from(""),
        Line::from("Are you sure you want to sign out?"),
        Line::from(""),
        hint_line(&[("y", "sign out"), ("n", "cancel")]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign Out ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        popup_area,
    );
}

fn draw_add_song_popup(f: &mut Frame, snapshot: &LibrarySnapshot, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let mut lines = vec![Line::from("")];
    for field in DraftField::ALL {
        let active = snapshot.draft_field == Some(field);
        let label_style = if active {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if active { "▶ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<22}", marker, field.label()), label_style),
            Span::raw(snapshot.draft.field(field).to_string()),
            Span::styled(if active { "_" } else { "" }, Style::default().fg(Color::Yellow)),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(error) = &snapshot.form_error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red).bold())));
    }
    lines.push(hint_line(&[("Enter", "add song"), ("Tab/↑↓", "field"), ("Esc", "cancel")]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add New Song ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}
