//! Splitmon - Actor-based bill splitting client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - owns the roster and selection, processes intents
//! - Network Layer (Tokio) - async REST exchanges with the backend

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use splitmon::config::{CliArgs, Settings};
use splitmon::constants::APP_NAME;
use splitmon::messages::ui_events::{key_to_ui_event, AddField, InputMode, Panel, SplitField};
use splitmon::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use splitmon::ui::{payer_label, render_input, render_roster};
use splitmon::{AppActor, AppState, NetworkActor};

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
    let cli = CliArgs::parse();
    let settings = Settings::from_cli(&cli).context("loading settings")?;

    // Initialize logging to file; stdout belongs to the terminal UI
    let log_dir = settings
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = settings
        .log_file
        .file_name()
        .context("log file path has no file name")?;
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    tracing::info!(api_url = %settings.api_url, timeout = ?settings.timeout, "Starting");

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
    let network_actor = NetworkActor::new(&settings, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::from_settings(&settings), net_cmd_tx, render_tx);
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
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
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

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, main_chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    draw_sidebar(f, state, columns[0]);

    if let Some(friend) = &state.selected {
        draw_split_form(f, state, &friend.name, columns[1]);
    } else {
        let hint = Paragraph::new("Select a friend to split a bill.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(hint, columns[1]);
    }

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let header = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::styled(format!(" {} ", state.api_url), Style::default().fg(Color::DarkGray)),
        Span::styled(
            if state.is_loading() { "[...]" } else { "" },
            Style::default().fg(Color::Yellow),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn draw_sidebar(f: &mut Frame, state: &RenderState, area: Rect) {
    let constraints = if state.show_add_friend {
        vec![Constraint::Min(3), Constraint::Length(8)]
    } else {
        vec![Constraint::Min(3)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let selected_id = state.selected.as_ref().map(|f| f.id.as_str());
    let roster = render_roster(&state.friends, selected_id, state.active_panel == Panel::Roster);
    let mut list_state = ListState::default()
        .with_selected((!state.friends.is_empty()).then_some(state.roster_cursor));
    f.render_stateful_widget(roster, chunks[0], &mut list_state);

    if state.show_add_friend {
        draw_add_form(f, state, chunks[1]);
    }
}

fn draw_add_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let focused = state.active_panel == Panel::AddFriend;
    let editing = focused && state.input_mode == InputMode::Editing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { Style::default().fg(Color::Cyan) } else { Style::default() })
        .title(" Add Friend (s add, a close) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(inner);

    let name_active = focused && state.add_field == AddField::Name;
    let image_active = focused && state.add_field == AddField::Image;
    f.render_widget(
        render_input(&state.add_name, " Friend Name ", name_active, editing && name_active),
        rows[0],
    );
    f.render_widget(
        render_input(&state.add_image, " Image Url ", image_active, editing && image_active),
        rows[1],
    );
}

fn draw_split_form(f: &mut Frame, state: &RenderState, friend_name: &str, area: Rect) {
    let focused = state.active_panel == Panel::SplitBill;
    let editing = focused && state.input_mode == InputMode::Editing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { Style::default().fg(Color::Cyan) } else { Style::default() })
        .title(format!(" Split a bill with {} ", friend_name));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let active = |field: SplitField| focused && state.split_field == field;
    f.render_widget(
        render_input(&state.bill_input, " Bill value ", active(SplitField::Bill), editing && active(SplitField::Bill)),
        rows[0],
    );
    f.render_widget(
        render_input(&state.paid_input, " Your expense ", active(SplitField::Paid), editing && active(SplitField::Paid)),
        rows[1],
    );
    let friend_title = format!(" {}'s Expense ", friend_name);
    f.render_widget(render_input(&state.friend_expense, &friend_title, false, false), rows[2]);

    let payer = payer_label(state.payer, friend_name);
    f.render_widget(
        render_input(&payer, " Who is Paying the Bill? (p toggle) ", active(SplitField::Payer), false),
        rows[3],
    );
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(error) = &state.last_error {
        let bar = Paragraph::new(format!(" {} (x dismiss) ", error)).style(Style::default().fg(Color::Red));
        f.render_widget(bar, area);
        return;
    }

    let status = if state.is_loading() {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Tab:next field | Enter:submit "
    } else {
        " Tab:panel | ↑/↓:move | Enter:select | d:delete | a:add | s:submit | r:reload | ?:help | q:quit "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 SPLITMON - Keyboard Shortcuts

 FRIENDS
   ↑ / ↓  (j / k)     Move through friends
   Enter / Space      Select / close friend
   d                  Delete friend
   a                  Open / close add form
   r                  Reload from server

 FORMS
   Tab / Shift+Tab    Switch panels
   ↑ / ↓              Previous / next field
   e / Enter          Edit field
   p                  Toggle who paid
   s                  Submit form

 GENERAL
   x                  Dismiss error
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block);
    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
