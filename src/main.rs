//! Museum TUI - Actor-based museum client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls to the collection endpoints

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use museum_tui::app::dialog::{DialogMode, DialogPhase, DialogState};
use museum_tui::catalog::{self, FEATURED_EXHIBITS, FEATURED_TOURS};
use museum_tui::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_FILE};
use museum_tui::messages::ui_events::{key_to_ui_event, AppTab, LoginField, ShowcaseSection};
use museum_tui::models::Resource;
use museum_tui::ui::{centered_rect, masked, panel_block, render_input, render_tabs, toast_color, truncate};
use museum_tui::{
    ApiClient, AppActor, AppState, Config, NetworkActor, NetworkCommand, NetworkResponse,
    RenderState, UiEvent,
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
    let (config, config_err) = Config::load();

    // Initialize logging to file; the terminal belongs to the UI
    let log_path = Path::new(&config.log_file);
    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = log_path.file_name().unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    if let Some(e) = config_err {
        tracing::warn!(error = %format!("{:#}", e), "Ignoring config file, using defaults");
    }
    tracing::info!(
        exhibits = %config.exhibits_api,
        tours = %config.tours_api,
        policy = ?config.refresh_policy,
        "Starting {} {}",
        APP_NAME,
        APP_VERSION
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(ApiClient::from_config(&config), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let state = AppState::new(config.refresh_policy, config.toast_ttl());
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

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

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    match state.active_tab {
        AppTab::Showcase => draw_showcase(f, state, main_chunks[1]),
        AppTab::Admin => draw_admin(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if state.show_login {
        draw_login_popup(f, state, area);
    }
    if state.dialog.is_open() {
        draw_edit_dialog(f, state, area);
    }
    if state.confirm.is_some() {
        draw_confirm_popup(f, state, area);
    }
    if state.show_help {
        draw_help_popup(f, area);
    }

    draw_toasts(f, state, area);
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let tab = |label: &'static str, active: bool, color: Color| {
        Span::styled(
            label,
            if active {
                Style::default().fg(Color::Black).bg(color).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        )
    };

    let tabs = vec![
        Span::styled(format!(" 🏛 {} ", APP_NAME), Style::default().fg(Color::Yellow).bold()),
        tab(" 1:Showcase ", state.active_tab == AppTab::Showcase, Color::Yellow),
        Span::raw(" "),
        tab(" 2:Admin ", state.active_tab == AppTab::Admin, Color::Cyan),
    ];

    f.render_widget(Paragraph::new(Line::from(tabs)), area);
}

// ----------------------------------------------------------------------------
// Showcase
// ----------------------------------------------------------------------------

fn draw_showcase(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let titles: Vec<&str> = ShowcaseSection::ALL.iter().map(|s| s.title()).collect();
    f.render_widget(render_tabs(&titles, state.section.index()), chunks[0]);

    match state.section {
        ShowcaseSection::Home => draw_home(f, chunks[1]),
        ShowcaseSection::Exhibits => draw_featured_exhibits(f, chunks[1]),
        ShowcaseSection::Tours => draw_featured_tours(f, chunks[1]),
        ShowcaseSection::About => draw_about(f, chunks[1]),
    }
}

fn draw_home(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} ", catalog::HERO_BADGE),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(catalog::HERO_TITLE, Style::default().fg(Color::White).bold())),
        Line::from(""),
        Line::from(Span::styled(catalog::HERO_TAGLINE, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(Span::styled(
            "→ Exhibits    → Virtual tours    l: Sign in",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let hero = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(hero, area);
}

fn draw_featured_exhibits(f: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (exhibit, column) in FEATURED_EXHIBITS.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(exhibit.period, Style::default().fg(Color::Yellow))),
            Line::from(""),
            Line::from(exhibit.description),
            Line::from(""),
            Line::from(Span::styled(exhibit.image_url(), Style::default().fg(Color::DarkGray))),
        ];
        let card = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel_block(format!(" {} ", exhibit.title), false));
        f.render_widget(card, *column);
    }
}

fn draw_featured_tours(f: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (tour, column) in FEATURED_TOURS.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(format!("⏱  {}", tour.duration)),
            Line::from(format!("👁  {} viewers", tour.viewers)),
            Line::from(""),
            Line::from(Span::styled("▶ Start tour", Style::default().fg(Color::Cyan))),
        ];
        let card = Paragraph::new(lines).block(panel_block(format!(" {} ", tour.title), false));
        f.render_widget(card, *column);
    }
}

fn draw_about(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let motto = Paragraph::new(Line::from(vec![
        Span::styled(format!("{}  ", APP_NAME), Style::default().fg(Color::Yellow).bold()),
        Span::raw(catalog::MOTTO),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(motto, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[1]);

    for ((heading, entries), column) in catalog::FOOTER.iter().zip(columns.iter()) {
        let items: Vec<ListItem> = entries.iter().map(|e| ListItem::new(*e)).collect();
        let list = List::new(items).block(
            Block::default()
                .title(Span::styled(*heading, Style::default().bold()))
                .padding(Padding::horizontal(1)),
        );
        f.render_widget(list, *column);
    }

    let copyright = Paragraph::new(format!("© 2024 {}. All rights reserved.", APP_NAME))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(copyright, chunks[2]);
}

// ----------------------------------------------------------------------------
// Admin
// ----------------------------------------------------------------------------

fn draw_admin(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let selected_tab = match state.resource {
        Resource::Exhibits => 0,
        Resource::Tours => 1,
    };
    let exhibits_title = format!("Exhibits ({})", state.exhibits.len());
    let tours_title = format!("Tours ({})", state.tours.len());
    f.render_widget(
        render_tabs(&[exhibits_title.as_str(), tours_title.as_str()], selected_tab),
        chunks[0],
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    draw_record_list(f, state, body[0]);
    draw_record_detail(f, state, body[1]);
}

fn draw_record_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let (items, selected): (Vec<ListItem>, usize) = match state.resource {
        Resource::Exhibits => (
            state
                .exhibits
                .iter()
                .map(|e| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("#{:<4}", e.id), Style::default().fg(Color::DarkGray)),
                        Span::raw(truncate(&e.title, 40)),
                    ]))
                })
                .collect(),
            state.selected_exhibit,
        ),
        Resource::Tours => (
            state
                .tours
                .iter()
                .map(|t| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("#{:<4}", t.id), Style::default().fg(Color::DarkGray)),
                        Span::raw(truncate(&t.title, 40)),
                        Span::styled(format!("  {} min", t.duration_minutes), Style::default().fg(Color::Cyan)),
                    ]))
                })
                .collect(),
            state.selected_tour,
        ),
    };

    let loading = if state.is_loading() { " [...]" } else { "" };
    let block = panel_block(format!(" {}{} ", state.resource.label(), loading), true);

    if items.is_empty() {
        let hint = if state.is_loading() {
            "Loading...".to_string()
        } else {
            format!("No {} yet. Press 'n' to add one.", state.resource.as_str())
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(Some(selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_record_detail(f: &mut Frame, state: &RenderState, area: Rect) {
    let field = |label: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
            Span::raw(if value.is_empty() { "—".to_string() } else { value.to_string() }),
        ])
    };

    let lines: Vec<Line> = match state.resource {
        Resource::Exhibits => match state.exhibits.get(state.selected_exhibit) {
            Some(e) => vec![
                field("Title", &e.title),
                field("Period", &e.period),
                field("Category", &e.category),
                field("Location", &e.location),
                field("Image", &e.image_url),
                Line::from(""),
                Line::from(e.description.clone()),
            ],
            None => Vec::new(),
        },
        Resource::Tours => match state.tours.get(state.selected_tour) {
            Some(t) => vec![
                field("Title", &t.title),
                field("Duration", &format!("{} min", t.duration_minutes)),
                field("Viewers", &t.viewers_count.to_string()),
                field("Category", &t.category),
                field("Video", &t.video_url),
                field("Thumbnail", &t.thumbnail_url),
                Line::from(""),
                Line::from(t.description.clone()),
            ],
            None => Vec::new(),
        },
    };

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel_block(" Details (n:new e:edit d:delete r:refresh) ", false));
    f.render_widget(detail, area);
}

// ----------------------------------------------------------------------------
// Popups
// ----------------------------------------------------------------------------

fn draw_edit_dialog(f: &mut Frame, state: &RenderState, area: Rect) {
    let DialogState::Open { mode, form, phase } = &state.dialog else {
        return;
    };

    let popup_area = centered_rect(70, 85, area);
    let title = match mode {
        DialogMode::Creating => format!(" Add {} ", form.resource.singular()),
        DialogMode::Editing(id) => format!(" Edit {} #{} ", form.resource.singular(), id),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.selected;
        f.render_widget(render_input(field.label, &field.value, focused), rows[i]);

        if focused && !matches!(phase, DialogPhase::Submitting(_)) {
            let row = rows[i];
            let max_x = row.x + row.width.saturating_sub(2);
            let cursor_cols = field.value[..form.cursor_position.min(field.value.len())].chars().count() as u16;
            let cursor_x = (row.x + cursor_cols + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, row.y + 1));
        }
    }

    let footer = match phase {
        DialogPhase::Editing => Line::from(Span::styled(
            "Ctrl+S save | Tab next field | Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
        DialogPhase::Submitting(_) => Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow))),
        DialogPhase::Failed(message) => Line::from(vec![
            Span::styled(format!("✗ {}", message), Style::default().fg(Color::Red)),
            Span::styled("  (Ctrl+S to retry)", Style::default().fg(Color::DarkGray)),
        ]),
    };
    f.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), rows[form.fields.len()]);
}

fn draw_confirm_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(pending) = &state.confirm else {
        return;
    };
    let popup_area = centered_rect(50, 20, area);

    let text = vec![
        Line::from(format!("Delete this {}?", pending.resource.singular())),
        Line::from(Span::styled(
            format!("#{} {}", pending.record_id, pending.title),
            Style::default().bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Delete", Style::default().fg(Color::Red).bold()),
            Span::raw("   "),
            Span::styled("[n] Cancel", Style::default().fg(Color::Gray)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Confirm ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        popup_area,
    );
}

fn draw_login_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(50, 45, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign in to your account ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let email = if state.login_email.is_empty() {
        "your@email.com".to_string()
    } else {
        state.login_email.clone()
    };
    let password = masked(state.login_password_len);

    f.render_widget(
        render_input("Email", &email, state.login_field == LoginField::Email),
        rows[0],
    );
    f.render_widget(
        render_input("Password", &password, state.login_field == LoginField::Password),
        rows[1],
    );

    let note = Paragraph::new("Sign-in is not available yet.\nTab: next field | Esc: close")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(note, rows[2]);
}

fn draw_toasts(f: &mut Frame, state: &RenderState, area: Rect) {
    let width = area.width.min(48);
    for (i, toast) in state.toasts.iter().rev().enumerate() {
        let y = area.y + 1 + (i as u16) * 3;
        if y + 3 > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width), y, width, 3);
        let color = toast_color(toast.kind);
        let widget = Paragraph::new(truncate(&toast.message, width.saturating_sub(4) as usize))
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(Color::Black)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(widget, rect);
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.dialog.is_open() {
        " Ctrl+S:save | Tab/↑↓:field | ←→:cursor | Esc:cancel "
    } else if state.confirm.is_some() {
        " y:delete | n:cancel "
    } else if state.show_login {
        " Tab:next field | Esc:close "
    } else {
        match state.active_tab {
            AppTab::Showcase => " ←→:section | l:sign in | 2:admin | ?:help | q:quit ",
            AppTab::Admin => " Tab:collection | ↑↓:select | n:new | e:edit | d:delete | r:refresh | 1:showcase | q:quit ",
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 MUSEUM - Keyboard Shortcuts

 GENERAL
   1 / 2              Showcase / Admin
   ?                  Toggle this help
   q / Ctrl+C         Quit

 SHOWCASE
   ← / → / Tab        Switch section
   l                  Sign in dialog

 ADMIN
   Tab                Exhibits / Tours
   ↑ / ↓              Select record
   n                  New record
   e / Enter          Edit selected
   d                  Delete selected (asks first)
   r                  Refresh list

 EDIT DIALOG
   Tab / ↓  ↑         Next / previous field
   Ctrl+S             Save
   Esc                Cancel

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
