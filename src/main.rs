//! Apex TUI - Actor-based API Explorer
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use apex_tui::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_FILE};
use apex_tui::messages::ui_events::{key_to_ui_event, AuthField, HeaderField, InputMode, OutputTab, Panel};
use apex_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use apex_tui::metrics::{format_duration, format_size, status_category};
use apex_tui::models::AuthenticationType;
use apex_tui::ui::{self, border_style, centered_rect, highlight_json, method_color, status_color};
use apex_tui::{AppActor, ConnectionPool, NetworkActor, Registry, Settings};

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
    let settings = Settings::load();
    let defaults = Settings::default();
    let active = settings.as_ref().unwrap_or(&defaults);

    // Initialize logging to file
    let log_dir = active
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_name = active
        .log_file
        .file_name()
        .unwrap_or(OsStr::new(DEFAULT_LOG_FILE));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %format!("{:#}", err), "Falling back to default settings");
            defaults
        }
    };
    info!(version = APP_VERSION, "Starting {}", APP_NAME);

    let mut registry = Registry::builtin()?;
    let extra_dir = settings.api_config_dir();
    match registry.extend_from_dir(&extra_dir) {
        Ok(0) => {}
        Ok(count) => info!(count, dir = %extra_dir.display(), "Loaded extra API configurations"),
        Err(err) => warn!(error = %err, "Skipping extra API configurations"),
    }
    let registry = Arc::new(registry);

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
    let pool = ConnectionPool::new(settings.pool_capacity, settings.pool_idle_timeout());
    let network_actor = NetworkActor::new(net_resp_tx, pool, settings.request_timeout());
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(registry, &settings, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    info!("Shutting down");
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
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(main_chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(state.api_names.len() as u16 + 2),
            Constraint::Min(5),
        ])
        .split(columns[0]);
    draw_api_list(f, state, left[0]);
    draw_endpoint_list(f, state, left[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Method + resolved URL
            Constraint::Length(10), // Params/Body/Headers/Auth
            Constraint::Min(5),     // Output
        ])
        .split(columns[1]);
    draw_url_bar(f, state, right[0]);
    draw_form_panels(f, state, right[1]);
    draw_output(f, state, right[2]);

    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let retry = if state.use_retry { "retry:on" } else { "retry:off" };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME.to_uppercase()),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::raw(" "),
        Span::styled(state.base_url.clone(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(retry, Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(state.language.display_name(), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_api_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Apis;
    let items: Vec<ListItem> = state
        .api_names
        .iter()
        .map(|name| ListItem::new(name.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(is_focused, false))
                .title(" APIs "),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_api));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_endpoint_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Endpoints;
    let items: Vec<ListItem> = state
        .endpoints
        .iter()
        .map(|ep| {
            let method_span = Span::styled(
                format!("{:6}", ep.method.as_str()),
                Style::default().fg(method_color(ep.method.as_str())).bold(),
            );
            let path_style = if ep.deprecated {
                Style::default().fg(Color::DarkGray).crossed_out()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                method_span,
                Span::styled(format!(" {}", ep.path), path_style),
            ]))
        })
        .collect();

    let title = format!(" Endpoints ({}) ", state.endpoints.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(is_focused, false))
                .title(title)
                .title_bottom(Line::from(format!(" {} ", state.endpoint_description)).left_aligned()),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bold());

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_endpoint));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_url_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let method = state.method.map(|m| m.as_str()).unwrap_or("-");
    let loading = if state.is_loading { " [...]" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {}{} ", method, loading))
        .title_style(Style::default().fg(method_color(method)).bold());

    f.render_widget(Paragraph::new(state.url_preview.as_str()).block(block), area);
}

fn draw_form_panels(f: &mut Frame, state: &RenderState, area: Rect) {
    let tabs_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let selected_tab = match state.active_panel {
        Panel::Body => 1,
        Panel::Headers => 2,
        Panel::Auth => 3,
        _ => 0,
    };
    let tabs = ui::render_tabs(&["Params", "Body", "Headers", "Auth"], selected_tab);
    f.render_widget(tabs, tabs_area[0]);

    let content_area = tabs_area[1];
    match state.active_panel {
        Panel::Body => draw_body_panel(f, state, content_area),
        Panel::Headers => draw_headers_panel(f, state, content_area),
        Panel::Auth => draw_auth_panel(f, state, content_area),
        _ => draw_params_panel(f, state, content_area),
    }
}

fn editing(state: &RenderState, panel: Panel) -> bool {
    state.active_panel == panel && state.input_mode == InputMode::Editing
}

fn set_cursor(f: &mut Frame, area: Rect, col: usize, row: usize) {
    let max_x = area.x + area.width.saturating_sub(2);
    let max_y = area.y + area.height.saturating_sub(2);
    let x = (area.x + 1 + col as u16).min(max_x);
    let y = (area.y + 1 + row as u16).min(max_y);
    f.set_cursor_position(Position::new(x, y));
}

fn draw_params_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Params;
    if state.params.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(is_focused, false))
            .title(" Params ");
        let hint = Paragraph::new("This endpoint declares no path, query or header parameters")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let selected = is_focused.then_some(state.selected_param);
    let list = ui::render_param_list(&state.params, selected, is_focused, editing(state, Panel::Params));
    f.render_widget(list, area);

    if editing(state, Panel::Params) {
        if let Some(param) = state.params.get(state.selected_param) {
            // "{location:6} {name}{marker}: "
            let offset = 7 + param.name.len() + 3;
            set_cursor(f, area, offset + state.cursor_position, state.selected_param);
        }
    }
}

fn draw_body_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Body;
    let title = if state.body_allowed {
        " Body (JSON, sent as text when not JSON) "
    } else {
        " Body (not sent for this method) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, editing(state, Panel::Body)))
        .title(title);

    let body = Paragraph::new(highlight_json(&state.body_text))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);

    if editing(state, Panel::Body) {
        let before = &state.body_text[..state.cursor_position.min(state.body_text.len())];
        let row = before.matches('\n').count();
        let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0);
        set_cursor(f, area, col, row);
    }
}

fn draw_headers_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Headers;

    let items: Vec<ListItem> = state
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let style = if !h.enabled {
                Style::default().fg(Color::DarkGray)
            } else if is_focused && i == state.selected_header {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default()
            };
            let prefix = if h.enabled { "[x]" } else { "[ ]" };
            ListItem::new(format!("{} {}: {}", prefix, h.key, h.value)).style(style)
        })
        .collect();

    let title = if items.is_empty() {
        " Headers (a:add) "
    } else {
        " Headers (a:add d:del e:edit Enter:toggle) "
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(is_focused, editing(state, Panel::Headers)))
            .title(title),
    );
    f.render_widget(list, area);

    if editing(state, Panel::Headers) {
        if let Some(header) = state.headers.get(state.selected_header) {
            let offset = match state.header_field {
                HeaderField::Key => 4,
                HeaderField::Value => 4 + header.key.len() + 2,
            };
            set_cursor(f, area, offset + state.cursor_position, state.selected_header);
        }
    }
}

fn draw_auth_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Auth;
    let auth = &state.auth;
    let shown = |s: &str| if s.is_empty() { String::from("<empty>") } else { s.to_string() };

    let mut lines = Vec::new();
    let mut cursor_row = 0;
    let label_width;
    match auth.auth_type {
        AuthenticationType::None => {
            lines.push(Line::from("No authentication. Press 't' to cycle auth type."));
            label_width = 0;
        }
        AuthenticationType::Basic => {
            let masked = if auth.password.is_empty() {
                String::from("<empty>")
            } else {
                "*".repeat(auth.password.chars().count())
            };
            lines.push(Line::from(format!("User: {}", shown(&auth.username))));
            lines.push(Line::from(format!("Pass: {}", masked)));
            cursor_row = usize::from(state.auth_field == AuthField::Password);
            label_width = 6;
        }
        _ => {
            lines.push(Line::from(format!("Token: {}", shown(&auth.token))));
            label_width = 7;
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, editing(state, Panel::Auth)))
        .title(format!(" Auth: {} (t:cycle e:edit) ", auth.auth_type.as_str()));
    f.render_widget(Paragraph::new(lines).block(block), area);

    if editing(state, Panel::Auth) {
        set_cursor(f, area, label_width + state.cursor_position, cursor_row);
    }
}

fn draw_output(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let titles: Vec<&str> = OutputTab::ALL.iter().map(|t| t.title()).collect();
    f.render_widget(ui::render_tabs(&titles, state.output_tab.index()), chunks[0]);

    match state.output_tab {
        OutputTab::Response => draw_response(f, state, chunks[1]),
        OutputTab::Code => draw_code(f, state, chunks[1]),
        OutputTab::Metrics => draw_metrics(f, state, chunks[1]),
        OutputTab::History => draw_history(f, state, chunks[1]),
    }
}

fn output_block(state: &RenderState) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state.active_panel == Panel::Output, false))
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    if !state.validation_errors.is_empty() {
        let lines: Vec<Line> = state
            .validation_errors
            .iter()
            .map(|e| {
                Line::from(vec![
                    Span::styled(format!("{}: ", e.field), Style::default().fg(Color::Red).bold()),
                    Span::raw(e.message.clone()),
                ])
            })
            .collect();
        let block = output_block(state).title(Span::styled(
            " Validation failed ",
            Style::default().fg(Color::Red).bold(),
        ));
        f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
        return;
    }

    let Some(result) = &state.last_result else {
        let block = output_block(state).title(" Response ");
        let hint = Paragraph::new("Press 's' to send, 'b' to batch all endpoints, 'p' to probe the API")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let code = result.metrics.status;
    let title = Span::styled(
        format!(" {} {} ", code, result.metrics.status_text),
        Style::default().fg(status_color(code)).bold(),
    );
    let mut footer = format!(" {}", format_duration(result.metrics.duration_ms as f64));
    if let Some(size) = result.metrics.size {
        footer.push_str(&format!(" | {}", format_size(size)));
    }
    if result.metrics.cached {
        footer.push_str(" | cached");
    }
    footer.push(' ');

    let mut lines = Vec::new();
    if let Some(error) = result.response.as_ref().and_then(|r| r.error.as_ref()) {
        lines.push(Line::from(Span::styled(
            format!("{} ({}): {}", status_category(code).label(), error.code, error.message),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    } else if let Some(error) = &result.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    if let Some(response) = &result.response {
        lines.extend(highlight_json(&response.body.to_display_string()));
    }

    let block = output_block(state)
        .title(title)
        .title_bottom(Line::from(footer).right_aligned());
    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.output_scroll, 0));
    f.render_widget(response, area);
}

fn draw_code(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = output_block(state).title(format!(
        " {} (g:generate l:next language) ",
        state.language.display_name()
    ));
    let content = if state.generated_code.is_empty() {
        Paragraph::new("Press 'g' to generate a snippet for the current request")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(state.generated_code.as_str())
    };
    f.render_widget(content.block(block).scroll((state.output_scroll, 0)), area);
}

fn draw_metrics(f: &mut Frame, state: &RenderState, area: Rect) {
    let summary = &state.metrics.summary;
    let block = output_block(state).title(" Metrics (x:export JSON X:export CSV) ");

    if summary.total_requests == 0 {
        let hint = Paragraph::new("No requests yet this session")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let label = |s: &str| Span::styled(format!("{:<14}", s), Style::default().fg(Color::DarkGray));
    let mut lines = vec![
        Line::from(vec![
            label("Requests"),
            Span::raw(format!(
                "{} total, {} ok, {} failed",
                summary.total_requests, summary.successful_requests, summary.failed_requests
            )),
        ]),
        Line::from(vec![
            label("Error rate"),
            Span::raw(format!("{:.1}%", summary.error_rate)),
        ]),
        Line::from(vec![
            label("Duration"),
            Span::raw(format!(
                "avg {}  min {}  max {}",
                format_duration(summary.average_duration as f64),
                format_duration(summary.min_duration as f64),
                format_duration(summary.max_duration as f64)
            )),
        ]),
        Line::from(vec![
            label("Percentiles"),
            Span::raw(format!(
                "p50 {}  p95 {}  p99 {}",
                format_duration(summary.p50_duration as f64),
                format_duration(summary.p95_duration as f64),
                format_duration(summary.p99_duration as f64)
            )),
        ]),
        Line::from(vec![
            label("Rate"),
            Span::raw(format!("{:.2} req/s", state.metrics.request_rate)),
        ]),
        Line::from(""),
    ];

    for (status, count) in &summary.status_codes {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>5} ", status), Style::default().fg(status_color(*status)).bold()),
            Span::raw(format!("{:<14} {}", status_category(*status).label(), count)),
        ]));
    }

    if !state.metrics.time_groups.is_empty() {
        lines.push(Line::from(""));
        for group in &state.metrics.time_groups {
            lines.push(Line::from(Span::styled(
                format!(
                    "{}  {} req  avg {}  {:.0}% ok",
                    group.timestamp,
                    group.count,
                    format_duration(group.avg_duration as f64),
                    group.success_rate
                ),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines).block(block).scroll((state.output_scroll, 0)), area);
}

fn draw_history(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .history
        .iter()
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", row.time), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:6}", row.method.as_str()),
                    Style::default().fg(method_color(row.method.as_str())),
                ),
                Span::styled(format!(" {:>3} ", row.status), Style::default().fg(status_color(row.status))),
                Span::raw(format!("{:>7} ", format_duration(row.duration_ms as f64))),
                Span::raw(row.endpoint_id.clone()),
            ]))
        })
        .collect();

    let block = output_block(state).title(format!(
        " History ({}) Enter:show C:clear ",
        state.history.len()
    ));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold());

    let mut list_state = ListState::default();
    if !state.history.is_empty() {
        list_state.select(Some(state.selected_history));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.is_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field "
    } else {
        " Tab:panel | e:edit | s:send | g:code | o:output | ?:help | q:quit "
    };

    let line = Line::from(vec![
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" {}", state.status_message), Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);

    let help_text = r#"
 APEX TUI - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   Up / Down (j/k)    Select API, endpoint, param, header or history entry
   o                  Next output tab (Response/Code/Metrics/History)

 REQUEST
   s                  Validate and send request
   b                  Send every endpoint of the API concurrently
   p                  Probe the API base URL
   r                  Toggle retry with linear backoff
   R                  Reset parameters to endpoint defaults
   e / Enter          Edit current field

 HEADERS
   a / d              Add / delete custom header
   Enter              Toggle header enabled

 AUTH
   t                  Cycle auth type
   Tab                Switch between username/password

 OUTPUT
   g / l              Generate code / next language
   x / X              Export metrics as JSON / CSV
   C                  Clear history

 GENERAL
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
