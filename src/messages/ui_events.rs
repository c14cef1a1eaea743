//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    Up,
    Down,
    Select,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    NextField,

    // Request actions
    SendRequest,
    SendBatch,
    ProbeApi,
    ToggleRetry,
    ResetParams,

    // Headers
    ToggleHeader,
    AddHeader,
    DeleteHeader,

    // Auth
    CycleAuth,

    // Output
    NextOutputTab,
    GenerateCode,
    CycleLanguage,
    ExportJson,
    ExportCsv,
    ClearHistory,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    Apis,
    #[default]
    Endpoints,
    Params,
    Body,
    Headers,
    Auth,
    Output,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Apis => Panel::Endpoints,
            Panel::Endpoints => Panel::Params,
            Panel::Params => Panel::Body,
            Panel::Body => Panel::Headers,
            Panel::Headers => Panel::Auth,
            Panel::Auth => Panel::Output,
            Panel::Output => Panel::Apis,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Apis => Panel::Output,
            Panel::Endpoints => Panel::Apis,
            Panel::Params => Panel::Endpoints,
            Panel::Body => Panel::Params,
            Panel::Headers => Panel::Body,
            Panel::Auth => Panel::Headers,
            Panel::Output => Panel::Auth,
        }
    }

    /// Panels whose content is typed into
    pub fn is_editable(&self) -> bool {
        matches!(self, Panel::Params | Panel::Body | Panel::Headers | Panel::Auth)
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Auth editing field
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AuthField {
    #[default]
    Token,
    Username,
    Password,
}

/// Header editing field
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HeaderField {
    Key,
    #[default]
    Value,
}

/// Tabs of the output pane
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputTab {
    #[default]
    Response,
    Code,
    Metrics,
    History,
}

impl OutputTab {
    pub const ALL: [OutputTab; 4] = [
        OutputTab::Response,
        OutputTab::Code,
        OutputTab::Metrics,
        OutputTab::History,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            OutputTab::Response => "Response",
            OutputTab::Code => "Code",
            OutputTab::Metrics => "Metrics",
            OutputTab::History => "History",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> OutputTab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => normal_mode_keys(key, active_panel),
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            KeyCode::Enter if active_panel == Panel::Body => Some(UiEvent::CharInput('\n')),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            _ => None,
        },
    }
}

fn normal_mode_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::Down),
        KeyCode::Enter => match active_panel {
            Panel::Apis | Panel::Endpoints | Panel::Output => Some(UiEvent::Select),
            Panel::Headers => Some(UiEvent::ToggleHeader),
            _ => Some(UiEvent::StartEditing),
        },
        KeyCode::Char('e') if active_panel.is_editable() => Some(UiEvent::StartEditing),
        KeyCode::Char('s') => Some(UiEvent::SendRequest),
        KeyCode::Char('b') => Some(UiEvent::SendBatch),
        KeyCode::Char('p') => Some(UiEvent::ProbeApi),
        KeyCode::Char('r') => Some(UiEvent::ToggleRetry),
        KeyCode::Char('R') => Some(UiEvent::ResetParams),
        KeyCode::Char('g') => Some(UiEvent::GenerateCode),
        KeyCode::Char('l') => Some(UiEvent::CycleLanguage),
        KeyCode::Char('o') => Some(UiEvent::NextOutputTab),
        KeyCode::Char('x') => Some(UiEvent::ExportJson),
        KeyCode::Char('X') => Some(UiEvent::ExportCsv),
        KeyCode::Char('C') => Some(UiEvent::ClearHistory),
        KeyCode::Char('a') if active_panel == Panel::Headers => Some(UiEvent::AddHeader),
        KeyCode::Char('d') if active_panel == Panel::Headers => Some(UiEvent::DeleteHeader),
        KeyCode::Char('t') if active_panel == Panel::Auth => Some(UiEvent::CycleAuth),
        _ => None,
    }
}
