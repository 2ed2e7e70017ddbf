//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AppTab {
    #[default]
    Showcase,
    Admin,
}

/// Sections of the public showcase
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum ShowcaseSection {
    #[default]
    Home,
    Exhibits,
    Tours,
    About,
}

impl ShowcaseSection {
    pub const ALL: [ShowcaseSection; 4] = [
        ShowcaseSection::Home,
        ShowcaseSection::Exhibits,
        ShowcaseSection::Tours,
        ShowcaseSection::About,
    ];

    pub fn next(&self) -> ShowcaseSection {
        match self {
            ShowcaseSection::Home => ShowcaseSection::Exhibits,
            ShowcaseSection::Exhibits => ShowcaseSection::Tours,
            ShowcaseSection::Tours => ShowcaseSection::About,
            ShowcaseSection::About => ShowcaseSection::Home,
        }
    }

    pub fn prev(&self) -> ShowcaseSection {
        match self {
            ShowcaseSection::Home => ShowcaseSection::About,
            ShowcaseSection::Exhibits => ShowcaseSection::Home,
            ShowcaseSection::Tours => ShowcaseSection::Exhibits,
            ShowcaseSection::About => ShowcaseSection::Tours,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ShowcaseSection::Home => "Home",
            ShowcaseSection::Exhibits => "Exhibits",
            ShowcaseSection::Tours => "Virtual Tours",
            ShowcaseSection::About => "About",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ShowcaseSection::Home => 0,
            ShowcaseSection::Exhibits => 1,
            ShowcaseSection::Tours => 2,
            ShowcaseSection::About => 3,
        }
    }
}

/// Login dialog input
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),

    // Showcase
    NextSection,
    PrevSection,
    OpenLogin,
    CloseLogin,
    LoginNextField,
    LoginChar(char),
    LoginBackspace,

    // Admin list
    SwitchResource,
    SelectNext,
    SelectPrev,
    NewRecord,
    EditSelected,
    DeleteSelected,
    Refresh,

    // Delete prompt
    ConfirmDelete,
    DeclineDelete,

    // Edit dialog
    DialogNextField,
    DialogPrevField,
    DialogChar(char),
    DialogBackspace,
    DialogCursorLeft,
    DialogCursorRight,
    SubmitDialog,
    CancelDialog,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// The parts of the render state that decide how a key is interpreted
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub active_tab: AppTab,
    pub show_help: bool,
    pub show_login: bool,
    pub dialog_open: bool,
    pub confirm_open: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('s') if ctx.dialog_open => return Some(UiEvent::SubmitDialog),
            _ => {}
        }
    }

    // Popups first, innermost wins
    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if ctx.confirm_open {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(UiEvent::ConfirmDelete),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(UiEvent::DeclineDelete),
            _ => None,
        };
    }

    if ctx.dialog_open {
        return handle_dialog_keys(key);
    }

    if ctx.show_login {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::CloseLogin),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Enter => Some(UiEvent::LoginNextField),
            KeyCode::Backspace => Some(UiEvent::LoginBackspace),
            KeyCode::Char(c) => Some(UiEvent::LoginChar(c)),
            _ => None,
        };
    }

    // Screen switching and global keys
    match key.code {
        KeyCode::Char('1') => return Some(UiEvent::SwitchTab(AppTab::Showcase)),
        KeyCode::Char('2') => return Some(UiEvent::SwitchTab(AppTab::Admin)),
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        _ => {}
    }

    match ctx.active_tab {
        AppTab::Showcase => handle_showcase_keys(key),
        AppTab::Admin => handle_admin_keys(key),
    }
}

fn handle_showcase_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Right | KeyCode::Tab => Some(UiEvent::NextSection),
        KeyCode::Left | KeyCode::BackTab => Some(UiEvent::PrevSection),
        KeyCode::Char('l') => Some(UiEvent::OpenLogin),
        _ => None,
    }
}

fn handle_admin_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => Some(UiEvent::SwitchResource),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Char('n') | KeyCode::Char('a') => Some(UiEvent::NewRecord),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::EditSelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteSelected),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

fn handle_dialog_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::CancelDialog),
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => Some(UiEvent::DialogNextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::DialogPrevField),
        KeyCode::Left => Some(UiEvent::DialogCursorLeft),
        KeyCode::Right => Some(UiEvent::DialogCursorRight),
        KeyCode::Backspace => Some(UiEvent::DialogBackspace),
        KeyCode::Char(c) => Some(UiEvent::DialogChar(c)),
        _ => None,
    }
}
