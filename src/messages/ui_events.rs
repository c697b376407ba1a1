//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    CursorUp,
    CursorDown,

    // Roster intents
    SelectFriend,
    DeleteFriend,
    ToggleAddFriend,
    Reload,

    // Form editing
    NextField,
    PrevField,
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    TogglePayer,
    Submit,

    // Popups
    ToggleHelp,
    CloseHelp,
    DismissError,

    // System
    Quit,
}

/// Focused panel
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Panel {
    #[default]
    Roster,
    AddFriend,
    SplitBill,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Field of the add-friend form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AddField {
    #[default]
    Name,
    Image,
}

impl AddField {
    pub fn next(&self) -> AddField {
        match self {
            AddField::Name => AddField::Image,
            AddField::Image => AddField::Name,
        }
    }

    pub fn prev(&self) -> AddField {
        match self {
            AddField::Name => AddField::Image,
            AddField::Image => AddField::Name,
        }
    }
}

/// Field of the split-bill form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum SplitField {
    #[default]
    Bill,
    Paid,
    Payer,
}

impl SplitField {
    pub fn next(&self) -> SplitField {
        match self {
            SplitField::Bill => SplitField::Paid,
            SplitField::Paid => SplitField::Payer,
            SplitField::Payer => SplitField::Bill,
        }
    }

    pub fn prev(&self) -> SplitField {
        match self {
            SplitField::Bill => SplitField::Payer,
            SplitField::Paid => SplitField::Bill,
            SplitField::Payer => SplitField::Paid,
        }
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

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Normal => handle_normal_keys(key, active_panel),
    }
}

fn handle_normal_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    // Keys shared by every panel
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Char('a') => return Some(UiEvent::ToggleAddFriend),
        KeyCode::Char('r') => return Some(UiEvent::Reload),
        KeyCode::Char('x') => return Some(UiEvent::DismissError),
        KeyCode::Tab => return Some(UiEvent::NextPanel),
        KeyCode::BackTab => return Some(UiEvent::PrevPanel),
        _ => {}
    }

    match active_panel {
        Panel::Roster => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::CursorDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(UiEvent::SelectFriend),
            KeyCode::Char('d') => Some(UiEvent::DeleteFriend),
            _ => None,
        },
        Panel::AddFriend | Panel::SplitBill => match key.code {
            KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('p') if active_panel == Panel::SplitBill => Some(UiEvent::TogglePayer),
            KeyCode::Char('s') => Some(UiEvent::Submit),
            KeyCode::Esc => Some(UiEvent::NextPanel),
            _ => None,
        },
    }
}
