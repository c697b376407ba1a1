//! Render state - data structure sent from App layer to UI for rendering

use crate::constants::{DEFAULT_API_BASE, DEFAULT_AVATAR_URL};
use crate::messages::ui_events::{AddField, InputMode, Panel, SplitField};
use crate::models::{Friend, Payer};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Roster
    pub friends: Vec<Friend>,
    pub selected: Option<Friend>,
    pub roster_cursor: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,

    // Add-friend form
    pub show_add_friend: bool,
    pub add_name: String,
    pub add_image: String,
    pub add_field: AddField,

    // Split-bill form
    pub bill_input: String,
    pub paid_input: String,
    /// Derived friend's share, empty while no bill is entered
    pub friend_expense: String,
    pub payer: Payer,
    pub split_field: SplitField,

    // Status
    pub pending_requests: usize,
    pub last_error: Option<String>,
    pub api_url: String,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    pub fn is_loading(&self) -> bool {
        self.pending_requests > 0
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            friends: Vec::new(),
            selected: None,
            roster_cursor: 0,
            active_panel: Panel::Roster,
            input_mode: InputMode::Normal,
            show_add_friend: false,
            add_name: String::new(),
            add_image: String::from(DEFAULT_AVATAR_URL),
            add_field: AddField::Name,
            bill_input: String::new(),
            paid_input: String::new(),
            friend_expense: String::new(),
            payer: Payer::User,
            split_field: SplitField::Bill,
            pending_requests: 0,
            last_error: None,
            api_url: String::from(DEFAULT_API_BASE),
            show_help: false,
        }
    }
}
