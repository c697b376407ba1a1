//! App state - pure data structure with no I/O logic

use std::collections::HashMap;

use crate::config::Settings;
use crate::constants::{DEFAULT_API_BASE, DEFAULT_AVATAR_URL};
use crate::messages::ui_events::{AddField, InputMode, Panel, SplitField};
use crate::messages::{Operation, RenderState};
use crate::models::{format_amount, BillSplit, Friend};

/// Add-friend form inputs
#[derive(Clone, Debug)]
pub struct AddFriendForm {
    pub name: String,
    pub image: String,
    pub field: AddField,
    default_image: String,
}

impl AddFriendForm {
    pub fn new(default_image: impl Into<String>) -> Self {
        let default_image = default_image.into();
        AddFriendForm {
            name: String::new(),
            image: default_image.clone(),
            field: AddField::Name,
            default_image,
        }
    }

    /// Back to an empty name and the default avatar
    pub fn reset(&mut self) {
        self.name.clear();
        self.image = self.default_image.clone();
        self.field = AddField::Name;
    }

    pub fn current_input_mut(&mut self) -> &mut String {
        match self.field {
            AddField::Name => &mut self.name,
            AddField::Image => &mut self.image,
        }
    }
}

/// Split-bill form inputs. The text fields mirror `split`.
#[derive(Clone, Debug, Default)]
pub struct SplitForm {
    pub bill_input: String,
    pub paid_input: String,
    pub split: BillSplit,
    pub field: SplitField,
}

impl SplitForm {
    pub fn reset(&mut self) {
        *self = SplitForm::default();
    }
}

/// A request the state has issued and not yet seen answered
#[derive(Clone, Debug, PartialEq)]
pub struct PendingRequest {
    pub operation: Operation,
    /// Target of a split or delete
    pub friend_id: Option<String>,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    // Roster mirrored from the store
    pub friends: Vec<Friend>,
    /// Identifier of the friend targeted by the split form
    pub selected: Option<String>,
    pub roster_cursor: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub show_add_friend: bool,
    pub show_help: bool,

    // Forms
    pub add_form: AddFriendForm,
    pub split_form: SplitForm,

    // Exchanges
    pub next_request_id: u64,
    pub pending: HashMap<u64, PendingRequest>,
    pub last_error: Option<String>,

    pub api_url: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            friends: Vec::new(),
            selected: None,
            roster_cursor: 0,
            active_panel: Panel::Roster,
            input_mode: InputMode::Normal,
            show_add_friend: false,
            show_help: false,
            add_form: AddFriendForm::new(DEFAULT_AVATAR_URL),
            split_form: SplitForm::default(),
            next_request_id: 1,
            pending: HashMap::new(),
            last_error: None,
            api_url: String::from(DEFAULT_API_BASE),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        AppState {
            add_form: AddFriendForm::new(settings.default_avatar.clone()),
            api_url: settings.api_url.clone(),
            ..Self::new()
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn friend(&self, id: &str) -> Option<&Friend> {
        self.friends.iter().find(|f| f.id == id)
    }

    /// The selected friend, if it is still in the roster
    pub fn selected_friend(&self) -> Option<&Friend> {
        self.selected.as_deref().and_then(|id| self.friend(id))
    }

    pub fn friend_at_cursor(&self) -> Option<&Friend> {
        self.friends.get(self.roster_cursor)
    }

    /// Keep the roster cursor inside the roster
    pub fn clamp_cursor(&mut self) {
        if self.friends.is_empty() {
            self.roster_cursor = 0;
        } else if self.roster_cursor >= self.friends.len() {
            self.roster_cursor = self.friends.len() - 1;
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            friends: self.friends.clone(),
            selected: self.selected_friend().cloned(),
            roster_cursor: self.roster_cursor,
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            show_add_friend: self.show_add_friend,
            add_name: self.add_form.name.clone(),
            add_image: self.add_form.image.clone(),
            add_field: self.add_form.field,
            bill_input: self.split_form.bill_input.clone(),
            paid_input: self.split_form.paid_input.clone(),
            friend_expense: self
                .split_form
                .split
                .friend_expense()
                .map(format_amount)
                .unwrap_or_default(),
            payer: self.split_form.split.payer,
            split_field: self.split_form.field,
            pending_requests: self.pending.len(),
            last_error: self.last_error.clone(),
            api_url: self.api_url.clone(),
            show_help: self.show_help,
        }
    }
}
