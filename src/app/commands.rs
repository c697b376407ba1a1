//! Command handlers - business logic for processing UI events
//!
//! Intents that touch the store return the [`NetworkCommand`] to send.
//! The roster and selection only change when the matching
//! [`NetworkResponse`] arrives.

use crate::app::state::PendingRequest;
use crate::app::AppState;
use crate::messages::ui_events::{AddField, InputMode, Panel, SplitField};
use crate::messages::{NetworkCommand, NetworkResponse, Operation};
use crate::models::{format_amount, parse_amount, NewFriend};

impl AppState {
    // ========================
    // Navigation
    // ========================

    /// Panels currently on screen, in tab order
    fn visible_panels(&self) -> Vec<Panel> {
        let mut panels = vec![Panel::Roster];
        if self.show_add_friend {
            panels.push(Panel::AddFriend);
        }
        if self.selected_friend().is_some() {
            panels.push(Panel::SplitBill);
        }
        panels
    }

    pub fn next_panel(&mut self) {
        let panels = self.visible_panels();
        let pos = panels.iter().position(|p| *p == self.active_panel).unwrap_or(0);
        self.active_panel = panels[(pos + 1) % panels.len()];
        self.input_mode = InputMode::Normal;
    }

    pub fn prev_panel(&mut self) {
        let panels = self.visible_panels();
        let pos = panels.iter().position(|p| *p == self.active_panel).unwrap_or(0);
        self.active_panel = panels[(pos + panels.len() - 1) % panels.len()];
        self.input_mode = InputMode::Normal;
    }

    pub fn cursor_up(&mut self) {
        self.roster_cursor = self.roster_cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.roster_cursor + 1 < self.friends.len() {
            self.roster_cursor += 1;
        }
    }

    // ========================
    // Selection and add form
    // ========================

    /// Select a friend for splitting. Selecting the selected friend clears
    /// the selection. Always closes the add form.
    pub fn select_friend(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.active_panel = Panel::Roster;
        } else {
            self.selected = Some(id.to_string());
            self.split_form.reset();
            self.active_panel = Panel::SplitBill;
        }
        self.show_add_friend = false;
        self.input_mode = InputMode::Normal;
    }

    pub fn select_at_cursor(&mut self) {
        if let Some(id) = self.friend_at_cursor().map(|f| f.id.clone()) {
            self.select_friend(&id);
        }
    }

    pub fn toggle_add_friend(&mut self) {
        self.show_add_friend = !self.show_add_friend;
        self.input_mode = InputMode::Normal;
        if self.show_add_friend {
            self.active_panel = Panel::AddFriend;
            self.add_form.field = AddField::Name;
        } else if self.active_panel == Panel::AddFriend {
            self.active_panel = Panel::Roster;
        }
    }

    // ========================
    // Store intents
    // ========================

    fn track(&mut self, operation: Operation, friend_id: Option<String>) -> u64 {
        let id = self.next_id();
        self.pending.insert(id, PendingRequest { operation, friend_id });
        id
    }

    /// Fetch the whole roster
    pub fn load_friends(&mut self) -> NetworkCommand {
        let id = self.track(Operation::Load, None);
        NetworkCommand::LoadFriends { id }
    }

    /// Submit the add form. Blank input leaves everything as is; otherwise
    /// the form is reset and closed whatever the outcome of the request.
    pub fn submit_add_friend(&mut self) -> Option<NetworkCommand> {
        let friend = NewFriend::from_form(&self.add_form.name, &self.add_form.image)?;

        self.add_form.reset();
        self.show_add_friend = false;
        self.input_mode = InputMode::Normal;
        if self.active_panel == Panel::AddFriend {
            self.active_panel = Panel::Roster;
        }

        let id = self.track(Operation::Add, None);
        Some(NetworkCommand::CreateFriend { id, friend })
    }

    /// Submit the split form against the selected friend
    pub fn submit_split(&mut self) -> Option<NetworkCommand> {
        let delta = self.split_form.split.delta()?;
        let friend = match self.selected_friend() {
            Some(friend) => friend,
            None => {
                tracing::warn!(selected = ?self.selected, "Split submitted without a selected friend in the roster");
                return None;
            }
        };
        let friend_id = friend.id.clone();
        let balance = friend.balance + delta;

        self.input_mode = InputMode::Normal;
        let id = self.track(Operation::Split, Some(friend_id.clone()));
        Some(NetworkCommand::UpdateBalance { id, friend_id, balance })
    }

    pub fn delete_friend(&mut self, friend_id: &str) -> NetworkCommand {
        let id = self.track(Operation::Delete, Some(friend_id.to_string()));
        NetworkCommand::DeleteFriend {
            id,
            friend_id: friend_id.to_string(),
        }
    }

    pub fn delete_at_cursor(&mut self) -> Option<NetworkCommand> {
        let friend_id = self.friend_at_cursor()?.id.clone();
        Some(self.delete_friend(&friend_id))
    }

    /// Submit whichever form has focus
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        match self.active_panel {
            Panel::AddFriend => self.submit_add_friend(),
            Panel::SplitBill => self.submit_split(),
            Panel::Roster => None,
        }
    }

    // ========================
    // Store responses
    // ========================

    /// Reconcile the roster with a finished exchange
    pub fn handle_response(&mut self, response: NetworkResponse) {
        let Some(pending) = self.pending.remove(&response.id()) else {
            tracing::warn!(id = response.id(), "Ignoring response to unknown request");
            return;
        };

        match response {
            NetworkResponse::FriendsLoaded { friends, .. } => {
                tracing::info!(count = friends.len(), "Roster loaded");
                self.friends = friends;
                self.last_error = None;
            }
            NetworkResponse::FriendCreated { friend, .. } => {
                tracing::info!(friend_id = %friend.id, name = %friend.name, "Friend added");
                self.friends.push(friend);
                self.last_error = None;
            }
            NetworkResponse::FriendUpdated { friend, .. } => {
                let target = pending.friend_id.unwrap_or_else(|| friend.id.clone());
                tracing::info!(friend_id = %target, balance = friend.balance, "Balance updated");
                if let Some(slot) = self.friends.iter_mut().find(|f| f.id == target) {
                    *slot = friend;
                }
                self.selected = None;
                self.split_form.reset();
                if self.active_panel == Panel::SplitBill {
                    self.active_panel = Panel::Roster;
                }
                self.last_error = None;
            }
            NetworkResponse::FriendDeleted { friend_id, .. } => {
                tracing::info!(friend_id = %friend_id, "Friend deleted");
                self.friends.retain(|f| f.id != friend_id);
                self.selected = None;
                if self.active_panel == Panel::SplitBill {
                    self.active_panel = Panel::Roster;
                }
                self.last_error = None;
            }
            NetworkResponse::Error { operation, reason, .. } => {
                tracing::warn!(operation = operation.as_str(), reason = %reason, "Store exchange failed");
                self.last_error = Some(format!("Could not {}: {}", operation.as_str(), reason));
            }
        }

        self.clamp_cursor();
    }

    // ========================
    // Form editing
    // ========================

    pub fn next_field(&mut self) {
        match self.active_panel {
            Panel::AddFriend => self.add_form.field = self.add_form.field.next(),
            Panel::SplitBill => self.split_form.field = self.split_form.field.next(),
            Panel::Roster => {}
        }
        if self.active_panel == Panel::SplitBill && self.split_form.field == SplitField::Payer {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn prev_field(&mut self) {
        match self.active_panel {
            Panel::AddFriend => self.add_form.field = self.add_form.field.prev(),
            Panel::SplitBill => self.split_form.field = self.split_form.field.prev(),
            Panel::Roster => {}
        }
    }

    pub fn start_editing(&mut self) {
        match self.active_panel {
            Panel::AddFriend => self.input_mode = InputMode::Editing,
            Panel::SplitBill if self.split_form.field == SplitField::Payer => self.toggle_payer(),
            Panel::SplitBill => self.input_mode = InputMode::Editing,
            Panel::Roster => {}
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_payer(&mut self) {
        if self.active_panel == Panel::SplitBill {
            self.split_form.split.payer = self.split_form.split.payer.toggle();
        }
    }

    pub fn enter_char(&mut self, c: char) {
        match self.active_panel {
            Panel::AddFriend => self.add_form.current_input_mut().push(c),
            Panel::SplitBill => {
                if !c.is_ascii_digit() && c != '.' {
                    return;
                }
                let mut candidate = self.current_split_input().to_string();
                candidate.push(c);
                self.set_split_input(candidate);
            }
            Panel::Roster => {}
        }
    }

    pub fn delete_char(&mut self) {
        match self.active_panel {
            Panel::AddFriend => {
                self.add_form.current_input_mut().pop();
            }
            Panel::SplitBill => {
                let mut candidate = self.current_split_input().to_string();
                candidate.pop();
                self.set_split_input(candidate);
            }
            Panel::Roster => {}
        }
    }

    fn current_split_input(&self) -> &str {
        match self.split_form.field {
            SplitField::Bill => &self.split_form.bill_input,
            SplitField::Paid => &self.split_form.paid_input,
            SplitField::Payer => "",
        }
    }

    /// Apply an edited numeric field, rejecting text that does not parse
    /// and an expense above the bill
    fn set_split_input(&mut self, text: String) {
        if text.matches('.').count() > 1 {
            return;
        }
        let value = parse_amount(&text);
        if !text.is_empty() && value.is_none() && text != "." {
            return;
        }

        let form = &mut self.split_form;
        match form.field {
            SplitField::Bill => {
                let previous_paid = form.split.paid_by_user;
                form.split.set_bill(value);
                form.bill_input = text;
                if form.split.paid_by_user != previous_paid {
                    form.paid_input = form.split.paid_by_user.map(format_amount).unwrap_or_default();
                }
            }
            SplitField::Paid => {
                if !form.split.accepts_paid(value) {
                    return;
                }
                form.split.paid_by_user = value;
                form.paid_input = text;
            }
            SplitField::Payer => {}
        }
    }

    // ========================
    // Popups and status
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Friend, Payer};

    fn friend(id: &str, name: &str, balance: f64) -> Friend {
        Friend {
            id: id.to_string(),
            name: name.to_string(),
            image: format!("https://i.pravatar.cc/48?={}", id),
            balance,
        }
    }

    fn loaded(friends: Vec<Friend>) -> AppState {
        let mut state = AppState::new();
        let cmd = state.load_friends();
        let id = cmd.id().unwrap();
        state.handle_response(NetworkResponse::FriendsLoaded { id, friends });
        state
    }

    fn type_into(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    /// Fill the split form for the selected friend
    fn fill_split(state: &mut AppState, bill: &str, paid: &str, payer: Payer) {
        state.split_form.field = SplitField::Bill;
        type_into(state, bill);
        state.split_form.field = SplitField::Paid;
        type_into(state, paid);
        state.split_form.split.payer = payer;
    }

    #[test]
    fn test_load_replaces_roster_in_order() {
        let friends = vec![friend("1", "Ann", 0.0), friend("2", "Bob", -3.0), friend("3", "Cy", 4.5)];
        let state = loaded(friends.clone());
        assert_eq!(state.friends, friends);
        assert!(state.pending.is_empty());
    }

    #[test]
    fn test_load_failure_leaves_roster_empty() {
        let mut state = AppState::new();
        let id = state.load_friends().id().unwrap();
        state.handle_response(NetworkResponse::Error {
            id,
            operation: Operation::Load,
            reason: "connection failed".into(),
        });
        assert!(state.friends.is_empty());
        assert!(state.last_error.as_deref().unwrap().contains("load friends"));
    }

    #[test]
    fn test_selection_toggle() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0), friend("2", "Bob", 0.0)]);
        state.toggle_add_friend();
        assert!(state.show_add_friend);

        state.select_friend("1");
        assert_eq!(state.selected.as_deref(), Some("1"));
        assert!(!state.show_add_friend);

        state.toggle_add_friend();
        state.select_friend("2");
        assert_eq!(state.selected.as_deref(), Some("2"));
        assert!(!state.show_add_friend);

        state.toggle_add_friend();
        assert!(state.show_add_friend);
        state.select_friend("2");
        assert_eq!(state.selected, None);
        assert!(!state.show_add_friend);
    }

    #[test]
    fn test_add_form_field_cycle() {
        let mut state = AppState::new();
        state.toggle_add_friend();
        assert_eq!(state.add_form.field, AddField::Name);
        state.prev_field();
        assert_eq!(state.add_form.field, AddField::Image);
        state.prev_field();
        assert_eq!(state.add_form.field, AddField::Name);
        state.next_field();
        assert_eq!(state.add_form.field, AddField::Image);
    }

    #[test]
    fn test_split_user_pays() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0)]);
        state.select_friend("1");
        fill_split(&mut state, "100", "40", Payer::User);

        let cmd = state.submit_split().unwrap();
        let NetworkCommand::UpdateBalance { id, friend_id, balance } = cmd else {
            panic!("expected balance update");
        };
        assert_eq!(friend_id, "1");
        assert_eq!(balance, 60.0);

        state.handle_response(NetworkResponse::FriendUpdated {
            id,
            friend: friend("1", "Ann", 60.0),
        });
        assert_eq!(state.friends, vec![friend("1", "Ann", 60.0)]);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_split_friend_pays() {
        let mut state = loaded(vec![friend("1", "Ann", 10.0)]);
        state.select_friend("1");
        fill_split(&mut state, "30", "12", Payer::Friend);

        match state.submit_split() {
            Some(NetworkCommand::UpdateBalance { balance, .. }) => assert_eq!(balance, -2.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_split_scenario_plus_twenty() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0)]);
        state.select_friend("1");
        fill_split(&mut state, "50", "30", Payer::User);

        let cmd = state.submit().unwrap();
        assert!(matches!(&cmd, NetworkCommand::UpdateBalance { balance, .. } if *balance == 20.0));
        state.handle_response(NetworkResponse::FriendUpdated {
            id: cmd.id().unwrap(),
            friend: friend("1", "Ann", 20.0),
        });
        assert_eq!(state.friends[0].balance, 20.0);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_split_with_zero_is_noop() {
        let mut state = loaded(vec![friend("1", "Ann", 5.0)]);
        state.select_friend("1");
        fill_split(&mut state, "0", "", Payer::User);
        assert!(state.submit_split().is_none());

        state.split_form.reset();
        fill_split(&mut state, "25", "", Payer::Friend);
        assert!(state.submit_split().is_none());

        assert_eq!(state.selected.as_deref(), Some("1"));
        assert!(state.pending.is_empty());
        assert_eq!(state.friends[0].balance, 5.0);
    }

    #[test]
    fn test_split_failure_keeps_state() {
        let mut state = loaded(vec![friend("1", "Ann", 5.0)]);
        state.select_friend("1");
        fill_split(&mut state, "10", "4", Payer::User);
        let id = state.submit_split().unwrap().id().unwrap();
        state.handle_response(NetworkResponse::Error {
            id,
            operation: Operation::Split,
            reason: "server responded with status 500".into(),
        });
        assert_eq!(state.friends[0].balance, 5.0);
        assert_eq!(state.selected.as_deref(), Some("1"));
        assert!(state.last_error.is_some());
    }

    #[test]
    fn test_paid_clamped_to_bill() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0)]);
        state.select_friend("1");
        state.split_form.field = SplitField::Bill;
        type_into(&mut state, "20");
        state.split_form.field = SplitField::Paid;
        type_into(&mut state, "25");
        // '5' would make 25 > 20
        assert_eq!(state.split_form.paid_input, "2");

        type_into(&mut state, "0");
        assert_eq!(state.split_form.split.paid_by_user, Some(20.0));

        state.split_form.field = SplitField::Bill;
        state.delete_char();
        assert_eq!(state.split_form.split.bill, Some(2.0));
        assert_eq!(state.split_form.paid_input, "2");

        type_into(&mut state, "x.5.");
        assert_eq!(state.split_form.bill_input, "2.5");
    }

    #[test]
    fn test_add_friend() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0)]);
        state.toggle_add_friend();
        type_into(&mut state, "Bob");
        state.add_form.image = "https://x/48".into();

        let cmd = state.submit().unwrap();
        let NetworkCommand::CreateFriend { id, friend: candidate } = cmd else {
            panic!("expected create");
        };
        assert_eq!(candidate.name, "Bob");
        assert_eq!(candidate.balance, 0.0);
        assert_eq!(candidate.image, format!("https://x/48?={}", candidate.id));
        assert!(!state.show_add_friend);
        assert!(state.add_form.name.is_empty());

        state.handle_response(NetworkResponse::FriendCreated {
            id,
            friend: friend("srv-9", "Bob", 0.0),
        });
        assert_eq!(state.friends.len(), 2);
        assert_eq!(state.friends[1].id, "srv-9");
    }

    #[test]
    fn test_add_failure_drops_candidate() {
        let mut state = loaded(vec![]);
        state.toggle_add_friend();
        type_into(&mut state, "Bob");
        let id = state.submit_add_friend().unwrap().id().unwrap();
        assert!(!state.show_add_friend);

        state.handle_response(NetworkResponse::Error {
            id,
            operation: Operation::Add,
            reason: "request timed out".into(),
        });
        assert!(state.friends.is_empty());
        assert!(!state.show_add_friend);
    }

    #[test]
    fn test_add_requires_name() {
        let mut state = AppState::new();
        state.toggle_add_friend();
        assert!(state.submit_add_friend().is_none());
        assert!(state.show_add_friend);
    }

    #[test]
    fn test_delete_clears_any_selection() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0), friend("2", "Bob", 0.0)]);
        state.select_friend("2");
        let cmd = state.delete_friend("1");
        state.handle_response(NetworkResponse::FriendDeleted {
            id: cmd.id().unwrap(),
            friend_id: "1".into(),
        });
        assert_eq!(state.friends, vec![friend("2", "Bob", 0.0)]);
        assert_eq!(state.selected, None);
    }

    #[test]
    fn test_delete_failure_keeps_selection() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0)]);
        state.select_friend("1");
        let id = state.delete_at_cursor().unwrap().id().unwrap();
        state.handle_response(NetworkResponse::Error {
            id,
            operation: Operation::Delete,
            reason: "connection failed".into(),
        });
        assert_eq!(state.friends.len(), 1);
        assert_eq!(state.selected.as_deref(), Some("1"));
    }

    #[test]
    fn test_unknown_response_ignored() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0)]);
        state.handle_response(NetworkResponse::FriendDeleted {
            id: 999,
            friend_id: "1".into(),
        });
        assert_eq!(state.friends.len(), 1);
    }

    #[test]
    fn test_cursor_clamped_after_delete() {
        let mut state = loaded(vec![friend("1", "Ann", 0.0), friend("2", "Bob", 0.0)]);
        state.cursor_down();
        assert_eq!(state.roster_cursor, 1);
        let cmd = state.delete_at_cursor().unwrap();
        state.handle_response(NetworkResponse::FriendDeleted {
            id: cmd.id().unwrap(),
            friend_id: "2".into(),
        });
        assert_eq!(state.roster_cursor, 0);
    }
}
