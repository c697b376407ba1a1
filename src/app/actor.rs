//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Initial fetch of the roster
        let load = self.state.load_friends();
        self.send(load);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: NetworkCommand) {
        if self.network_tx.send(cmd).is_err() {
            tracing::error!("Network actor is gone, command dropped");
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            // Navigation
            UiEvent::NextPanel => {
                self.state.next_panel();
                None
            }
            UiEvent::PrevPanel => {
                self.state.prev_panel();
                None
            }
            UiEvent::CursorUp => {
                self.state.cursor_up();
                None
            }
            UiEvent::CursorDown => {
                self.state.cursor_down();
                None
            }

            // Roster intents
            UiEvent::SelectFriend => {
                self.state.select_at_cursor();
                None
            }
            UiEvent::DeleteFriend => self.state.delete_at_cursor(),
            UiEvent::ToggleAddFriend => {
                self.state.toggle_add_friend();
                None
            }
            UiEvent::Reload => Some(self.state.load_friends()),

            // Form editing
            UiEvent::NextField => {
                self.state.next_field();
                None
            }
            UiEvent::PrevField => {
                self.state.prev_field();
                None
            }
            UiEvent::StartEditing => {
                self.state.start_editing();
                None
            }
            UiEvent::StopEditing => {
                self.state.stop_editing();
                None
            }
            UiEvent::CharInput(c) => {
                self.state.enter_char(c);
                None
            }
            UiEvent::Backspace => {
                self.state.delete_char();
                None
            }
            UiEvent::TogglePayer => {
                self.state.toggle_payer();
                None
            }
            UiEvent::Submit => {
                self.state.stop_editing();
                self.state.submit()
            }

            // Popups
            UiEvent::ToggleHelp => {
                self.state.toggle_help();
                None
            }
            UiEvent::CloseHelp => {
                self.state.close_help();
                None
            }
            UiEvent::DismissError => {
                self.state.dismiss_error();
                None
            }

            // System
            UiEvent::Quit => return true,
        };

        if let Some(cmd) = cmd {
            tracing::debug!(id = ?cmd.id(), operation = ?cmd.operation(), "Dispatching store command");
            self.send(cmd);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Friend;

    #[tokio::test]
    async fn test_actor_loads_then_quits() {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(AppState::new(), net_cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_resp_rx));

        let id = match net_cmd_rx.recv().await {
            Some(NetworkCommand::LoadFriends { id }) => id,
            other => panic!("expected initial load, got {:?}", other),
        };
        let initial = render_rx.recv().await.unwrap();
        assert!(initial.is_loading());

        net_resp_tx
            .send(NetworkResponse::FriendsLoaded {
                id,
                friends: vec![Friend {
                    id: "1".into(),
                    name: "Ann".into(),
                    image: "https://i.pravatar.cc/48".into(),
                    balance: 0.0,
                }],
            })
            .unwrap();
        let rendered = render_rx.recv().await.unwrap();
        assert_eq!(rendered.friends.len(), 1);
        assert!(!rendered.is_loading());

        ui_tx.send(UiEvent::DeleteFriend).unwrap();
        assert!(matches!(
            net_cmd_rx.recv().await,
            Some(NetworkCommand::DeleteFriend { ref friend_id, .. }) if friend_id == "1"
        ));

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }
}
