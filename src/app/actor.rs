//! App actor - message loop processing UI events and network responses

use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// How often expired toasts are swept
const TICK: Duration = Duration::from_secs(1);

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
        // Populate both lists straight away
        for cmd in self.state.initial_fetch() {
            self.send(cmd);
        }
        self.render();

        let mut tick = tokio::time::interval(TICK);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    self.render();
                }
                Some(response) = net_rx.recv() => {
                    for cmd in self.state.handle_response(response) {
                        self.send(cmd);
                    }
                    self.render();
                }
                _ = tick.tick() => {
                    if self.state.prune_toasts(chrono::Utc::now()) {
                        self.render();
                    }
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: NetworkCommand) {
        let _ = self.network_tx.send(cmd);
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Tab switching
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),

            // Showcase
            UiEvent::NextSection => self.state.next_section(),
            UiEvent::PrevSection => self.state.prev_section(),
            UiEvent::OpenLogin => self.state.open_login(),
            UiEvent::CloseLogin => self.state.close_login(),
            UiEvent::LoginNextField => self.state.login_next_field(),
            UiEvent::LoginChar(c) => self.state.login_char(c),
            UiEvent::LoginBackspace => self.state.login_backspace(),

            // Admin list
            UiEvent::SwitchResource => self.state.switch_resource(),
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::NewRecord => self.state.open_create(),
            UiEvent::EditSelected => self.state.open_edit(),
            UiEvent::DeleteSelected => self.state.request_delete(),
            UiEvent::Refresh => {
                let cmd = self.state.refresh();
                self.send(cmd);
            }

            // Delete prompt
            UiEvent::ConfirmDelete => {
                if let Some(cmd) = self.state.confirm_delete() {
                    self.send(cmd);
                }
            }
            UiEvent::DeclineDelete => self.state.decline_delete(),

            // Edit dialog
            UiEvent::DialogNextField => self.state.dialog_next_field(),
            UiEvent::DialogPrevField => self.state.dialog_prev_field(),
            UiEvent::DialogChar(c) => self.state.dialog_char(c),
            UiEvent::DialogBackspace => self.state.dialog_backspace(),
            UiEvent::DialogCursorLeft => self.state.dialog_cursor_left(),
            UiEvent::DialogCursorRight => self.state.dialog_cursor_right(),
            UiEvent::SubmitDialog => {
                if let Some(cmd) = self.state.submit_dialog() {
                    self.send(cmd);
                }
            }
            UiEvent::CancelDialog => self.state.cancel_dialog(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ui_events::AppTab;
    use crate::models::{MutationOutcome, Resource};

    #[tokio::test]
    async fn test_actor_fetches_on_start_and_quits() {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(AppState::default(), net_cmd_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_resp_rx));

        assert!(matches!(
            net_cmd_rx.recv().await,
            Some(NetworkCommand::Fetch { resource: Resource::Exhibits, .. })
        ));
        assert!(matches!(
            net_cmd_rx.recv().await,
            Some(NetworkCommand::Fetch { resource: Resource::Tours, .. })
        ));
        let first = render_rx.recv().await.unwrap();
        assert!(first.loading_exhibits && first.loading_tours);

        ui_tx.send(UiEvent::SwitchTab(AppTab::Admin)).unwrap();
        let next = render_rx.recv().await.unwrap();
        assert_eq!(next.active_tab, AppTab::Admin);

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_cmd_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_mutation_response_triggers_refetch() {
        let (_ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel();
        let (net_cmd_tx, mut net_cmd_rx) = mpsc::unbounded_channel();
        let (render_tx, _render_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(AppState::default(), net_cmd_tx, render_tx);
        tokio::spawn(actor.run(ui_rx, net_resp_rx));

        // Skip the start-up fetches
        net_cmd_rx.recv().await.unwrap();
        net_cmd_rx.recv().await.unwrap();

        net_resp_tx
            .send(NetworkResponse::Mutated {
                id: 50,
                outcome: MutationOutcome::Deleted { resource: Resource::Tours, record_id: 3 },
            })
            .unwrap();
        assert!(matches!(
            net_cmd_rx.recv().await,
            Some(NetworkCommand::Fetch { resource: Resource::Tours, .. })
        ));
    }
}
