//! App actor - message loop processing UI events and network responses

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::commands::ExportFormat;
use crate::app::state::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::registry::Registry;
use crate::settings::Settings;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        registry: Arc<Registry>,
        settings: &Settings,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(registry, settings),
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
        // Send initial render state
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

    fn dispatch(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::Up => self.state.move_up(),
            UiEvent::Down => self.state.move_down(),
            UiEvent::Select => self.state.select(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::NextField => self.state.next_field(),

            // Request actions
            UiEvent::SendRequest => {
                if self.state.input_mode == InputMode::Editing {
                    self.state.stop_editing();
                }
                let cmd = self.state.prepare_send();
                self.dispatch(cmd);
            }
            UiEvent::SendBatch => {
                let cmd = self.state.prepare_batch();
                self.dispatch(cmd);
            }
            UiEvent::ProbeApi => {
                let cmd = self.state.prepare_probe();
                self.dispatch(cmd);
            }
            UiEvent::ToggleRetry => self.state.toggle_retry(),
            UiEvent::ResetParams => self.state.reset_params(),

            // Headers
            UiEvent::ToggleHeader => self.state.toggle_header(),
            UiEvent::AddHeader => self.state.add_header(),
            UiEvent::DeleteHeader => self.state.delete_header(),

            // Auth
            UiEvent::CycleAuth => self.state.cycle_auth(),

            // Output
            UiEvent::NextOutputTab => self.state.next_output_tab(),
            UiEvent::GenerateCode => self.state.generate_code(),
            UiEvent::CycleLanguage => self.state.cycle_language(),
            UiEvent::ExportJson => self.state.export(ExportFormat::Json),
            UiEvent::ExportCsv => self.state.export(ExportFormat::Csv),
            UiEvent::ClearHistory => self.state.clear_history(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
