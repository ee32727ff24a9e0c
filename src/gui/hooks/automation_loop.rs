use crate::automation::{
    AutomationCommand, AutomationEvent, ButtonMatcher, ClickAutomation, MatchConfig, RunState,
    create_automation_channels,
};
use crate::screen::DesktopScreen;
use dioxus::prelude::*;
use tokio::sync::mpsc;

/// Spawns the automation worker once and wires its status stream into the
/// GUI signals. The command sender lands in `command_tx` when the worker is
/// up; the worker itself never touches GUI state directly.
pub fn use_automation_loop(
    template_path: String,
    mut command_tx: Signal<Option<mpsc::Sender<AutomationCommand>>>,
    mut run_state: Signal<RunState>,
    mut status_text: Signal<String>,
    mut clicks: Signal<u64>,
    mut last_error: Signal<Option<String>>,
) {
    use_future(move || {
        let template_path = template_path.clone();
        async move {
            let backend = match DesktopScreen::new() {
                Ok(backend) => Box::new(backend),
                Err(e) => {
                    log::error!("Failed to initialize the screen backend: {e}");
                    last_error.set(Some(format!("Input driver unavailable: {e}")));
                    return;
                }
            };

            let matcher = ButtonMatcher::from_file(&template_path, MatchConfig::default());
            let (cmd_tx, cmd_rx, event_tx, mut event_rx) = create_automation_channels();
            let mut automation = ClickAutomation::new(backend, matcher, cmd_rx, event_tx);

            // Start automation run loop in background
            spawn(async move { automation.run().await });
            command_tx.set(Some(cmd_tx));

            while let Some(event) = event_rx.recv().await {
                match event {
                    AutomationEvent::Status { text, clicks: count } => {
                        status_text.set(text);
                        clicks.set(count);
                    }
                    AutomationEvent::StateChanged(state) => {
                        run_state.set(state);
                    }
                    AutomationEvent::StopRequested => {
                        run_state.set(RunState::Stopped);
                        status_text.set(String::new());
                    }
                    AutomationEvent::Error(message) => {
                        last_error.set(Some(message));
                    }
                }
            }
        }
    });
}
