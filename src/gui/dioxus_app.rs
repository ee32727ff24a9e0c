use crate::automation::{AutomationCommand, RunState};
use crate::gui::components::{header::Header, status_panel::StatusPanel};
use crate::gui::hooks::use_automation_loop;
use dioxus::prelude::*;
use std::path::Path;
use tokio::sync::mpsc;

/// Environment key carrying the template path from the CLI into the GUI.
pub const TEMPLATE_PATH_ENV: &str = "SKIP_CLICKER_TEMPLATE";

pub fn run_gui() {
    use dioxus::desktop::{Config, WindowBuilder};
    let enable_borderless = true; // borderless window
    let config = Config::new().with_window(
        WindowBuilder::new()
            .with_title("Skip Clicker")
            .with_decorations(!enable_borderless)
            .with_resizable(false)
            .with_inner_size(dioxus::desktop::LogicalSize::new(320, 300)),
    );
    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .launch(App);
}

#[component]
fn App() -> Element {
    use dioxus::desktop::use_window; // access desktop window for dragging
    let desktop = use_window();

    let template_path = use_hook(|| {
        std::env::var(TEMPLATE_PATH_ENV).unwrap_or_else(|_| "skip_button.png".to_string())
    });
    // Checked once at startup, like the rest of template loading
    let template_found = use_hook(|| Path::new(&template_path).exists());

    let command_tx = use_signal(|| None::<mpsc::Sender<AutomationCommand>>);
    let run_state = use_signal(|| RunState::Stopped);
    let status_text = use_signal(String::new);
    let clicks = use_signal(|| 0u64);
    let last_error = use_signal(|| None::<String>);

    use_automation_loop(
        template_path.clone(),
        command_tx,
        run_state,
        status_text,
        clicks,
        last_error,
    );

    let running = *run_state.read() == RunState::Running;
    let toggle_label = if running { "Stop" } else { "Start" };
    let toggle_style = if running {
        "background:linear-gradient(45deg,#dc3545,#e74c3c); color:white; padding:10px 0; border:none; border-radius:8px; cursor:pointer; font-size:1em; font-weight:bold;"
    } else {
        "background:linear-gradient(45deg,#22c55e,#16a34a); color:white; padding:10px 0; border:none; border-radius:8px; cursor:pointer; font-size:1em; font-weight:bold;"
    };

    let on_toggle = move |_: MouseEvent| {
        let Some(tx) = command_tx.read().clone() else {
            return;
        };
        let command = if running {
            AutomationCommand::Stop
        } else {
            AutomationCommand::Start
        };
        spawn(async move {
            let _ = tx.send(command).await;
        });
    };

    rsx! {
        div { style: "height:97vh; display:flex; flex-direction:column; gap:10px; padding:12px; background:linear-gradient(135deg,#667eea 0%,#764ba2 100%); color:white; border:1px solid rgba(255,255,255,0.25); box-sizing:content-box;",
            Header { on_drag: move |_| { let _ = desktop.window.drag_window(); } }
            StatusPanel {
                run_state: *run_state.read(),
                status_text: status_text.read().clone(),
                clicks: *clicks.read(),
            }
            button { style: "{toggle_style}", disabled: !template_found, onclick: on_toggle, "{toggle_label}" }
            if !template_found {
                p { style: "color:#ff6262; font-size:0.8em; text-align:center; margin:0;",
                    "'{template_path}' not found! Crop the button tightly and save it next to the app."
                }
            }
            if let Some(error) = last_error.read().clone() {
                p { style: "color:#ffd857; font-size:0.8em; text-align:center; margin:0;", "{error}" }
            }
            p { style: "color:rgba(255,255,255,0.6); font-size:0.7em; text-align:center; margin:0;",
                "Move mouse to top-left corner to emergency stop"
            }
            div { style: "margin-top:auto; text-align:left; font-size:0.65em; opacity:0.75; letter-spacing:0.5px;", "Built with Rust 🦀 and Dioxus ⚛️" }
        }
    }
}
