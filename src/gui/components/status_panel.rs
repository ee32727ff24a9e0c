// gui/components/status_panel.rs
use crate::automation::RunState;
use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub run_state: RunState,
    pub status_text: String,
    pub clicks: u64,
}

#[component]
pub fn StatusPanel(props: StatusPanelProps) -> Element {
    let (dot_color, state_label) = match props.run_state {
        RunState::Running => ("#22c55e", "Running"),
        RunState::Aborting => ("#ffd857", "Stopping"),
        RunState::Stopped => ("#9ca3af", "Stopped"),
    };

    rsx! {
        div { style: "background:rgba(255,255,255,0.1); padding:12px; border-radius:10px; border:1px solid rgba(255,255,255,0.2); display:flex; flex-direction:column; gap:6px; align-items:center;",
            div { style: "display:flex; gap:6px; align-items:center;",
                span { "Status:" }
                span { style: "color:{dot_color}; font-size:16px;", "●" }
                span { style: "color:{dot_color};", "{state_label}" }
            }
            // Live status line from the worker; reserved height so the
            // window does not jump when it clears
            div { style: "color:#d1d5db; font-size:0.85em; min-height:1.2em;", "{props.status_text}" }
            div { "Clicks: {props.clicks}" }
        }
    }
}
