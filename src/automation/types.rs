// Types and enums for click automation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
    /// Transient state entered by the failsafe; decays to Stopped on the
    /// next loop iteration.
    Aborting,
}

#[derive(Debug, Clone)]
pub enum AutomationCommand {
    Start,
    Stop,
    /// End the worker loop entirely (headless timeout, tests).
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AutomationEvent {
    /// Human-readable status line plus the running click tally.
    Status { text: String, clicks: u64 },
    StateChanged(RunState),
    /// Failsafe fired; the presentation layer should reflect a stop.
    StopRequested,
    Error(String),
}

/// Result of one worker iteration. The loop driver branches on this
/// explicitly instead of routing control flow through error types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Clicked { confidence: f32 },
    NoMatch,
    CaptureFailed,
    AbortRequested,
}
