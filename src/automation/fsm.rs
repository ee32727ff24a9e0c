// State machine driving the capture/match/click worker loop
use super::mapping;
use super::match_image::ButtonMatcher;
use super::types::{AutomationCommand, AutomationEvent, RunState, StepOutcome};
use crate::screen::ScreenBackend;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

/// Poll cadence while scanning for the button.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Pause after a successful click so the still-visible button is not
/// re-clicked before the screen has a chance to react.
pub const CLICK_COOLDOWN: Duration = Duration::from_secs(2);
/// Command-check cadence while stopped.
const IDLE_INTERVAL: Duration = Duration::from_millis(100);
/// Pointer within this many logical pixels of the top-left corner is the
/// emergency-abort gesture.
pub const FAILSAFE_CORNER_PX: i32 = 2;

/// Status line for a successful click, confidence as a whole percentage.
pub(crate) fn click_status(confidence: f32) -> String {
    format!("Clicked! ({}% match)", (confidence * 100.0).round() as i32)
}

/// The automation worker: owns the run state, the backend, and the matcher.
/// Exactly one instance runs per process; Start/Stop toggle its state
/// through the command channel and all output leaves through the status
/// channel.
pub struct ClickAutomation {
    state: RunState,
    clicks: u64,
    backend: Box<dyn ScreenBackend>,
    matcher: ButtonMatcher,
    command_rx: mpsc::Receiver<AutomationCommand>,
    event_tx: mpsc::Sender<AutomationEvent>,
    should_exit: bool,
}

impl ClickAutomation {
    pub fn new(
        backend: Box<dyn ScreenBackend>,
        matcher: ButtonMatcher,
        command_rx: mpsc::Receiver<AutomationCommand>,
        event_tx: mpsc::Sender<AutomationEvent>,
    ) -> Self {
        Self {
            state: RunState::Stopped,
            clicks: 0,
            backend,
            matcher,
            command_rx,
            event_tx,
            should_exit: false,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    /// Non-blocking event send. A full buffer drops this event after
    /// logging; the consumer catches up on the next one. The worker never
    /// waits on the presentation layer.
    fn emit(&self, event: AutomationEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            log::debug!("Status event dropped: {e}");
        }
    }

    fn change_state(&mut self, new_state: RunState) {
        if self.state != new_state {
            log::debug!("Automation state: {:?} -> {:?}", self.state, new_state);
            self.state = new_state;
            self.emit(AutomationEvent::StateChanged(new_state));
        }
    }

    fn process_command(&mut self, command: AutomationCommand) {
        log::debug!("Processing automation command: {:?}", command);
        match command {
            AutomationCommand::Start => {
                if self.state == RunState::Running {
                    log::debug!("Automation already running, ignoring start command");
                    return;
                }
                if !self.matcher.is_ready() {
                    self.emit(AutomationEvent::Error(
                        "Template image not found - detection is disabled".to_string(),
                    ));
                    return;
                }
                self.change_state(RunState::Running);
            }
            AutomationCommand::Stop => {
                self.change_state(RunState::Stopped);
                // Idempotent; clearing the status line is safe to repeat
                self.emit(AutomationEvent::Status {
                    text: String::new(),
                    clicks: self.clicks,
                });
            }
            AutomationCommand::Shutdown => {
                self.should_exit = true;
                self.change_state(RunState::Stopped);
            }
        }
    }

    pub async fn run(&mut self) {
        log::debug!("Click automation loop started");

        loop {
            // Commands are observed here, once per iteration; stop latency
            // is bounded by the current sleep interval
            if let Ok(command) = self.command_rx.try_recv() {
                self.process_command(command);
            }

            match self.state {
                RunState::Stopped => sleep(IDLE_INTERVAL).await,
                RunState::Aborting => self.change_state(RunState::Stopped),
                RunState::Running => match self.scan_once() {
                    StepOutcome::Clicked { confidence } => {
                        self.clicks += 1;
                        self.emit(AutomationEvent::Status {
                            text: click_status(confidence),
                            clicks: self.clicks,
                        });
                        sleep(CLICK_COOLDOWN).await;
                    }
                    StepOutcome::NoMatch => {
                        self.emit(AutomationEvent::Status {
                            text: "Scanning...".to_string(),
                            clicks: self.clicks,
                        });
                        sleep(POLL_INTERVAL).await;
                    }
                    StepOutcome::CaptureFailed => {
                        // Transient; back off quietly and retry
                        sleep(POLL_INTERVAL).await;
                    }
                    StepOutcome::AbortRequested => {
                        self.change_state(RunState::Aborting);
                        self.emit(AutomationEvent::Status {
                            text: "Failsafe triggered".to_string(),
                            clicks: self.clicks,
                        });
                        self.emit(AutomationEvent::StopRequested);
                    }
                },
            }

            if self.should_exit {
                break;
            }
        }

        log::debug!("Click automation loop ended");
    }

    /// One capture/match/click iteration. Every failure mode maps to an
    /// explicit outcome; nothing here panics or aborts the loop.
    fn scan_once(&mut self) -> StepOutcome {
        match self.backend.pointer_position() {
            Ok((x, y)) if x <= FAILSAFE_CORNER_PX && y <= FAILSAFE_CORNER_PX => {
                return StepOutcome::AbortRequested;
            }
            Ok(_) => {}
            // Failsafe unavailable this poll; scanning continues
            Err(e) => log::debug!("Pointer query failed: {e}"),
        }

        let frame = match self.backend.capture() {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("Capture failed: {e}");
                return StepOutcome::CaptureFailed;
            }
        };

        let Some(hit) = self.matcher.find_best(&frame.gray) else {
            return StepOutcome::NoMatch;
        };

        // Recomputed every poll; the display layout can change between frames
        let (logical_width, _) = match self.backend.logical_size() {
            Ok(size) => size,
            Err(e) => {
                log::debug!("Display query failed: {e}");
                return StepOutcome::CaptureFailed;
            }
        };
        let point = mapping::to_logical(hit.center_x, hit.center_y, frame.width(), logical_width);

        log::debug!(
            "Match at capture ({}, {}) scale {:.2} confidence {:.3} -> click ({}, {})",
            hit.center_x,
            hit.center_y,
            hit.scale,
            hit.confidence,
            point.x,
            point.y
        );

        if let Err(e) = self.backend.click(point.x, point.y) {
            log::warn!("Click failed: {e}");
            return StepOutcome::CaptureFailed;
        }

        StepOutcome::Clicked {
            confidence: hit.confidence,
        }
    }
}
