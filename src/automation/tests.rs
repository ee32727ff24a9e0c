//! Tests for the automation state machine, driven end-to-end through the
//! command and status channels with a scripted screen backend.

use super::channels::create_automation_channels;
use super::fsm::ClickAutomation;
use super::match_image::{ButtonMatcher, MatchConfig, Template};
use super::types::{AutomationCommand, AutomationEvent, RunState};
use crate::screen::{Frame, ScreenBackend, ScreenError, ScreenResult};
use image::{GrayImage, Luma};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};

/// Shared probes into the scripted backend, readable from the test body
/// while the worker owns the backend itself.
#[derive(Clone, Default)]
struct Probes {
    clicks: Arc<Mutex<Vec<(i32, i32)>>>,
    captures: Arc<AtomicUsize>,
    pointer: Arc<Mutex<(i32, i32)>>,
}

impl Probes {
    fn new(pointer: (i32, i32)) -> Self {
        Self {
            pointer: Arc::new(Mutex::new(pointer)),
            ..Self::default()
        }
    }

    fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn clicks(&self) -> Vec<(i32, i32)> {
        self.clicks.lock().unwrap().clone()
    }
}

/// Scripted screen: serves the same frame on every capture and records
/// every click.
struct FakeScreen {
    probes: Probes,
    frame: GrayImage,
    logical_size: (u32, u32),
    fail_captures: bool,
}

impl ScreenBackend for FakeScreen {
    fn capture(&mut self) -> ScreenResult<Frame> {
        self.probes.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail_captures {
            return Err(ScreenError::NoPrimaryMonitor);
        }
        Ok(Frame {
            gray: self.frame.clone(),
        })
    }

    fn logical_size(&mut self) -> ScreenResult<(u32, u32)> {
        Ok(self.logical_size)
    }

    fn pointer_position(&mut self) -> ScreenResult<(i32, i32)> {
        Ok(*self.probes.pointer.lock().unwrap())
    }

    fn click(&mut self, x: i32, y: i32) -> ScreenResult<()> {
        self.probes.clicks.lock().unwrap().push((x, y));
        Ok(())
    }
}

fn textured_tile(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x * 37 + y * 91) % 151) as u8]))
}

/// Textured backdrop for frames that embed the button tile.
fn plain_frame(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x + 2 * y) % 11 + 60) as u8]))
}

/// Featureless frame; zero window variance pins every correlation to 0,
/// so "no match" is guaranteed rather than merely likely.
fn flat_frame(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([80]))
}

/// A 200x150 capture frame with the 24x24 button at (40, 30), over a
/// 100x75 logical screen (density factor 2.0).
fn button_screen(probes: &Probes) -> (FakeScreen, ButtonMatcher) {
    let tile = textured_tile(24, 24);
    let mut frame = plain_frame(200, 150);
    image::imageops::replace(&mut frame, &tile, 40, 30);

    let screen = FakeScreen {
        probes: probes.clone(),
        frame,
        logical_size: (100, 75),
        fail_captures: false,
    };
    let matcher = ButtonMatcher::with_template(Template::from_gray(tile), MatchConfig::default());
    (screen, matcher)
}

fn empty_screen(probes: &Probes) -> (FakeScreen, ButtonMatcher) {
    let screen = FakeScreen {
        probes: probes.clone(),
        frame: flat_frame(200, 150),
        logical_size: (100, 75),
        fail_captures: false,
    };
    let matcher = ButtonMatcher::with_template(
        Template::from_gray(textured_tile(24, 24)),
        MatchConfig::default(),
    );
    (screen, matcher)
}

fn spawn_automation(
    screen: FakeScreen,
    matcher: ButtonMatcher,
) -> (
    mpsc::Sender<AutomationCommand>,
    mpsc::Receiver<AutomationEvent>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx, event_tx, event_rx) = create_automation_channels();
    let mut automation = ClickAutomation::new(Box::new(screen), matcher, cmd_rx, event_tx);
    let handle = tokio::spawn(async move { automation.run().await });
    (cmd_tx, event_rx, handle)
}

/// Receive the next event; timeouts are in virtual time and generous.
async fn next_event(event_rx: &mut mpsc::Receiver<AutomationEvent>) -> AutomationEvent {
    timeout(Duration::from_secs(600), event_rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

/// Drain events until `pred` matches, returning everything seen up to and
/// including the matching event.
async fn events_until(
    event_rx: &mut mpsc::Receiver<AutomationEvent>,
    pred: impl Fn(&AutomationEvent) -> bool,
) -> Vec<AutomationEvent> {
    let mut seen = Vec::new();
    loop {
        let event = next_event(event_rx).await;
        let done = pred(&event);
        seen.push(event);
        if done {
            return seen;
        }
    }
}

async fn shut_down(cmd_tx: &mpsc::Sender<AutomationCommand>, handle: JoinHandle<()>) {
    cmd_tx
        .send(AutomationCommand::Shutdown)
        .await
        .expect("worker gone before shutdown");
    timeout(Duration::from_secs(600), handle)
        .await
        .expect("worker did not shut down")
        .expect("worker panicked");
}

#[test]
fn click_status_reports_confidence_as_whole_percent() {
    assert_eq!(super::fsm::click_status(0.82), "Clicked! (82% match)");
    assert_eq!(super::fsm::click_status(0.6), "Clicked! (60% match)");
    assert_eq!(super::fsm::click_status(0.999), "Clicked! (100% match)");
}

#[tokio::test(start_paused = true)]
async fn start_runs_and_scans_at_poll_cadence() {
    let probes = Probes::new((500, 500));
    let (screen, matcher) = empty_screen(&probes);
    let (cmd_tx, mut event_rx, handle) = spawn_automation(screen, matcher);

    cmd_tx.send(AutomationCommand::Start).await.unwrap();
    assert_eq!(
        next_event(&mut event_rx).await,
        AutomationEvent::StateChanged(RunState::Running)
    );

    // At least three consecutive scan reports with an unchanged counter
    for _ in 0..3 {
        assert_eq!(
            next_event(&mut event_rx).await,
            AutomationEvent::Status {
                text: "Scanning...".to_string(),
                clicks: 0
            }
        );
    }
    assert!(probes.capture_count() >= 3);
    assert!(probes.clicks().is_empty());

    shut_down(&cmd_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn second_start_is_a_noop() {
    let probes = Probes::new((500, 500));
    let (screen, matcher) = empty_screen(&probes);
    let (cmd_tx, mut event_rx, handle) = spawn_automation(screen, matcher);

    cmd_tx.send(AutomationCommand::Start).await.unwrap();
    assert_eq!(
        next_event(&mut event_rx).await,
        AutomationEvent::StateChanged(RunState::Running)
    );

    cmd_tx.send(AutomationCommand::Start).await.unwrap();
    cmd_tx.send(AutomationCommand::Stop).await.unwrap();

    let seen = events_until(&mut event_rx, |e| {
        *e == AutomationEvent::StateChanged(RunState::Stopped)
    })
    .await;

    // The redundant Start produced no second transition to Running
    assert!(
        !seen
            .iter()
            .any(|e| *e == AutomationEvent::StateChanged(RunState::Running))
    );

    shut_down(&cmd_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn stop_clears_status_and_is_idempotent() {
    let probes = Probes::new((500, 500));
    let (screen, matcher) = empty_screen(&probes);
    let (cmd_tx, mut event_rx, handle) = spawn_automation(screen, matcher);

    cmd_tx.send(AutomationCommand::Start).await.unwrap();
    assert_eq!(
        next_event(&mut event_rx).await,
        AutomationEvent::StateChanged(RunState::Running)
    );

    cmd_tx.send(AutomationCommand::Stop).await.unwrap();
    let seen = events_until(&mut event_rx, |e| {
        matches!(e, AutomationEvent::Status { text, .. } if text.is_empty())
    })
    .await;
    assert!(
        seen.contains(&AutomationEvent::StateChanged(RunState::Stopped)),
        "stop did not report the Stopped state"
    );

    // A second Stop re-clears the status without a duplicate transition
    cmd_tx.send(AutomationCommand::Stop).await.unwrap();
    assert_eq!(
        next_event(&mut event_rx).await,
        AutomationEvent::Status {
            text: String::new(),
            clicks: 0
        }
    );

    shut_down(&cmd_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn match_clicks_at_mapped_coordinates_then_cools_down() {
    let probes = Probes::new((500, 500));
    let (screen, matcher) = button_screen(&probes);
    let (cmd_tx, mut event_rx, handle) = spawn_automation(screen, matcher);

    cmd_tx.send(AutomationCommand::Start).await.unwrap();

    let seen = events_until(&mut event_rx, |e| {
        matches!(e, AutomationEvent::Status { text, .. } if text.starts_with("Clicked!"))
    })
    .await;
    let AutomationEvent::Status { text, clicks } = seen.last().unwrap() else {
        unreachable!();
    };
    assert_eq!(text, "Clicked! (100% match)");
    assert_eq!(*clicks, 1);

    // Button center (52, 42) in a 200px-wide capture over a 100px logical
    // screen maps through factor 2.0 to (26, 21)
    assert_eq!(probes.clicks(), vec![(26, 21)]);

    // The frame still shows the button, so after the cooldown the worker
    // clicks again; exactly one more capture happens in between
    let captures_after_first = probes.capture_count();
    let seen = events_until(&mut event_rx, |e| {
        matches!(e, AutomationEvent::Status { text, .. } if text.starts_with("Clicked!"))
    })
    .await;
    let AutomationEvent::Status { clicks, .. } = seen.last().unwrap() else {
        unreachable!();
    };
    assert_eq!(*clicks, 2);
    assert_eq!(probes.capture_count(), captures_after_first + 1);

    shut_down(&cmd_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn failsafe_corner_aborts_the_run() {
    let probes = Probes::new((0, 0));
    let (screen, matcher) = button_screen(&probes);
    let (cmd_tx, mut event_rx, handle) = spawn_automation(screen, matcher);

    cmd_tx.send(AutomationCommand::Start).await.unwrap();

    let seen = events_until(&mut event_rx, |e| *e == AutomationEvent::StopRequested).await;
    assert!(seen.contains(&AutomationEvent::Status {
        text: "Failsafe triggered".to_string(),
        clicks: 0
    }));
    assert!(seen.contains(&AutomationEvent::StateChanged(RunState::Aborting)));

    // The transient Aborting state decays to Stopped on its own
    assert_eq!(
        next_event(&mut event_rx).await,
        AutomationEvent::StateChanged(RunState::Stopped)
    );

    // Nothing was clicked even though the button was on screen
    assert!(probes.clicks().is_empty());

    shut_down(&cmd_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn start_is_refused_without_a_template() {
    let probes = Probes::new((500, 500));
    let screen = FakeScreen {
        probes: probes.clone(),
        frame: flat_frame(200, 150),
        logical_size: (100, 75),
        fail_captures: false,
    };
    let matcher = ButtonMatcher::from_file("no-such-template.png", MatchConfig::default());
    let (cmd_tx, mut event_rx, handle) = spawn_automation(screen, matcher);

    cmd_tx.send(AutomationCommand::Start).await.unwrap();
    assert!(matches!(
        next_event(&mut event_rx).await,
        AutomationEvent::Error(_)
    ));

    // Refused: no transition, no capture activity
    assert_eq!(probes.capture_count(), 0);

    shut_down(&cmd_tx, handle).await;
}

#[tokio::test(start_paused = true)]
async fn capture_errors_back_off_quietly() {
    let probes = Probes::new((500, 500));
    let screen = FakeScreen {
        probes: probes.clone(),
        frame: flat_frame(200, 150),
        logical_size: (100, 75),
        fail_captures: true,
    };
    let matcher = ButtonMatcher::with_template(
        Template::from_gray(textured_tile(24, 24)),
        MatchConfig::default(),
    );
    let (cmd_tx, mut event_rx, handle) = spawn_automation(screen, matcher);

    cmd_tx.send(AutomationCommand::Start).await.unwrap();
    assert_eq!(
        next_event(&mut event_rx).await,
        AutomationEvent::StateChanged(RunState::Running)
    );

    // Give the loop several virtual poll intervals to retry
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(probes.capture_count() >= 3, "loop stopped retrying");

    // Failures stay off the status stream: stopping is the next event
    cmd_tx.send(AutomationCommand::Stop).await.unwrap();
    assert_eq!(
        next_event(&mut event_rx).await,
        AutomationEvent::StateChanged(RunState::Stopped)
    );

    shut_down(&cmd_tx, handle).await;
}
