//! Backend seam between the automation loop and the platform.
//!
//! The worker only ever talks to a [`ScreenBackend`], so tests can drive the
//! state machine with scripted frames and a recorded click log.

use super::capture::{self, Frame};
use super::error::ScreenResult;
use super::input::PointerDriver;

/// Platform operations the automation loop needs, one seam for all of them.
pub trait ScreenBackend: Send {
    /// Grab a fresh full-screen frame. Errors are transient; the caller
    /// owns the retry policy.
    fn capture(&mut self) -> ScreenResult<Frame>;

    /// Logical (density-independent) size of the screen the frame maps onto.
    fn logical_size(&mut self) -> ScreenResult<(u32, u32)>;

    /// Current pointer position in logical coordinates, for the failsafe.
    fn pointer_position(&mut self) -> ScreenResult<(i32, i32)>;

    /// Synthetic left click at logical coordinates.
    fn click(&mut self, x: i32, y: i32) -> ScreenResult<()>;
}

/// The real desktop: xcap for frames, enigo for input and display queries.
pub struct DesktopScreen {
    pointer: PointerDriver,
}

impl DesktopScreen {
    pub fn new() -> ScreenResult<Self> {
        Ok(Self {
            pointer: PointerDriver::new()?,
        })
    }
}

impl ScreenBackend for DesktopScreen {
    fn capture(&mut self) -> ScreenResult<Frame> {
        capture::capture_primary()
    }

    fn logical_size(&mut self) -> ScreenResult<(u32, u32)> {
        self.pointer.main_display_size()
    }

    fn pointer_position(&mut self) -> ScreenResult<(i32, i32)> {
        self.pointer.location()
    }

    fn click(&mut self, x: i32, y: i32) -> ScreenResult<()> {
        self.pointer.click(x, y)
    }
}
