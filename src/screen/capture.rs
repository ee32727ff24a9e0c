//! Full-screen capture via xcap.

use super::error::{ScreenError, ScreenResult};
use image::GrayImage;
use xcap::Monitor;

/// One captured screen frame, already converted to grayscale.
///
/// Dimensions are capture pixels, which exceed logical screen units on
/// high-density displays.
pub struct Frame {
    pub gray: GrayImage,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }
}

/// Capture the primary monitor as a grayscale frame.
///
/// xcap captures per-monitor, so a union of all displays is not available;
/// the primary display is the capture target.
pub fn capture_primary() -> ScreenResult<Frame> {
    let monitor = primary_monitor()?;
    let rgba = monitor
        .capture_image()
        .map_err(|source| ScreenError::CaptureFailed { source })?;

    let gray = image::DynamicImage::ImageRgba8(rgba).to_luma8();
    Ok(Frame { gray })
}

fn primary_monitor() -> ScreenResult<Monitor> {
    let monitors =
        Monitor::all().map_err(|source| ScreenError::MonitorEnumerationFailed { source })?;

    let mut fallback = None;
    for monitor in monitors {
        match monitor.is_primary() {
            Ok(true) => return Ok(monitor),
            Ok(false) => {
                if fallback.is_none() {
                    fallback = Some(monitor);
                }
            }
            Err(e) => {
                log::debug!("Monitor primary query failed, skipping: {e}");
            }
        }
    }

    fallback.ok_or(ScreenError::NoPrimaryMonitor)
}
