//! Synthetic pointer input and display queries via enigo.

use super::error::{ScreenError, ScreenResult};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

/// Pointer driver wrapping one enigo connection.
pub struct PointerDriver {
    enigo: Enigo,
}

impl PointerDriver {
    pub fn new() -> ScreenResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|source| ScreenError::InputUnavailable { source })?;
        Ok(Self { enigo })
    }

    /// Fire-and-forget left click at logical screen coordinates.
    pub fn click(&mut self, x: i32, y: i32) -> ScreenResult<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|source| ScreenError::ClickFailed { x, y, source })?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|source| ScreenError::ClickFailed { x, y, source })?;
        Ok(())
    }

    /// Current pointer position in logical screen coordinates.
    pub fn location(&self) -> ScreenResult<(i32, i32)> {
        self.enigo
            .location()
            .map_err(|source| ScreenError::PointerQueryFailed { source })
    }

    /// Logical size of the main display.
    pub fn main_display_size(&self) -> ScreenResult<(u32, u32)> {
        let (w, h) = self
            .enigo
            .main_display()
            .map_err(|source| ScreenError::DisplayQueryFailed { source })?;
        if w <= 0 || h <= 0 {
            return Err(ScreenError::EmptyDisplay);
        }
        Ok((w as u32, h as u32))
    }
}
