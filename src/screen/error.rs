use thiserror::Error;

/// A specialized `Result` type for screen capture and input operations.
pub type ScreenResult<T> = Result<T, ScreenError>;

/// The error type for all capture/input operations.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("Failed to enumerate monitors: {source}")]
    MonitorEnumerationFailed { source: xcap::XCapError },

    #[error("No primary monitor found")]
    NoPrimaryMonitor,

    #[error("Screen capture failed: {source}")]
    CaptureFailed { source: xcap::XCapError },

    #[error("Could not initialize the input driver: {source}")]
    InputUnavailable { source: enigo::NewConError },

    #[error("Failed to query pointer position: {source}")]
    PointerQueryFailed { source: enigo::InputError },

    #[error("Failed to query the main display size: {source}")]
    DisplayQueryFailed { source: enigo::InputError },

    #[error("Click at ({x}, {y}) failed: {source}")]
    ClickFailed {
        x: i32,
        y: i32,
        source: enigo::InputError,
    },

    #[error("Main display reported a zero dimension")]
    EmptyDisplay,
}
