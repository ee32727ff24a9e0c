pub mod args;
pub mod automation;
pub mod gui;
pub mod screen;

pub use automation::ClickAutomation;
pub use screen::DesktopScreen;
