// Click automation module
// Run/stop state machine, template matching, and coordinate mapping for
// the background worker that finds and clicks the reference button.

pub mod channels;
pub mod fsm;
pub mod mapping;
pub mod match_image;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export the main types and functions for easy access
pub use channels::create_automation_channels;
pub use fsm::ClickAutomation;
pub use mapping::LogicalPoint;
pub use match_image::{BestMatch, ButtonMatcher, MatchConfig, Template};
pub use types::{AutomationCommand, AutomationEvent, RunState, StepOutcome};
