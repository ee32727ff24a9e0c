//! Image matching for the button detector: template loading, multi-scale
//! normalized cross-correlation, and candidate selection.

pub mod config;
pub mod matcher;
pub mod template;


pub use config::MatchConfig;
pub use matcher::{BestMatch, ButtonMatcher, MatchCandidate};
pub use template::Template;
