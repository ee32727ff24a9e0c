//! Configuration for template matching.
//!
//! These are fixed operating constants, not user-facing settings.

#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum correlation required to accept a match. The gate is
    /// inclusive: a score exactly at the threshold passes.
    pub confidence_threshold: f32,
    /// Template scale factors tried on every frame, in order.
    pub scale_factors: Vec<f32>,
    /// Scaled templates smaller than this in either dimension are skipped;
    /// they are too small to correlate meaningfully.
    pub min_template_dim: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            scale_factors: vec![0.5, 0.75, 1.0, 1.25, 1.5, 2.0],
            min_template_dim: 10,
        }
    }
}
