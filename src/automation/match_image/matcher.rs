//! Multi-scale template matching against captured frames.
//!
//! Scores are zero-mean normalized cross-correlation coefficients in
//! [-1, 1], so a uniform brightness or contrast shift between the template
//! and the screen does not move the score. imageproc's
//! `CrossCorrelationNormalized` does not subtract the window mean, so the
//! raw `CrossCorrelation` sums are normalized here with summed-area-table
//! window statistics instead.

use super::config::MatchConfig;
use super::template::Template;
use image::GrayImage;
use imageproc::template_matching::{MatchTemplateMethod, match_template};
use std::path::Path;

/// Variance below this counts as a flat window; flat image regions and
/// flat templates cannot correlate meaningfully.
const FLAT_EPSILON: f64 = 1e-6;

/// Best-scoring placement of one scaled template variant within a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub scale: f32,
    /// Top-left corner in frame (capture-pixel) coordinates.
    pub x: u32,
    pub y: u32,
    /// Dimensions of the scaled template that produced this score.
    pub width: u32,
    pub height: u32,
    /// Correlation coefficient in [-1, 1].
    pub confidence: f32,
}

/// An accepted match: the winning candidate with its center applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    /// Match center in frame (capture-pixel) coordinates.
    pub center_x: u32,
    pub center_y: u32,
    pub scale: f32,
    pub confidence: f32,
}

/// Finds the reference button in frames. Holds the template, or nothing if
/// loading failed, in which case every frame reports no match.
pub struct ButtonMatcher {
    template: Option<Template>,
    config: MatchConfig,
}

impl ButtonMatcher {
    /// Load the template from disk. A missing or unreadable file disables
    /// detection for the process lifetime rather than failing.
    pub fn from_file(path: impl AsRef<Path>, config: MatchConfig) -> Self {
        let path = path.as_ref();
        let template = match Template::load(path) {
            Ok(template) => Some(template),
            Err(e) => {
                log::warn!("Detection disabled: {e}");
                None
            }
        };
        Self { template, config }
    }

    pub fn with_template(template: Template, config: MatchConfig) -> Self {
        Self {
            template: Some(template),
            config,
        }
    }

    /// Whether a template is loaded and matching can run at all.
    pub fn is_ready(&self) -> bool {
        self.template.is_some()
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find the best placement of the template in `frame` across all scale
    /// factors, or None when nothing clears the confidence threshold.
    pub fn find_best(&self, frame: &GrayImage) -> Option<BestMatch> {
        let template = self.template.as_ref()?;
        let stats = WindowStats::new(frame);

        let mut candidates = Vec::with_capacity(self.config.scale_factors.len());
        for &scale in &self.config.scale_factors {
            let Some(scaled) = template.scaled(scale, self.config.min_template_dim) else {
                continue;
            };
            if scaled.width() > frame.width() || scaled.height() > frame.height() {
                continue;
            }
            if let Some(candidate) = best_at_scale(frame, &stats, &scaled, scale) {
                candidates.push(candidate);
            }
        }

        self.accept(best_candidate(candidates)?)
    }

    /// Apply the threshold gate and center offset to the winning candidate.
    pub(crate) fn accept(&self, candidate: MatchCandidate) -> Option<BestMatch> {
        if candidate.confidence < self.config.confidence_threshold {
            return None;
        }
        Some(BestMatch {
            center_x: candidate.x + candidate.width / 2,
            center_y: candidate.y + candidate.height / 2,
            scale: candidate.scale,
            confidence: candidate.confidence,
        })
    }
}

/// Correlate one scaled template variant across the whole frame and keep
/// the global maximum; the first position wins on ties.
fn best_at_scale(
    frame: &GrayImage,
    stats: &WindowStats,
    scaled: &GrayImage,
    scale: f32,
) -> Option<MatchCandidate> {
    let (t_mean, t_centered_sq) = template_stats(scaled);
    if t_centered_sq < FLAT_EPSILON {
        return None;
    }

    let cross = match_template(frame, scaled, MatchTemplateMethod::CrossCorrelation);

    let width = scaled.width();
    let height = scaled.height();
    let n = f64::from(width) * f64::from(height);

    let mut best_score = f32::MIN;
    let mut best_pos = (0u32, 0u32);
    for (x, y, pixel) in cross.enumerate_pixels() {
        let (sum, sum_sq) = stats.window(x, y, width, height);
        let covariance = f64::from(pixel[0]) - t_mean * sum;
        let window_var = sum_sq - sum * sum / n;
        let score = if window_var < FLAT_EPSILON {
            0.0
        } else {
            (covariance / (window_var * t_centered_sq).sqrt()).clamp(-1.0, 1.0) as f32
        };
        if score > best_score {
            best_score = score;
            best_pos = (x, y);
        }
    }

    Some(MatchCandidate {
        scale,
        x: best_pos.0,
        y: best_pos.1,
        width,
        height,
        confidence: best_score,
    })
}

/// Strict maximum over per-scale candidates: a later candidate replaces the
/// current best only with a strictly greater confidence, so the
/// earliest-tested scale wins ties.
pub(crate) fn best_candidate(candidates: Vec<MatchCandidate>) -> Option<MatchCandidate> {
    let mut best: Option<MatchCandidate> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.confidence <= current.confidence => {}
            _ => best = Some(candidate),
        }
    }
    best
}

fn template_stats(template: &GrayImage) -> (f64, f64) {
    let n = f64::from(template.width()) * f64::from(template.height());
    let sum: f64 = template.pixels().map(|p| f64::from(p.0[0])).sum();
    let mean = sum / n;
    let centered_sq = template
        .pixels()
        .map(|p| {
            let d = f64::from(p.0[0]) - mean;
            d * d
        })
        .sum();
    (mean, centered_sq)
}

/// Summed-area tables over the frame, giving per-window sum and
/// sum-of-squares in constant time.
struct WindowStats {
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
    /// Table row stride, frame width + 1.
    stride: usize,
}

impl WindowStats {
    fn new(frame: &GrayImage) -> Self {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let stride = width + 1;

        let mut sum = vec![0.0; stride * (height + 1)];
        let mut sum_sq = vec![0.0; stride * (height + 1)];
        for y in 0..height {
            for x in 0..width {
                let value = f64::from(frame.get_pixel(x as u32, y as u32).0[0]);
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = value + sum[idx - 1] + sum[idx - stride] - sum[idx - stride - 1];
                sum_sq[idx] =
                    value * value + sum_sq[idx - 1] + sum_sq[idx - stride] - sum_sq[idx - stride - 1];
            }
        }

        Self {
            sum,
            sum_sq,
            stride,
        }
    }

    /// Sum and sum-of-squares over the window with top-left (x, y).
    fn window(&self, x: u32, y: u32, width: u32, height: u32) -> (f64, f64) {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + width as usize, y0 + height as usize);
        let at = |table: &[f64], col: usize, row: usize| table[row * self.stride + col];

        let sum = at(&self.sum, x1, y1) - at(&self.sum, x0, y1) - at(&self.sum, x1, y0)
            + at(&self.sum, x0, y0);
        let sum_sq = at(&self.sum_sq, x1, y1) - at(&self.sum_sq, x0, y1) - at(&self.sum_sq, x1, y0)
            + at(&self.sum_sq, x0, y0);
        (sum, sum_sq)
    }
}
