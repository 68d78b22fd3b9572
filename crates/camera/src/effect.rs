//! Letterbox bars shown while targeting.

use std::fmt::Debug;

/// Visual effect with a single coverage amount.
pub trait CoverageEffect: Debug {
    /// Current coverage.
    fn coverage(&self) -> f32;

    /// Set the coverage.
    fn set_coverage(&mut self, coverage: f32);
}

/// Cinematic bars at the top and bottom of the screen.
///
/// `coverage` is the fraction of the viewport hidden, split evenly between
/// the two bars.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LetterboxBars {
    coverage: f32,
}

impl LetterboxBars {
    /// Bars fully retracted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Height in pixels of each bar for a viewport `viewport_height` tall.
    pub fn bar_height(&self, viewport_height: u32) -> u32 {
        (viewport_height as f32 * self.coverage * 0.5).round() as u32
    }
}

impl CoverageEffect for LetterboxBars {
    fn coverage(&self) -> f32 {
        self.coverage
    }

    fn set_coverage(&mut self, coverage: f32) {
        self.coverage = if coverage.is_finite() {
            coverage.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_is_clamped() {
        let mut bars = LetterboxBars::new();
        bars.set_coverage(1.5);
        assert_eq!(bars.coverage(), 1.0);
        bars.set_coverage(f32::NAN);
        assert_eq!(bars.coverage(), 0.0);
    }

    #[test]
    fn bar_height_splits_coverage() {
        let mut bars = LetterboxBars::new();
        bars.set_coverage(0.2);
        assert_eq!(bars.bar_height(720), 72);
    }
}
