//! Equivalent continuous level (Leq) integration.
//!
//! The accumulator sums squared samples until a window of `window_samples` is complete,
//! then emits the window's mean square and starts over. The window can be clamped to a
//! fixed level, which is how overload and noise-floor conditions are reported.

/// Running sum of squares over one Leq window.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LeqAccumulator {
    sum_sqr: f64,
    samples: usize,
    window_samples: usize,
    /// Mean square that the window is pinned to, after an overload.
    saturation: Option<f64>,
}

impl LeqAccumulator {
    pub fn new(window_samples: usize) -> Self {
        assert!(window_samples > 0, "Leq window must not be empty.");

        LeqAccumulator {
            sum_sqr: 0.0,
            samples: 0,
            window_samples,
            saturation: None,
        }
    }

    pub fn window_samples(&self) -> usize {
        self.window_samples
    }

    /// Samples accumulated in the current window.
    pub fn samples(&self) -> usize {
        self.samples
    }

    #[cfg(test)]
    fn sum_sqr(&self) -> f64 {
        self.sum_sqr
    }

    pub fn is_saturated(&self) -> bool {
        self.saturation.is_some()
    }

    pub fn reset(&mut self) {
        self.sum_sqr = 0.0;
        self.samples = 0;
        self.saturation = None;
    }

    /// Pin the current window to `mean_sqr`, discarding what was accumulated so far.
    ///
    /// Until the window completes, added blocks contribute `mean_sqr` per sample instead
    /// of their own energy, so the emitted mean square equals `mean_sqr`.
    pub fn saturate(&mut self, mean_sqr: f64) {
        self.sum_sqr = mean_sqr * self.samples as f64;
        self.saturation = Some(mean_sqr);
    }

    /// Replace the running sum by `mean_sqr` over the window so far, including the
    /// `incoming` samples of the block about to be added.
    ///
    /// Has no effect on a saturated window.
    pub fn floor(&mut self, mean_sqr: f64, incoming: usize) {
        if self.saturation.is_none() {
            self.sum_sqr = mean_sqr * (self.samples + incoming) as f64;
        }
    }

    /// Add the sum of squares of a block of `samples` samples.
    ///
    /// Returns the mean square of the window once it is complete, and resets.
    pub fn add(&mut self, sum_sqr: f64, samples: usize) -> Option<f64> {
        debug_assert!(self.samples < self.window_samples);

        self.sum_sqr += match self.saturation {
            Some(mean_sqr) => mean_sqr * samples as f64,
            None => sum_sqr,
        };
        self.samples += samples;

        if self.samples >= self.window_samples {
            let mean_sqr = self.sum_sqr / self.samples as f64;
            self.reset();

            Some(mean_sqr)
        } else {
            None
        }
    }
}
