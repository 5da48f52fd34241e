use biquad::{Biquad, Coefficients, Hertz, Type, Q_BUTTERWORTH_F32};
use heapless::Vec;

use crate::error::DesignError;
use crate::BiquadType;

pub const MAX_SECTION_COUNT: usize = 8;

/// A second-order section as tabulated in calibration data: `{b1, b2, -a1, -a2}`.
///
/// The numerator is normalized so that `b0 = 1`, and the feedback coefficients are
/// stored negated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SosSection {
    pub b1: f32,
    pub b2: f32,
    pub neg_a1: f32,
    pub neg_a2: f32,
}

impl SosSection {
    pub const fn new(b1: f32, b2: f32, neg_a1: f32, neg_a2: f32) -> Self {
        SosSection { b1, b2, neg_a1, neg_a2 }
    }

    /// The section in the sign convention of the biquad evaluator.
    pub fn coefficients(&self) -> Coefficients<f32> {
        Coefficients {
            a1: -self.neg_a1,
            a2: -self.neg_a2,
            b0: 1.0,
            b1: self.b1,
            b2: self.b2,
        }
    }
}

/// A cascade of biquad sections followed by a linear gain.
///
/// Delay-line state persists between calls to [`SosFilter::filter`], so a signal can be
/// fed in blocks of any size without discontinuities at block edges.
pub struct SosFilter {
    /// The linear gain, applied after the last section.
    gain: f32,
    /// Kept for restoring the sections on reset.
    coefficients: Vec<Coefficients<f32>, MAX_SECTION_COUNT>,
    /// The chain of biquad filters.
    sections: Vec<BiquadType, MAX_SECTION_COUNT>,
}

impl SosFilter {
    /// Create a new filter instance.
    ///
    /// # Arguments
    ///
    /// * `gain` - A linear gain for the filter.
    /// * `coefficients` - The biquads to apply, in order.
    pub fn new(gain: f32, coefficients: &[Coefficients<f32>]) -> Self {
        let mut filter = SosFilter {
            gain,
            coefficients: Vec::new(),
            sections: Vec::new(),
        };

        for c in coefficients {
            if filter.coefficients.push(*c).is_err() {
                panic!("Filter exceeds maximum allowed section count.");
            }
        }
        filter.reset();

        filter
    }

    /// Create a filter from tabulated `{b1, b2, -a1, -a2}` sections.
    pub fn from_table(gain: f32, table: &[SosSection]) -> Self {
        let mut coefficients: Vec<Coefficients<f32>, MAX_SECTION_COUNT> = Vec::new();

        for section in table {
            if coefficients.push(section.coefficients()).is_err() {
                panic!("Filter exceeds maximum allowed section count.");
            }
        }

        Self::new(gain, &coefficients)
    }

    /// The null filter: passes samples through and only sums their squares.
    pub fn identity() -> Self {
        Self::new(1.0, &[])
    }

    /// A second-order Butterworth high-pass, for microphones that need DC removal.
    pub fn dc_blocker(sample_rate_hz: f32, cutoff_hz: f32) -> Result<Self, DesignError> {
        let coefficients = Coefficients::<f32>::from_params(
            Type::HighPass,
            Hertz::<f32>::from_hz(sample_rate_hz)?,
            Hertz::<f32>::from_hz(cutoff_hz)?,
            Q_BUTTERWORTH_F32,
        )?;

        Ok(Self::new(1.0, &[coefficients]))
    }

    pub fn is_identity(&self) -> bool {
        self.sections.is_empty() && self.gain == 1.0
    }

    /// Clear the delay lines of all sections.
    pub fn reset(&mut self) {
        self.sections.clear();
        for c in &self.coefficients {
            // Both vectors share the same capacity.
            let _ = self.sections.push(BiquadType::new(*c));
        }
    }

    /// Filter a block in place and return the sum of squares of the output.
    pub fn filter(&mut self, samples: &mut [f32]) -> f64 {
        if self.is_identity() {
            return samples.iter().map(|&s| s as f64 * s as f64).sum();
        }

        let mut sum_sqr = 0.0;
        for sample in samples.iter_mut() {
            let mut y = *sample;
            for section in &mut self.sections {
                y = section.run(y);
            }
            y *= self.gain;

            *sample = y;
            sum_sqr += y as f64 * y as f64;
        }

        sum_sqr
    }
}
