use core::time::Duration;

use static_assertions::const_assert;

use crate::coefficients::{Equalizer, Weighting, TABLE_SAMPLE_RATE_HZ};
use crate::db_to_linear;

/// Width of an I2S data slot, in bits. Raw samples are left-justified within it.
pub const SAMPLE_BITS: u32 = 32;

pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 48_000;

// 125 ms per block
pub const DEFAULT_BLOCK_SIZE: usize = DEFAULT_SAMPLE_RATE_HZ as usize / 8;

pub const DEFAULT_LEQ_PERIOD: Duration = Duration::from_secs(1);

const_assert!(DEFAULT_BLOCK_SIZE > 0);
// Leq windows span a whole number of blocks.
const_assert!(DEFAULT_SAMPLE_RATE_HZ as usize % DEFAULT_BLOCK_SIZE == 0);
const_assert!(DEFAULT_SAMPLE_RATE_HZ == TABLE_SAMPLE_RATE_HZ);

/// Measurement configuration, taken from the microphone datasheet plus a linear offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Output level (dBFS) at `ref_db`.
    pub sensitivity_db: f32,
    /// Sound level at which the sensitivity is specified (dB SPL).
    pub ref_db: f32,
    /// Number of valid bits in a sample.
    pub mic_bits: u32,
    /// Linear calibration offset (dB).
    pub offset_db: f32,
    /// Acoustic overload point (dB SPL).
    pub overload_db: f32,
    /// Noise floor (dB SPL).
    pub noise_db: f32,
    pub leq_period: Duration,
    pub sample_rate_hz: u32,
    pub equalizer: Equalizer,
    pub weighting: Weighting,
}

impl Config {
    /// Knowles SPH0645LM4H-B.
    pub const fn sph0645() -> Self {
        Config {
            sensitivity_db: -26.0,
            ref_db: 94.0,
            mic_bits: 24,
            offset_db: 0.0,
            overload_db: 120.0,
            noise_db: 29.0,
            leq_period: DEFAULT_LEQ_PERIOD,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            equalizer: Equalizer::Sph0645,
            weighting: Weighting::A,
        }
    }

    /// InvenSense INMP441.
    pub const fn inmp441() -> Self {
        Config {
            noise_db: 33.0,
            equalizer: Equalizer::Inmp441,
            ..Self::sph0645()
        }
    }

    /// Number of samples integrated into one Leq value.
    pub fn window_samples(&self) -> usize {
        (self.sample_rate_hz as u128 * self.leq_period.as_micros() / 1_000_000) as usize
    }

    /// Check the configuration for programming errors.
    ///
    /// # Panics
    ///
    /// On any setting that would make the measurement meaningless.
    pub fn validate(&self) {
        assert!(self.sample_rate_hz > 0, "Sample rate must be positive.");
        assert!(
            (2..=SAMPLE_BITS).contains(&self.mic_bits),
            "Microphone bit width must be within 2..=32."
        );
        assert!(self.window_samples() > 0, "Leq period is shorter than one sample.");
        assert!(
            self.overload_db > self.noise_db,
            "Overload threshold must be above the noise floor."
        );
        assert!(
            !(self.weighting.is_tabulated() || self.equalizer.is_tabulated())
                || self.sample_rate_hz == TABLE_SAMPLE_RATE_HZ,
            "Tabulated filters require a 48 kHz sample rate."
        );
    }

    /// Derive the immutable calibration constants.
    pub fn calibration(&self) -> Calibration {
        self.validate();

        let full_scale = ((1i64 << (self.mic_bits - 1)) - 1) as f32;

        Calibration {
            ref_amplitude: db_to_linear(self.sensitivity_db) * full_scale,
            ref_db: self.ref_db,
            offset_db: self.offset_db,
            overload_db: self.overload_db,
            noise_db: self.noise_db,
            shift: SAMPLE_BITS - self.mic_bits,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::sph0645()
    }
}

/// Constants that map sample amplitudes to dB SPL.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Sample amplitude (RMS) that corresponds to `ref_db`.
    pub ref_amplitude: f32,
    pub ref_db: f32,
    pub offset_db: f32,
    pub overload_db: f32,
    pub noise_db: f32,
    /// Bits to discard from a raw sample.
    pub shift: u32,
}

impl Calibration {
    /// Convert a raw I2S word to a sample with only the valid bits, keeping the sign.
    pub fn convert(&self, raw: i32) -> f32 {
        (raw >> self.shift) as f32
    }

    pub fn rms_to_db(&self, rms: f64) -> f32 {
        let relative = libm::log10(rms / self.ref_amplitude as f64);
        self.offset_db + self.ref_db + (20.0 * relative) as f32
    }

    /// Mean square of a signal at the given level; the inverse of [`Calibration::rms_to_db`].
    pub fn db_to_mean_sqr(&self, db: f32) -> f64 {
        let rms =
            self.ref_amplitude as f64 * libm::pow(10.0, (db - self.offset_db - self.ref_db) as f64 / 20.0);
        rms * rms
    }
}
