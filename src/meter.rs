use crate::config::{Calibration, Config};
use crate::error::DesignError;
use crate::filter::SosFilter;
use crate::leq::LeqAccumulator;

/// Converts blocks of raw microphone samples into Leq values in dB SPL.
///
/// Every block is equalized and then weighted. The equalized (Z-weighted) level of the
/// block decides whether the window is clamped. The weighted energy is what gets
/// integrated.
pub struct SplMeter<const N: usize> {
    calibration: Calibration,
    equalizer: SosFilter,
    weighting: SosFilter,
    leq: LeqAccumulator,
    overload_mean_sqr: f64,
    noise_mean_sqr: f64,
    samples: [f32; N],
}

impl<const N: usize> SplMeter<N> {
    pub fn new(config: &Config) -> Result<Self, DesignError> {
        let calibration = config.calibration();
        let equalizer = config.equalizer.filter(config.sample_rate_hz)?;
        let weighting = config.weighting.filter();

        Ok(Self::with_filters(
            calibration,
            config.window_samples(),
            equalizer,
            weighting,
        ))
    }

    /// Create a meter with custom filters.
    ///
    /// # Arguments
    ///
    /// * `calibration` - Level conversion and clamp thresholds.
    /// * `window_samples` - Number of samples per Leq value.
    /// * `equalizer` - Microphone response correction.
    /// * `weighting` - Frequency weighting.
    pub fn with_filters(
        calibration: Calibration,
        window_samples: usize,
        equalizer: SosFilter,
        weighting: SosFilter,
    ) -> Self {
        assert!(N > 0, "Sample block must not be empty.");

        info!(
            "Leq window: {} samples, blocks of {} samples, reference amplitude {}",
            window_samples,
            N,
            calibration.ref_amplitude
        );

        SplMeter {
            calibration,
            equalizer,
            weighting,
            leq: LeqAccumulator::new(window_samples),
            overload_mean_sqr: calibration.db_to_mean_sqr(calibration.overload_db),
            noise_mean_sqr: calibration.db_to_mean_sqr(calibration.noise_db),
            samples: [0.0; N],
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn leq(&self) -> &LeqAccumulator {
        &self.leq
    }

    /// Restart measurement: clears filter histories and the current Leq window.
    pub fn reset(&mut self) {
        self.equalizer.reset();
        self.weighting.reset();
        self.leq.reset();
    }

    /// Process one block of raw I2S words.
    ///
    /// Returns the Leq of the window in dB, once the window is complete.
    pub fn process_block(&mut self, raw: &[i32; N]) -> Option<f32> {
        for (sample, &word) in self.samples.iter_mut().zip(raw.iter()) {
            *sample = self.calibration.convert(word);
        }

        let sum_sqr_eq = self.equalizer.filter(&mut self.samples);
        let sum_sqr_weighted = self.weighting.filter(&mut self.samples);

        let short_rms = libm::sqrt(sum_sqr_eq / N as f64);
        let short_db = self.calibration.rms_to_db(short_rms);

        if short_db > self.calibration.overload_db {
            warn!("Acoustic overload: {} dB", short_db);
            self.leq.saturate(self.overload_mean_sqr);
        } else if short_db.is_nan() || short_db < self.calibration.noise_db {
            trace!("Below noise floor: {} dB", short_db);
            self.leq.floor(self.noise_mean_sqr, N);
        }

        let mean_sqr = self.leq.add(sum_sqr_weighted, N)?;
        let leq_db = self.calibration.rms_to_db(libm::sqrt(mean_sqr));

        // A weighting filter can cancel an in-range signal entirely (e.g. DC through A).
        let leq_db = if leq_db.is_finite() {
            leq_db
        } else {
            self.calibration.noise_db
        };
        debug!("Leq: {} dB", leq_db);

        Some(leq_db)
    }

    /// Like [`SplMeter::process_block`], for a slice that must hold exactly `N` samples.
    ///
    /// # Panics
    ///
    /// If the slice length differs from the block size.
    pub fn process_samples(&mut self, raw: &[i32]) -> Option<f32> {
        match <&[i32; N]>::try_from(raw) {
            Ok(block) => self.process_block(block),
            Err(_) => panic!("Expected a block of {} samples, got {}.", N, raw.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{Equalizer, Weighting};

    fn flat_config() -> Config {
        Config {
            equalizer: Equalizer::None,
            weighting: Weighting::Z,
            ..Config::default()
        }
    }

    #[test]
    fn full_scale_square_wave_is_reference_level_plus_sensitivity() {
        let config = Config {
            overload_db: 130.0,
            ..flat_config()
        };
        let mut meter = SplMeter::<4_000>::new(&config).unwrap();

        let block = [0x7FFF_FF00; 4_000];
        let mut leq = None;
        for _ in 0..12 {
            leq = meter.process_block(&block);
        }

        // Full scale is 26 dB above the 94 dB reference.
        assert!((leq.unwrap() - 120.0).abs() < 1e-3);
    }

    #[test]
    fn emits_once_per_window() {
        let mut meter = SplMeter::<6_000>::new(&flat_config()).unwrap();
        let block = [1 << 20; 6_000];

        let emitted: std::vec::Vec<bool> = (0..16).map(|_| meter.process_block(&block).is_some()).collect();
        let expected: std::vec::Vec<bool> = (1..=16).map(|n| n % 8 == 0).collect();

        assert_eq!(emitted, expected);
    }

    #[test]
    fn reset_restarts_window() {
        let mut meter = SplMeter::<6_000>::new(&flat_config()).unwrap();
        let block = [1 << 20; 6_000];

        meter.process_block(&block);
        assert_eq!(meter.leq().samples(), 6_000);
        meter.reset();
        assert_eq!(meter.leq().samples(), 0);
    }

    #[test]
    #[should_panic(expected = "Expected a block of 8 samples")]
    fn wrong_block_length_panics() {
        let mut meter = SplMeter::<8>::with_filters(
            flat_config().calibration(),
            16,
            SosFilter::identity(),
            SosFilter::identity(),
        );
        meter.process_samples(&[0; 7]);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_block_panics() {
        let _ = SplMeter::<0>::new(&flat_config());
    }
}
