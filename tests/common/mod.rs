#![allow(dead_code)]

use spl_meter::{Calibration, Config, Equalizer, Weighting};

pub const SAMPLE_RATE_HZ: usize = 48_000;

/// No equalization, no weighting.
pub fn flat_config() -> Config {
    Config {
        equalizer: Equalizer::None,
        weighting: Weighting::Z,
        ..Config::default()
    }
}

/// Peak amplitude (in valid-bit units) of a sine at `db` SPL.
pub fn sine_amplitude(calibration: &Calibration, db: f32) -> f64 {
    (2.0 * calibration.db_to_mean_sqr(db)).sqrt()
}

/// `N` raw I2S words of a sine, starting at absolute sample index `start`.
pub fn sine_block<const N: usize>(amplitude: f64, frequency_hz: usize, start: usize) -> [i32; N] {
    let mut block = [0i32; N];
    for (i, word) in block.iter_mut().enumerate() {
        let phase = ((start + i) * frequency_hz) % SAMPLE_RATE_HZ;
        let value = amplitude * (2.0 * std::f64::consts::PI * phase as f64 / SAMPLE_RATE_HZ as f64).sin();
        // 24 valid bits, left-justified in the 32 bit slot
        *word = (value.round() as i32) << 8;
    }
    block
}

pub fn power_sum_db(levels: &[(f32, usize)]) -> f32 {
    let total: usize = levels.iter().map(|(_, n)| n).sum();
    let energy: f64 = levels
        .iter()
        .map(|&(db, n)| 10f64.powf(db as f64 / 10.0) * n as f64)
        .sum();
    (10.0 * (energy / total as f64).log10()) as f32
}
