mod common;

use spl_meter::{Config, SplMeter, Weighting};

use common::{flat_config, sine_block};

const BLOCK: usize = 1000;

/// Feed `windows` full Leq windows of a 24 bit sine and return the last Leq.
fn measure(config: &Config, amplitude: f64, frequency_hz: usize, windows: usize) -> f32 {
    let mut meter = SplMeter::<BLOCK>::new(config).unwrap();
    let mut last = None;

    for n in 0..windows * 48 {
        let block = sine_block::<BLOCK>(amplitude, frequency_hz, n * BLOCK);
        if let Some(leq) = meter.process_block(&block) {
            last = Some(leq);
        }
    }

    last.expect("at least one window")
}

fn expected_db(config: &Config, amplitude: f64) -> f32 {
    let calibration = config.calibration();
    let rms = amplitude / 2f64.sqrt();

    config.ref_db + config.offset_db + (20.0 * (rms / calibration.ref_amplitude as f64).log10()) as f32
}

#[test]
fn sine_through_flat_filters_matches_calibration_formula() {
    let config = flat_config();

    for amplitude in [5_000.0, 100_000.0, 594_566.0, 4_000_000.0] {
        let leq = measure(&config, amplitude, 1000, 1);
        let expected = expected_db(&config, amplitude);

        assert!(
            (leq - expected).abs() < 0.01,
            "amplitude {amplitude}: got {leq} dB, expected {expected} dB"
        );
    }
}

#[test]
fn reference_sine_reads_reference_level() {
    let config = flat_config();
    let calibration = config.calibration();

    // RMS equal to the reference amplitude
    let amplitude = calibration.ref_amplitude as f64 * 2f64.sqrt();
    let leq = measure(&config, amplitude, 1000, 1);

    assert!((leq - 94.0).abs() < 0.01, "got {leq} dB");
}

#[test]
fn offset_shifts_reading_linearly() {
    let base = flat_config();
    let shifted = Config {
        offset_db: 3.5,
        ..base
    };

    let difference = measure(&shifted, 100_000.0, 1000, 1) - measure(&base, 100_000.0, 1000, 1);
    assert!((difference - 3.5).abs() < 1e-3);
}

#[test]
fn a_weighting_is_flat_at_1khz_and_attenuates_100hz() {
    let flat = flat_config();
    let weighted = Config {
        weighting: Weighting::A,
        ..flat
    };
    let amplitude = 594_566.0;

    let at_1khz = measure(&weighted, amplitude, 1000, 2) - measure(&flat, amplitude, 1000, 2);
    let at_100hz = measure(&weighted, amplitude, 100, 2) - measure(&flat, amplitude, 100, 2);

    assert!(at_1khz.abs() < 0.1, "1 kHz: {at_1khz} dB");
    assert!((at_100hz + 19.1).abs() < 0.3, "100 Hz: {at_100hz} dB");
}

#[test]
fn microphone_presets_measure_1khz_like_flat() {
    let amplitude = 594_566.0;
    let flat = measure(&flat_config(), amplitude, 1000, 2);

    for preset in [Config::sph0645(), Config::inmp441()] {
        let config = Config {
            weighting: Weighting::Z,
            ..preset
        };
        let leq = measure(&config, amplitude, 1000, 2);

        assert!((leq - flat).abs() < 0.1, "{:?}: {leq} dB vs {flat} dB", config.equalizer);
    }
}

#[test]
fn dc_offset_of_silent_sph0645_floors_at_noise_level() {
    let config = Config {
        weighting: Weighting::Z,
        ..Config::sph0645()
    };
    let mut meter = SplMeter::<BLOCK>::new(&config).unwrap();

    // No sound, only a constant offset on the data line.
    let block = [20_000 << 8; BLOCK];
    let emitted: Vec<f32> = (0..2 * 48).filter_map(|_| meter.process_block(&block)).collect();

    assert_eq!(emitted.len(), 2);
    for leq in emitted {
        assert!((leq - config.noise_db).abs() < 0.01, "got {leq} dB");
    }
}
