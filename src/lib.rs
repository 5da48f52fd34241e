#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod coefficients;
pub mod config;
pub mod error;
pub mod filter;
pub mod leq;
pub mod meter;
pub mod microphone;
pub mod source;

pub use coefficients::{Equalizer, Weighting};
pub use config::{Calibration, Config};
pub use error::{DesignError, Error};
pub use filter::SosFilter;
pub use leq::LeqAccumulator;
pub use meter::SplMeter;
pub use microphone::Microphone;
pub use source::{I2sSource, SampleSource};

pub type BiquadType = biquad::DirectForm2Transposed<f32>;

pub fn db_to_linear(db: f32) -> f32 {
    libm::powf(10.0, db / 20.0)
}
