//! Calibration filters: frequency weightings and microphone equalizers.
//!
//! Tabulated cascades are designed for [`TABLE_SAMPLE_RATE_HZ`] and stored as
//! `{b1, b2, -a1, -a2}` sections (see [`SosSection`]).
use crate::error::DesignError;
use crate::filter::{SosFilter, SosSection};

/// The sample rate that the tabulated filters were designed for.
pub const TABLE_SAMPLE_RATE_HZ: u32 = 48_000;

/// Cutoff of the generic DC blocker.
pub const DC_BLOCKER_CUTOFF_HZ: f32 = 10.0;

pub const A_WEIGHTING_GAIN: f32 = 0.169_994_948_147_430;
pub const A_WEIGHTING: [SosSection; 3] = [
    SosSection::new(-2.000_269_961_331_06, 1.000_270_561_427_19, -1.060_868_438_509_278, -0.163_987_445_885_926),
    SosSection::new(4.359_123_842_031_44, 3.091_202_657_838_84, 1.208_419_926_363_593, -0.273_166_998_428_332),
    SosSection::new(-0.709_303_034_897_59, -0.290_718_683_935_80, 1.982_242_159_753_048, -0.982_298_594_928_989),
];

// Negative gain only inverts the signal, the response magnitude is unaffected.
pub const C_WEIGHTING_GAIN: f32 = -0.491_647_169_337_140;
pub const C_WEIGHTING: [SosSection; 3] = [
    SosSection::new(1.460_438_575_820_470_8, 0.527_507_037_381_528_6, 1.994_614_455_993_025_2, -0.994_621_707_014_088_3),
    SosSection::new(0.237_622_240_493_950_9, 0.014_041_120_601_689_4, -1.339_658_560_842_274_9, -0.442_145_780_769_455_9),
    SosSection::new(-2.0, 1.0, 0.377_580_004_742_081_8, -0.035_636_575_668_043_0),
];

/// Knowles SPH0645LM4H-B, rev. B: DC blocker followed by low-frequency roll-off compensation.
///
/// The microphone output carries a DC offset, which the roll-off section alone would amplify.
pub const SPH0645_GAIN: f32 = 1.001_233_779_615_25;
pub const SPH0645: [SosSection; 2] = [
    SosSection::new(-1.0, 0.0, 0.9992, 0.0),
    SosSection::new(-1.988_897_663_539_382, 0.988_928_479_008_099, 1.993_853_376_183_491, -0.993_862_821_429_572),
];

/// InvenSense INMP441: low-frequency roll-off compensation.
pub const INMP441_GAIN: f32 = 1.001_978_346_546_96;
pub const INMP441: [SosSection; 1] = [SosSection::new(
    -1.986_920_458_344_451,
    0.986_963_226_946_616,
    1.995_178_510_504_166,
    -0.995_184_322_194_091,
)];

/// Frequency weighting applied before the Leq integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weighting {
    A,
    C,
    /// Flat response.
    Z,
}

impl Weighting {
    pub fn filter(self) -> SosFilter {
        match self {
            Weighting::A => SosFilter::from_table(A_WEIGHTING_GAIN, &A_WEIGHTING),
            Weighting::C => SosFilter::from_table(C_WEIGHTING_GAIN, &C_WEIGHTING),
            Weighting::Z => SosFilter::identity(),
        }
    }

    /// Whether the filter only exists for [`TABLE_SAMPLE_RATE_HZ`].
    pub fn is_tabulated(self) -> bool {
        self != Weighting::Z
    }
}

/// Microphone response correction, applied to the raw signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Equalizer {
    None,
    Sph0645,
    Inmp441,
    DcBlocker,
}

impl Equalizer {
    pub fn filter(self, sample_rate_hz: u32) -> Result<SosFilter, DesignError> {
        Ok(match self {
            Equalizer::None => SosFilter::identity(),
            Equalizer::Sph0645 => SosFilter::from_table(SPH0645_GAIN, &SPH0645),
            Equalizer::Inmp441 => SosFilter::from_table(INMP441_GAIN, &INMP441),
            Equalizer::DcBlocker => SosFilter::dc_blocker(sample_rate_hz as f32, DC_BLOCKER_CUTOFF_HZ)?,
        })
    }

    pub fn is_tabulated(self) -> bool {
        matches!(self, Equalizer::Sph0645 | Equalizer::Inmp441)
    }
}
