/// A filter could not be designed from the requested parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DesignError {
    /// The corner frequency is at or above the Nyquist frequency.
    OutsideNyquist,
    NegativeQ,
    NegativeFrequency,
}

impl From<biquad::Errors> for DesignError {
    fn from(val: biquad::Errors) -> Self {
        match val {
            biquad::Errors::OutsideNyquist => DesignError::OutsideNyquist,
            biquad::Errors::NegativeQ => DesignError::NegativeQ,
            biquad::Errors::NegativeFrequency => DesignError::NegativeFrequency,
        }
    }
}

/// Failures surfaced to the caller of the measurement pipeline.
///
/// Acquisition errors are fatal: the pipeline does not retry, and never substitutes
/// stale or zeroed samples for a block that could not be read.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The sample source failed to deliver a full block.
    Acquisition(E),
    FilterDesign(DesignError),
}

impl<E> From<DesignError> for Error<E> {
    fn from(val: DesignError) -> Self {
        Error::FilterDesign(val)
    }
}
