use crate::error::Error;
use crate::meter::SplMeter;
use crate::source::SampleSource;

/// A sample source wired to a meter: fetch, process, report.
pub struct Microphone<S, const N: usize> {
    source: S,
    meter: SplMeter<N>,
    samples: [i32; N],
}

impl<S: SampleSource<N>, const N: usize> Microphone<S, N> {
    pub fn new(source: S, meter: SplMeter<N>) -> Self {
        Microphone {
            source,
            meter,
            samples: [0; N],
        }
    }

    /// Discard the first block, the microphone may need time to start up and settle.
    pub fn start(&mut self) -> Result<(), Error<S::Error>> {
        self.source.fetch_block(&mut self.samples).map_err(Error::Acquisition)?;
        self.meter.reset();

        info!("Microphone started");
        Ok(())
    }

    /// Fetch and process one block.
    ///
    /// Blocks until the source delivers. `Ok(None)` means the Leq window is not complete
    /// yet; a source failure is returned as [`Error::Acquisition`].
    pub fn read_leq(&mut self) -> Result<Option<f32>, Error<S::Error>> {
        self.source.fetch_block(&mut self.samples).map_err(Error::Acquisition)?;

        Ok(self.meter.process_block(&self.samples))
    }

    pub fn meter(&self) -> &SplMeter<N> {
        &self.meter
    }
}
