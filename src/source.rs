use embedded_io::{Read, ReadExactError};

/// Size of an I2S word on the wire, in bytes.
pub const SAMPLE_SIZE: usize = 4;

// Stack buffer for decoding, a whole number of words.
const CHUNK_SIZE: usize = 64 * SAMPLE_SIZE;

/// Supplies blocks of `N` raw samples.
///
/// `fetch_block` blocks until a full block is available. There is no partial result:
/// the block is either completely filled or an error is returned.
pub trait SampleSource<const N: usize> {
    type Error;

    fn fetch_block(&mut self, block: &mut [i32; N]) -> Result<(), Self::Error>;
}

impl<T: SampleSource<N>, const N: usize> SampleSource<N> for &mut T {
    type Error = T::Error;

    fn fetch_block(&mut self, block: &mut [i32; N]) -> Result<(), Self::Error> {
        T::fetch_block(self, block)
    }
}

/// Reads little-endian 32 bit I2S words from a byte stream, e.g. a DMA-backed driver.
pub struct I2sSource<R> {
    reader: R,
}

impl<R: Read> I2sSource<R> {
    pub fn new(reader: R) -> Self {
        I2sSource { reader }
    }
}

impl<R: Read, const N: usize> SampleSource<N> for I2sSource<R> {
    type Error = ReadExactError<R::Error>;

    fn fetch_block(&mut self, block: &mut [i32; N]) -> Result<(), Self::Error> {
        let mut buffer = [0u8; CHUNK_SIZE];

        for samples in block.chunks_mut(CHUNK_SIZE / SAMPLE_SIZE) {
            let bytes = &mut buffer[..samples.len() * SAMPLE_SIZE];
            self.reader.read_exact(bytes)?;

            for (sample, word) in samples.iter_mut().zip(bytes.chunks_exact(SAMPLE_SIZE)) {
                *sample = i32::from_le_bytes([word[0], word[1], word[2], word[3]]);
            }
        }

        Ok(())
    }
}
