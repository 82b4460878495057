//! Sample word decoding and the bounded sample buffer.

/// Bytes per transmitted sample word (big-endian i16).
pub const SAMPLE_WORD_BYTES: usize = 2;

/// Reassemble a big-endian sample word into a signed sample.
///
/// `(msb << 8) | lsb` read as an unsigned word, then reinterpreted as two's
/// complement: words at or above 0x8000 map to `word - 65536`.
pub fn decode_word(msb: u8, lsb: u8) -> i16 {
    i16::from_be_bytes([msb, lsb])
}

/// Append-only, time-ordered sample storage capped at `max_len` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    max_len: usize,
}

impl SampleBuffer {
    pub fn new(max_len: usize) -> Self {
        Self {
            samples: Vec::with_capacity(max_len),
            max_len,
        }
    }

    /// Append a sample. Returns `false` (and drops the sample) when full.
    pub fn push(&mut self, sample: i16) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples.push(sample);
        true
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.max_len
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }
}
