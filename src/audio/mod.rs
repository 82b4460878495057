//! audio - sample acquisition, conditioning and WAV output
//!
//! Raw big-endian sample words are read off a `ByteSource` into a bounded
//! buffer, centered and peak-normalized to 16-bit PCM, then handed to an
//! `AudioSink`.

mod acquire;
mod condition;
mod sample;
mod sink;

pub use acquire::{Acquirer, AcquisitionStatus, CancelToken, SampleProgress};
pub use condition::condition;
pub use sink::{AudioSink, WavSink};
