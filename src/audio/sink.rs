//! Audio output sinks.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::{CaptureError, Result};

/// Destination for finished mono 16-bit PCM.
pub trait AudioSink {
    fn write(&mut self, path: &Path, sample_rate: u32, samples: &[i16]) -> Result<()>;
}

/// Writes a mono, 16-bit integer PCM WAV file.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavSink;

impl WavSink {
    fn spec(sample_rate: u32) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }
}

impl AudioSink for WavSink {
    fn write(&mut self, path: &Path, sample_rate: u32, samples: &[i16]) -> Result<()> {
        let encode_err = |source| CaptureError::EncodeFailure {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = WavWriter::create(path, Self::spec(sample_rate)).map_err(encode_err)?;
        for &sample in samples {
            writer.write_sample(sample).map_err(encode_err)?;
        }
        writer.finalize().map_err(encode_err)?;

        log::info!(
            "WAV written: path={}, rate={}Hz, samples={}",
            path.display(),
            sample_rate,
            samples.len()
        );
        Ok(())
    }
}
