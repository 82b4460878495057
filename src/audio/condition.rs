//! Signal conditioning: DC offset removal and peak normalization to i16.

use crate::error::{CaptureError, Result};

/// Target magnitude of the loudest sample after normalization.
pub const FULL_SCALE: f64 = i16::MAX as f64;

/// Normalized 16-bit PCM, same length as the buffer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBuffer {
    samples: Vec<i16>,
}

impl NormalizedBuffer {
    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Subtract the arithmetic mean from every sample.
pub fn remove_dc(samples: &[i16]) -> Result<Vec<f64>> {
    if samples.is_empty() {
        return Err(CaptureError::EmptyBuffer);
    }

    let mean = mean(samples);
    Ok(samples.iter().map(|&s| s as f64 - mean).collect())
}

fn mean(samples: &[i16]) -> f64 {
    // i64 sum is exact for any realistic buffer length
    let sum: i64 = samples.iter().map(|&s| s as i64).sum();
    sum as f64 / samples.len() as f64
}

fn peak(values: &[f64]) -> f64 {
    values.iter().map(|x| x.abs()).fold(0.0f64, f64::max)
}

/// Scale so the largest magnitude becomes `FULL_SCALE`, truncating toward zero.
pub fn normalize_peak(centered: &[f64]) -> Result<Vec<i16>> {
    if centered.is_empty() {
        return Err(CaptureError::EmptyBuffer);
    }

    let peak = peak(centered);
    if peak == 0.0 {
        return Err(CaptureError::ZeroPeak {
            samples: centered.len(),
        });
    }

    // Divide before scaling so the peak sample maps to exactly +/-1.0.
    // `as` truncates toward zero and saturates at the i16 bounds.
    Ok(centered
        .iter()
        .map(|&x| ((x / peak) * FULL_SCALE) as i16)
        .collect())
}

/// DC removal followed by peak normalization.
pub fn condition(samples: &[i16]) -> Result<NormalizedBuffer> {
    let centered = remove_dc(samples)?;
    let normalized = normalize_peak(&centered)?;

    log::debug!(
        "Conditioned {} samples: mean={:.3}, peak={:.3}",
        samples.len(),
        mean(samples),
        peak(&centered)
    );

    Ok(NormalizedBuffer {
        samples: normalized,
    })
}
