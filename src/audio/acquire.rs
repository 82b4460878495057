//! Acquisition loop: poll the source, read sample words, fill the buffer.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use super::sample::{SAMPLE_WORD_BYTES, SampleBuffer, decode_word};
use crate::error::{CaptureError, Result};
use crate::serial::ByteSource;

/// Cooperative stop request, shared between the signal handler and the loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStatus {
    /// Buffer reached its limit
    Completed,
    /// Stopped by a cancel request; the buffer may be short or empty
    Interrupted,
}

#[derive(Debug)]
pub struct Acquisition {
    pub samples: SampleBuffer,
    pub status: AcquisitionStatus,
    pub elapsed: Duration,
}

/// One accepted sample, reported for progress output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleProgress {
    /// 1-based position in the buffer
    pub index: usize,
    pub msb: u8,
    pub lsb: u8,
    pub value: i16,
    pub elapsed: Duration,
}

impl fmt::Display for SampleProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sample {:04}: 0x{:02X} 0x{:02X} → {:6} (Time: {:.2} s)",
            self.index,
            self.msb,
            self.lsb,
            self.value,
            self.elapsed.as_secs_f64()
        )
    }
}

pub struct Acquirer {
    max_samples: usize,
    poll_interval: Duration,
}

impl Acquirer {
    pub fn new(max_samples: usize, poll_interval: Duration) -> Self {
        Self {
            max_samples,
            poll_interval,
        }
    }

    /// Read sample words until the buffer is full or `cancel` trips.
    ///
    /// A word is read only once at least two bytes are reported ready, and
    /// cancellation is only observed between words, so the stream never
    /// loses alignment. Source errors abort the loop as `ReadFailure`.
    pub fn run<S, F>(
        &self,
        source: &mut S,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<Acquisition>
    where
        S: ByteSource + ?Sized,
        F: FnMut(&SampleProgress),
    {
        let start = Instant::now();
        let mut samples = SampleBuffer::new(self.max_samples);
        let mut word = [0u8; SAMPLE_WORD_BYTES];
        let mut status = AcquisitionStatus::Completed;

        log::info!(
            "Acquisition started: max_samples={}, poll_interval={:?}",
            self.max_samples,
            self.poll_interval
        );

        while !samples.is_full() {
            if cancel.is_cancelled() {
                status = AcquisitionStatus::Interrupted;
                break;
            }

            let available = source
                .bytes_available()
                .map_err(CaptureError::ReadFailure)?;
            if available < SAMPLE_WORD_BYTES {
                self.wait_for_bytes();
                continue;
            }

            source
                .read_exact(&mut word)
                .map_err(CaptureError::ReadFailure)?;

            let value = decode_word(word[0], word[1]);
            let accepted = samples.push(value);
            debug_assert!(accepted);

            on_progress(&SampleProgress {
                index: samples.len(),
                msb: word[0],
                lsb: word[1],
                value,
                elapsed: start.elapsed(),
            });
        }

        let elapsed = start.elapsed();
        log::info!(
            "Acquisition stopped: status={:?}, samples={}, elapsed={:.2}s",
            status,
            samples.len(),
            elapsed.as_secs_f64()
        );

        Ok(Acquisition {
            samples,
            status,
            elapsed,
        })
    }

    fn wait_for_bytes(&self) {
        if self.poll_interval.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::mock::MockSource;

    fn words(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn fills_exactly_max_samples_in_arrival_order() {
        let mut source = MockSource::new(words(&[1, -2, 300, i16::MIN, i16::MAX, 42]));
        let acquirer = Acquirer::new(5, Duration::ZERO);

        let acq = acquirer.run(&mut source, &CancelToken::new(), |_| {}).unwrap();

        assert_eq!(acq.status, AcquisitionStatus::Completed);
        assert_eq!(acq.samples.as_slice(), &[1, -2, 300, i16::MIN, i16::MAX]);
    }

    #[test]
    fn never_reads_before_a_full_word_is_available() {
        let mut source = MockSource::new(words(&[10, 20, 30, 40])).trickle(1);
        let probe = source.probe();
        let acquirer = Acquirer::new(4, Duration::ZERO);

        let acq = acquirer.run(&mut source, &CancelToken::new(), |_| {}).unwrap();

        assert_eq!(acq.samples.as_slice(), &[10, 20, 30, 40]);
        assert_eq!(probe.misaligned_reads(), 0);
        assert_eq!(probe.reads(), 4);
    }

    #[test]
    fn odd_trailing_byte_is_never_consumed() {
        let mut bytes = words(&[5, 6]);
        bytes.push(0xAB);
        let mut source = MockSource::new(bytes).trickle(3);
        let probe = source.probe();
        let cancel = CancelToken::new();
        let acquirer = Acquirer::new(3, Duration::ZERO);

        let acq = acquirer
            .run(&mut source, &cancel, |p| {
                if p.index == 2 {
                    cancel.cancel();
                }
            })
            .unwrap();

        assert_eq!(acq.status, AcquisitionStatus::Interrupted);
        assert_eq!(acq.samples.as_slice(), &[5, 6]);
        assert_eq!(probe.reads(), 2);
        assert_eq!(probe.misaligned_reads(), 0);
    }

    #[test]
    fn progress_reports_every_sample() {
        let mut source = MockSource::new(vec![0x00, 0x01, 0xFF, 0xFE]);
        let acquirer = Acquirer::new(2, Duration::ZERO);
        let mut seen = Vec::new();

        acquirer
            .run(&mut source, &CancelToken::new(), |p| seen.push(*p))
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].index, seen[0].msb, seen[0].lsb, seen[0].value), (1, 0x00, 0x01, 1));
        assert_eq!((seen[1].index, seen[1].msb, seen[1].lsb, seen[1].value), (2, 0xFF, 0xFE, -2));
        assert!(seen[0].elapsed <= seen[1].elapsed);
    }

    #[test]
    fn progress_line_format() {
        let p = SampleProgress {
            index: 7,
            msb: 0x0A,
            lsb: 0xF0,
            value: 2800,
            elapsed: Duration::from_millis(1234),
        };
        assert_eq!(p.to_string(), "Sample 0007: 0x0A 0xF0 →   2800 (Time: 1.23 s)");

        let p = SampleProgress {
            index: 5000,
            msb: 0x80,
            lsb: 0x00,
            value: -32768,
            elapsed: Duration::ZERO,
        };
        assert_eq!(p.to_string(), "Sample 5000: 0x80 0x00 → -32768 (Time: 0.00 s)");
    }

    #[test]
    fn cancel_before_start_yields_empty_interrupted_buffer() {
        let mut source = MockSource::new(words(&[1, 2, 3]));
        let probe = source.probe();
        let cancel = CancelToken::new();
        cancel.cancel();

        let acq = Acquirer::new(3, Duration::ZERO)
            .run(&mut source, &cancel, |_| {})
            .unwrap();

        assert_eq!(acq.status, AcquisitionStatus::Interrupted);
        assert!(acq.samples.is_empty());
        assert_eq!(probe.reads(), 0);
    }

    #[test]
    fn cancel_while_waiting_for_bytes_stops_the_poll() {
        let mut source = MockSource::new(vec![]);
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let acq = Acquirer::new(10, Duration::from_millis(1))
            .run(&mut source, &cancel, |_| {})
            .unwrap();
        stopper.join().unwrap();

        assert_eq!(acq.status, AcquisitionStatus::Interrupted);
        assert!(acq.samples.is_empty());
    }

    #[test]
    fn read_error_aborts_with_read_failure() {
        let mut source = MockSource::new(words(&[1, 2, 3])).fail_on_read(1);

        let err = Acquirer::new(3, Duration::ZERO)
            .run(&mut source, &CancelToken::new(), |_| {})
            .unwrap_err();

        assert!(matches!(err, CaptureError::ReadFailure(_)));
    }
}
