//! Scripted in-memory `ByteSource` for tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ByteSource;

/// Counters observable after the source has been moved into a guard.
#[derive(Debug, Default)]
pub(crate) struct MockProbe {
    closes: AtomicUsize,
    reads: AtomicUsize,
    misaligned_reads: AtomicUsize,
}

impl MockProbe {
    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Reads requested while fewer bytes were reported available.
    pub(crate) fn misaligned_reads(&self) -> usize {
        self.misaligned_reads.load(Ordering::SeqCst)
    }
}

pub(crate) struct MockSource {
    pending: VecDeque<u8>,
    visible: usize,
    trickle: usize,
    fail_on_read: Option<usize>,
    probe: Arc<MockProbe>,
}

impl MockSource {
    /// All bytes are reported available from the first poll.
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self {
            pending: bytes.into(),
            visible: 0,
            trickle: usize::MAX,
            fail_on_read: None,
            probe: Arc::new(MockProbe::default()),
        }
    }

    /// Reveal only `per_poll` more bytes on each availability query.
    pub(crate) fn trickle(mut self, per_poll: usize) -> Self {
        self.trickle = per_poll;
        self
    }

    /// Make the n-th read (0-based) fail with an I/O error.
    pub(crate) fn fail_on_read(mut self, n: usize) -> Self {
        self.fail_on_read = Some(n);
        self
    }

    pub(crate) fn probe(&self) -> Arc<MockProbe> {
        self.probe.clone()
    }
}

impl ByteSource for MockSource {
    fn bytes_available(&mut self) -> io::Result<usize> {
        self.visible = self
            .visible
            .saturating_add(self.trickle)
            .min(self.pending.len());
        Ok(self.visible)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let n = self.probe.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_read == Some(n) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }
        if buf.len() > self.visible {
            self.probe.misaligned_reads.fetch_add(1, Ordering::SeqCst);
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        for slot in buf.iter_mut() {
            *slot = self.pending.pop_front().unwrap_or_default();
        }
        self.visible -= buf.len();
        Ok(())
    }

    fn close(&mut self) {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
    }
}
