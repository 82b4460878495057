//! Scoped ownership of a `ByteSource`.

use super::ByteSource;

/// Owns a source and closes it exactly once: on `release`, or on drop for
/// every other exit path (early return, `?`, unwinding).
pub struct SourceGuard<S: ByteSource> {
    source: S,
    label: String,
    released: bool,
}

impl<S: ByteSource> SourceGuard<S> {
    pub fn new(source: S, label: impl Into<String>) -> Self {
        Self {
            source,
            label: label.into(),
            released: false,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Close the source now instead of at end of scope.
    pub fn release(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.source.close();
        log::info!("Released byte source '{}'", self.label);
    }
}

impl<S: ByteSource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        self.close_once();
    }
}
