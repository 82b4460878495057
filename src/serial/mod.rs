//! serial - byte-stream source for sample acquisition
//!
//! The acquirer only needs two capabilities from the transport: how many
//! bytes are ready, and a blocking read of an exact count. `SourceGuard`
//! ties the transport's lifetime to a scope so it is closed exactly once.

use std::io;

mod guard;
mod port;

#[cfg(test)]
pub(crate) mod mock;

pub use guard::SourceGuard;
pub use port::SerialSource;

/// A byte-stream source such as an opened serial port.
pub trait ByteSource: Send {
    /// Number of bytes that can be read without blocking.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Fill `buf` completely, blocking until enough bytes arrive.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Release the underlying transport. Must tolerate repeated calls.
    fn close(&mut self);
}
