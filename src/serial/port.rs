//! `ByteSource` backed by a real serial device.

use std::io::{self, Read};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use super::ByteSource;
use crate::error::{CaptureError, Result};

/// Upper bound for a single blocking read once bytes were reported ready.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

pub struct SerialSource {
    name: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialSource {
    /// Open `device` at `baud_rate`, 8N1 without flow control.
    pub fn open(device: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(device, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| CaptureError::SourceUnavailable {
                port: device.to_string(),
                source: e.into(),
            })?;

        log::info!("Serial port opened: device={}, baud={}", device, baud_rate);

        Ok(Self {
            name: device.to_string(),
            port: Some(port),
        })
    }

    fn port_mut(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotConnected,
                format!("serial port '{}' is closed", self.name),
            )
        })
    }
}

impl ByteSource for SerialSource {
    fn bytes_available(&mut self) -> io::Result<usize> {
        let ready = self.port_mut()?.bytes_to_read()?;
        Ok(ready as usize)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        Read::read_exact(self.port_mut()?, buf)
    }

    fn close(&mut self) {
        // Dropping the handle closes the file descriptor
        if self.port.take().is_some() {
            log::debug!("Serial port '{}' closed", self.name);
        }
    }
}
