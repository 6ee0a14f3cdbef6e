//! Serial line abstractions
//!
//! The acceptor never blocks waiting for the host: it asks for whatever
//! bytes are already buffered and, when a poll arrived, writes one frame
//! back.

use embedded_io::{Read, ReadReady, Write};

/// Serial transport used by the transmit loop
///
/// Implemented for every `embedded-io` stream that can report whether
/// bytes are waiting. Both operations fail once the underlying line is
/// closed.
pub trait Transport {
    /// Error type for line operations
    type Error;

    /// Read every byte currently buffered on the line into `buf`
    ///
    /// Never waits for more data. Returns 0 when nothing is pending.
    fn receive_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write a complete frame and flush it onto the line
    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Read + Write + ReadReady> Transport for T {
    type Error = T::Error;

    fn receive_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        while filled < buf.len() && self.read_ready()? {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.write_all(frame)?;
        self.flush()
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    /// Line settings of the acceptor poll/response protocol: 9600 7E1
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Seven,
            parity: Parity::Even,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}
