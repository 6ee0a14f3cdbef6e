//! Host serial port adapter
//!
//! Wraps a `serialport` handle in the `embedded-io` traits so the
//! transmit loop can drive it through [`billsim_hal::Transport`].

use std::fmt;
use std::io;
use std::time::Duration;

use billsim_hal::{DataBits, Parity, StopBits, UartConfig};
use serialport::SerialPort;

/// Read timeout; reads only start once bytes are known to be waiting
const READ_TIMEOUT_MS: u64 = 50;

/// Serial line errors
#[derive(Debug)]
pub enum LineError {
    /// Opening or querying the port failed
    Serial(serialport::Error),
    /// Reading or writing failed
    Io(io::Error),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Serial(e) => write!(f, "serial port: {e}"),
            LineError::Io(e) => write!(f, "line I/O: {e}"),
        }
    }
}

impl std::error::Error for LineError {}

impl From<serialport::Error> for LineError {
    fn from(e: serialport::Error) -> Self {
        LineError::Serial(e)
    }
}

impl From<io::Error> for LineError {
    fn from(e: io::Error) -> Self {
        LineError::Io(e)
    }
}

impl embedded_io::Error for LineError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            LineError::Serial(e) => match e.kind {
                serialport::ErrorKind::NoDevice => embedded_io::ErrorKind::NotFound,
                serialport::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
                serialport::ErrorKind::Io(kind) => io_kind(kind),
                _ => embedded_io::ErrorKind::Other,
            },
            LineError::Io(e) => io_kind(e.kind()),
        }
    }
}

fn io_kind(kind: io::ErrorKind) -> embedded_io::ErrorKind {
    match kind {
        io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
        io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
        io::ErrorKind::NotConnected => embedded_io::ErrorKind::NotConnected,
        io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
        io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
        io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
        io::ErrorKind::WriteZero => embedded_io::ErrorKind::WriteZero,
        _ => embedded_io::ErrorKind::Other,
    }
}

/// An open serial port
pub struct SerialLine {
    port: Box<dyn SerialPort>,
}

impl SerialLine {
    /// Open `path` with the given line settings
    pub fn open(path: &str, config: &UartConfig) -> Result<Self, LineError> {
        let port = serialport::new(path, config.baudrate)
            .data_bits(match config.data_bits {
                DataBits::Seven => serialport::DataBits::Seven,
                DataBits::Eight => serialport::DataBits::Eight,
            })
            .parity(match config.parity {
                Parity::None => serialport::Parity::None,
                Parity::Even => serialport::Parity::Even,
                Parity::Odd => serialport::Parity::Odd,
            })
            .stop_bits(match config.stop_bits {
                StopBits::One => serialport::StopBits::One,
                StopBits::Two => serialport::StopBits::Two,
            })
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;

        // Drop anything the host sent before we were listening
        port.clear(serialport::ClearBuffer::Input)?;

        Ok(Self { port })
    }

    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl embedded_io::ErrorType for SerialLine {
    type Error = LineError;
}

impl embedded_io::Read for SerialLine {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(io::Read::read(&mut self.port, buf)?)
    }
}

impl embedded_io::ReadReady for SerialLine {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.bytes_to_read()? > 0)
    }
}

impl embedded_io::Write for SerialLine {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(io::Write::write(&mut self.port, buf)?)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(io::Write::flush(&mut self.port)?)
    }
}
