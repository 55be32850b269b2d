//! Byte transport the driver talks through.

use std::io;

/// A non-blocking byte stream to the module, typically a UART.
///
/// Writes are fire-and-forget: the module never acknowledges them. Reads only
/// return bytes that have already arrived.
pub trait Transport {
    /// Queue `bytes` for transmission.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Number of received bytes ready to be read. Must not block.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` already-received bytes. Must not block; may
    /// return fewer bytes than requested, or zero.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }
}
