//! TCP serial bridge transport.
//!
//! Talks to a module whose UART is exposed on a TCP port (ser2net, an ESP
//! serial bridge, or similar). The socket is non-blocking; received bytes are
//! buffered until the driver reads them.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{Buf, BytesMut};
use dfplayer_driver::Transport;
use tracing::{info, trace};

const READ_CHUNK: usize = 256;

/// A non-blocking TCP connection to a serial bridge.
pub struct TcpTransport {
    stream: TcpStream,
    rx: BytesMut,
    closed: bool,
}

impl TcpTransport {
    /// Connect to `addr`, giving up after `timeout`.
    pub fn connect(addr: &str, timeout: Duration) -> io::Result<Self> {
        let remote = addr.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("no address for {addr}"))
        })?;

        let stream = TcpStream::connect_timeout(&remote, timeout)?;
        stream.set_nodelay(true)?;
        stream.set_nonblocking(true)?;
        info!(%remote, "connected to serial bridge");

        Ok(TcpTransport {
            stream,
            rx: BytesMut::with_capacity(READ_CHUNK),
            closed: false,
        })
    }

    // Pull whatever the socket has without blocking.
    fn fill(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        while !self.closed {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    info!("serial bridge closed the connection");
                    self.closed = true;
                }
                Ok(n) => {
                    trace!(bytes = ?&chunk[..n], "rx");
                    self.rx.extend_from_slice(&chunk[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl Transport for TcpTransport {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut remaining = bytes;
        while !remaining.is_empty() {
            match self.stream.write(remaining) {
                Ok(n) => remaining = &remaining[n..],
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(1))
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        self.stream.flush()
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        self.fill()?;
        if self.closed && self.rx.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial bridge closed the connection",
            ));
        }
        Ok(self.rx.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.rx.len());
        buf[..n].copy_from_slice(&self.rx[..n]);
        self.rx.advance(n);
        Ok(n)
    }
}
