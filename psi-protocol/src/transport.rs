//! Fixed-width framing over a blocking byte stream.
//!
//! The protocol has no length prefixes, so every read asks for an exact
//! number of bytes. A peer that closes early surfaces as
//! `PsiError::Transport` with `UnexpectedEof` instead of a short buffer.

use crate::error::Result;
use std::io::{BufWriter, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

/// A blocking stream with exact-length reads and buffered writes.
#[derive(Debug)]
pub struct Channel<S: Read + Write> {
    reader: S,
    writer: BufWriter<S>,
}

impl<S: Read + Write> Channel<S> {
    /// Wrap two halves of the same connection.
    pub fn new(reader: S, writer: S) -> Self {
        Self {
            reader,
            writer: BufWriter::new(writer),
        }
    }

    /// Queue `bytes` for sending.
    pub fn send_fixed(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Push everything queued to the peer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Read exactly `len` bytes.
    pub fn recv_fixed(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read exactly `N` bytes into an array.
    pub fn recv_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl Channel<TcpStream> {
    /// Wrap a connected TCP stream, applying read/write deadlines.
    pub fn from_tcp(stream: TcpStream, timeout: Option<Duration>) -> Result<Self> {
        stream.set_nodelay(true)?;
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        let writer = stream.try_clone()?;
        Ok(Self::new(stream, writer))
    }
}

/// Bind `addr` and accept exactly one peer.
pub fn listen(addr: SocketAddr) -> Result<(TcpStream, SocketAddr)> {
    let listener = TcpListener::bind(addr)?;
    tracing::info!(%addr, "listening");
    accept_one(&listener)
}

/// Accept exactly one peer on an already bound listener.
pub fn accept_one(listener: &TcpListener) -> Result<(TcpStream, SocketAddr)> {
    let (stream, peer) = listener.accept()?;
    tracing::info!(%peer, "connection accepted");
    Ok((stream, peer))
}

/// Connect to the Sender.
pub fn connect(addr: SocketAddr) -> Result<TcpStream> {
    let stream = TcpStream::connect(addr)?;
    tracing::info!(%addr, "connection established");
    Ok(stream)
}
