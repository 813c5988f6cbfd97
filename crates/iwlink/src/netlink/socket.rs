//! Low-level async netlink socket operations.

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::BytesMut;
use netlink_sys::{Socket, SocketAddr, protocols};
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;

use super::error::Result;

/// Receive buffer size; large enough for a full dump batch.
const RECV_BUF_SIZE: usize = 32768;

/// Netlink protocol families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Generic netlink
    Generic,
}

impl Protocol {
    fn as_isize(self) -> isize {
        match self {
            Protocol::Generic => protocols::NETLINK_GENERIC,
        }
    }
}

/// Async netlink socket.
pub struct NetlinkSocket {
    /// The underlying async file descriptor.
    fd: AsyncFd<Socket>,
    /// Sequence number counter.
    seq: AtomicU32,
    /// Local port ID (assigned by kernel).
    pid: u32,
}

impl NetlinkSocket {
    /// Create a new netlink socket for the given protocol.
    pub fn new(protocol: Protocol) -> Result<Self> {
        let mut socket = Socket::new(protocol.as_isize())?;
        socket.set_non_blocking(true)?;

        // Bind to get a port ID
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();

        // Extended ACK gives better error messages; older kernels lack it.
        socket.set_ext_ack(true).ok();

        let fd = AsyncFd::try_new(socket).map_err(io::Error::from)?;
        tracing::debug!(pid, ?protocol, "netlink socket bound");

        Ok(Self {
            fd,
            seq: AtomicU32::new(1),
            pid,
        })
    }

    /// Get the next sequence number.
    pub fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Get the local port ID.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Send a message.
    pub async fn send(&self, msg: &[u8]) -> Result<()> {
        loop {
            let mut guard = self.fd.ready(Interest::WRITABLE).await?;

            match guard.try_io(|inner| inner.get_ref().send(msg, 0)) {
                Ok(result) => {
                    result?;
                    tracing::debug!(len = msg.len(), "sent netlink message");
                    return Ok(());
                }
                Err(_would_block) => continue,
            }
        }
    }

    /// Receive a datagram, allocating a buffer.
    pub async fn recv_msg(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(RECV_BUF_SIZE);

        loop {
            let mut guard = self.fd.ready(Interest::READABLE).await?;

            match guard.try_io(|inner| inner.get_ref().recv(&mut buf, 0)) {
                Ok(result) => {
                    let n = result?;
                    tracing::debug!(len = n, "received netlink datagram");
                    // recv advanced buf, so buf[..] holds the datagram
                    return Ok(buf.to_vec());
                }
                Err(_would_block) => continue,
            }
        }
    }
}
