//! UDP request/response exchange.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, trace};
use std::{
    io::{self, ErrorKind},
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};
use tokio::{
    net::{lookup_host, UdpSocket},
    time::timeout,
};

/// Largest datagram we are willing to receive.
const MAX_DATAGRAM_LEN: usize = 65_536;

/// One request/response exchange with a server.
///
/// [`UdpTransport`] is the real implementation; the trait exists so the
/// client can be driven by something other than a socket.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` to `host:port` and return the first datagram that comes
    /// back, or fail with [`Error::Timeout`] once `dur` has elapsed.
    async fn exchange(&self, payload: Bytes, host: &str, port: u16, dur: Duration)
        -> Result<Bytes>;
}

/// Sends every exchange over a fresh UDP socket.
///
/// The socket lives for exactly one exchange and is closed when the call
/// returns, whether that is with a reply, an error or a timeout.
///
/// The socket is connected to the server, so only a reply sent from the
/// address and port the request went to is accepted. In exchange a server
/// that refuses the datagram yields an empty reply instead of a timeout.
/// IPv4 addresses are preferred when the host resolves to both families.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(
        &self,
        payload: Bytes,
        host: &str,
        port: u16,
        dur: Duration,
    ) -> Result<Bytes> {
        let peer = resolve(host, port).await?;
        trace!("resolved {host}:{port} to {peer}");

        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).await?;
        // a connected socket only sees datagrams from the peer and gets
        // told when the peer refuses them
        socket.connect(peer).await?;

        socket.send(&payload).await?;
        trace!("sent {} bytes to {peer}", payload.len());

        let mut buf = vec![0; MAX_DATAGRAM_LEN];

        match timeout(dur, socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                trace!("received {len} bytes from {peer}");
                buf.truncate(len);
                Ok(Bytes::from(buf))
            }
            Ok(Err(err)) if err.kind() == ErrorKind::ConnectionRefused => {
                debug!("{peer} refused the datagram, nothing received");
                Ok(Bytes::new())
            }
            Ok(Err(err)) => Err(err.into()),
            Err(_) => {
                debug!("no reply from {peer} within {dur:?}");
                Err(Error::Timeout(dur))
            }
        }
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    prefer_ipv4(lookup_host((host, port)).await?).ok_or_else(|| {
        io::Error::new(
            ErrorKind::AddrNotAvailable,
            format!("{host} did not resolve to any address"),
        )
        .into()
    })
}

/// First IPv4 address, or the first address of any family.
fn prefer_ipv4(addrs: impl IntoIterator<Item = SocketAddr>) -> Option<SocketAddr> {
    let mut first = None;

    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr);
        }
        first.get_or_insert(addr);
    }

    first
}
