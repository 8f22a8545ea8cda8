//! Socket helpers shared by the publisher and the relay.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use crate::error::{Result, TelemetryError};

/// Wildcard address with an ephemeral port in the same family as `peer`.
pub(crate) fn unspecified_for(peer: &SocketAddr) -> SocketAddr {
    match peer {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}

/// Bind an outbound-only socket able to reach `peer`.
pub(crate) fn bind_outbound(peer: &SocketAddr) -> Result<UdpSocket> {
    let local = unspecified_for(peer);
    UdpSocket::bind(local).map_err(|source| TelemetryError::Bind { addr: local, source })
}
