use std::net::SocketAddr;

/// Errors raised while setting up telemetry sockets.
///
/// Per-datagram send and receive failures are logged and counted, never
/// returned.
#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("send period must be positive")]
    ZeroPeriod,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
