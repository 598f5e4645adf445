use std::net::SocketAddr;

use http::StatusCode;

/// Where in the exchange a connection was given up on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Accept,
    Read,
    Parse,
    Encode,
    Write,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerEvent {
    Listening {
        addr: SocketAddr,
    },
    RequestReceived {
        peer: SocketAddr,
        method: String,
        path: String,
    },
    ResponseSent {
        peer: SocketAddr,
        status: StatusCode,
        bytes: usize,
    },
    /// The peer closed the connection before sending anything.
    ConnectionClosed {
        peer: SocketAddr,
    },
    ConnectionError {
        peer: Option<SocketAddr>,
        stage: Stage,
        error: String,
    },
}

pub trait ServerObserver: Send + Sync {
    fn on_event(&self, event: &ServerEvent);
}

/// Default observer, forwards every event to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ServerObserver for TracingObserver {
    fn on_event(&self, event: &ServerEvent) {
        match event {
            ServerEvent::Listening { addr } => {
                tracing::info!(target: "listener", ?addr, "server is running");
            }
            ServerEvent::RequestReceived { peer, method, path } => {
                tracing::info!(
                    target: "requests",
                    %method,
                    %path,
                    ?peer,
                    r#""{method} {path}" from {peer}"#
                );
            }
            ServerEvent::ResponseSent {
                peer,
                status,
                bytes,
            } => {
                tracing::debug!(target: "requests", ?peer, %status, bytes, "response sent");
            }
            ServerEvent::ConnectionClosed { peer } => {
                tracing::debug!(target: "listener", ?peer, "connection ended before request");
            }
            ServerEvent::ConnectionError { peer, stage, error } => {
                tracing::warn!(target: "listener", ?peer, ?stage, %error, "connection failed");
            }
        }
    }
}
