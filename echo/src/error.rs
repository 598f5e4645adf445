use std::{io, net::SocketAddr};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid content-length: {0:?}")]
    InvalidContentLength(String),
    #[error("content-length out of range: {0}")]
    ContentLengthRange(String),
    #[error("failed to read request: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("invalid content-type header: {0}")]
    HeaderValue(#[from] http::header::ToStrError),
    #[error("failed to write response: {0}")]
    Io(#[from] io::Error),
}

/// Failures while setting up the listening socket. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("error creating socket: {0}")]
    Socket(#[source] io::Error),
    #[error("error setting socket options: {0}")]
    ReuseAddress(#[source] io::Error),
    #[error("error binding socket to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("error listening on socket: {0}")]
    Listen(#[source] io::Error),
    #[error("error registering listener with the runtime: {0}")]
    Register(#[source] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("buffer_size must be greater than zero")]
    EmptyBuffer,
}
