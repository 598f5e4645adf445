use std::{future::Future, io, net::SocketAddr, sync::Arc, time::Instant};

use bytes::BytesMut;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::{
    io::AsyncWriteExt,
    net::{TcpListener, TcpStream},
};
use tokio_util::codec::{Decoder, Encoder};

use crate::{
    config::ServerConfig,
    error::StartupError,
    http::{buffer::RequestBuffer, codec::ConnectionCodec, Request, Response},
    observer::{ServerEvent, ServerObserver, Stage, TracingObserver},
};

type Handler<A, F> = fn(Request, A) -> F;

pub struct Server<A, F> {
    config: ServerConfig,
    state: A,
    handler: Handler<A, F>,
    observer: Arc<dyn ServerObserver>,
}

impl<S, F> Server<S, F>
where
    S: Clone + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    pub fn new(config: ServerConfig, state: S, handler: Handler<S, F>) -> Self {
        Self {
            config,
            state,
            handler,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl ServerObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Creates the listening socket. Every failure here is fatal for the
    /// caller, nothing is retried.
    pub async fn bind(self) -> Result<Listener<S, F>, StartupError> {
        let listener = listen(&self.config)?;
        let listener = TcpListener::from_std(listener).map_err(StartupError::Register)?;

        let addr = listener.local_addr().map_err(StartupError::Register)?;
        self.observer.on_event(&ServerEvent::Listening { addr });

        Ok(Listener {
            server: self,
            listener,
        })
    }
}

fn listen(config: &ServerConfig) -> Result<std::net::TcpListener, StartupError> {
    let addr = config.address;

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
        .map_err(StartupError::Socket)?;
    socket
        .set_reuse_address(true)
        .map_err(StartupError::ReuseAddress)?;
    socket
        .bind(&addr.into())
        .map_err(|source| StartupError::Bind { addr, source })?;
    socket
        .listen(config.backlog)
        .map_err(StartupError::Listen)?;
    socket
        .set_nonblocking(true)
        .map_err(StartupError::Register)?;

    Ok(socket.into())
}

/// A bound server. Connections are served one at a time, in accept order.
pub struct Listener<A, F> {
    server: Server<A, F>,
    listener: TcpListener,
}

impl<S, F> Listener<S, F>
where
    S: Clone + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts forever. A failed accept is reported and skipped.
    pub async fn run(self) {
        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    self.server.observer.on_event(&ServerEvent::ConnectionError {
                        peer: None,
                        stage: Stage::Accept,
                        error: err.to_string(),
                    });
                    continue;
                }
            };

            self.handle_connection(socket, peer).await;
        }
    }

    /// One read, one response at most. The socket is dropped, and so
    /// closed, on every return.
    #[tracing::instrument(skip(self, socket))]
    async fn handle_connection(&self, mut socket: TcpStream, peer: SocketAddr) {
        let observer = &self.server.observer;
        let fail = |stage, error: &dyn std::fmt::Display| {
            observer.on_event(&ServerEvent::ConnectionError {
                peer: Some(peer),
                stage,
                error: error.to_string(),
            })
        };

        let mut buffer = RequestBuffer::new(self.server.config.buffer_size);
        match buffer.read_from(&mut socket).await {
            Ok(0) => return observer.on_event(&ServerEvent::ConnectionClosed { peer }),
            Ok(_) => {}
            Err(err) => return fail(Stage::Read, &err),
        }

        let mut codec = ConnectionCodec;
        let request = match codec.decode(buffer.bytes_mut()) {
            Ok(Some(request)) => request,
            Ok(None) => return fail(Stage::Parse, &"empty request"),
            Err(err) => return fail(Stage::Parse, &err),
        };

        observer.on_event(&ServerEvent::RequestReceived {
            peer,
            method: request.method_str().to_owned(),
            path: request.path.clone(),
        });

        let now = Instant::now();
        let response = (self.server.handler)(request, self.server.state.clone()).await;
        let status = response.status();
        tracing::debug!(%status, "handled in {:?}, sending response", now.elapsed());

        let mut dst = BytesMut::new();
        if let Err(err) = codec.encode(response, &mut dst) {
            return fail(Stage::Encode, &err);
        }

        if let Err(err) = socket.write_all(&dst).await {
            return fail(Stage::Write, &err);
        }

        observer.on_event(&ServerEvent::ResponseSent {
            peer,
            status,
            bytes: dst.len(),
        });
    }
}
