//! WebSocket connection to the status endpoint.
//!
//! [`StatusClient`] owns at most one live connection. Connecting is
//! idempotent: calling it while a connection is open reuses that connection
//! instead of dialing a second socket. Each established connection gets a
//! fresh generation number, so work scheduled against an earlier connection
//! can be recognized as stale after a reconnect.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use videowatch_protocol::{Command, Endpoint};

use crate::error::{ClientError, ClientResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One established connection and the generation it belongs to.
struct Link {
    stream: WsStream,
    generation: u64,
}

/// Client owning the single WebSocket connection to the status endpoint.
pub struct StatusClient {
    endpoint: Endpoint,
    connect_timeout: Duration,
    link: Option<Link>,
    generation: u64,
}

impl StatusClient {
    /// Default timeout for connection attempts.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a client for the given endpoint. No connection is opened yet.
    pub fn new(endpoint: Endpoint, connect_timeout: Duration) -> Self {
        Self {
            endpoint,
            connect_timeout,
            link: None,
            generation: 0,
        }
    }

    /// Returns the endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns true while a connection is open.
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Returns the generation of the most recently established connection.
    ///
    /// Starts at zero and increments on every successful connect.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Opens a connection and requests the first status snapshot.
    ///
    /// A no-op when a connection is already open, so at most one socket
    /// exists at any time. The first `/status` request is sent as soon as
    /// the handshake completes.
    pub async fn connect(&mut self) -> ClientResult<()> {
        if self.link.is_some() {
            debug!("connect called while already connected, ignoring");
            return Ok(());
        }

        let url = self.endpoint.url()?;
        debug!(url = %url, "connecting");

        let (stream, response) = tokio::time::timeout(self.connect_timeout, connect_async(url))
            .await
            .map_err(|_| {
                ClientError::Timeout(format!(
                    "connection to {} timed out after {}s",
                    self.endpoint,
                    self.connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                ClientError::Connection(format!("failed to connect to {}: {}", self.endpoint, e))
            })?;

        self.generation += 1;
        debug!(
            status = %response.status(),
            generation = self.generation,
            "connected"
        );
        self.link = Some(Link {
            stream,
            generation: self.generation,
        });

        self.request_status().await
    }

    /// Sends a `/status` request on the open connection.
    pub async fn request_status(&mut self) -> ClientResult<()> {
        let Some(link) = self.link.as_mut() else {
            return Err(ClientError::Connection("not connected".to_string()));
        };

        debug!(
            generation = link.generation,
            command = %Command::Status,
            "requesting status"
        );
        let sent = link
            .stream
            .send(Message::Text(Command::Status.as_str().to_owned()))
            .await;
        if let Err(err) = sent {
            self.link = None;
            return Err(ClientError::Connection(format!(
                "failed to send {}: {}",
                Command::Status,
                err
            )));
        }
        Ok(())
    }

    /// Waits for the next inbound text frame.
    ///
    /// Binary and pong frames are skipped (pings are answered by the
    /// transport). Returns `Ok(None)` once the server closes the connection;
    /// transport failures return an error. Either way the client ends up
    /// disconnected and a later [`connect`](Self::connect) starts fresh.
    pub async fn next_frame(&mut self) -> ClientResult<Option<String>> {
        loop {
            let inbound = match self.link.as_mut() {
                Some(link) => link.stream.next().await,
                None => return Ok(None),
            };

            match inbound {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => {
                    debug!("server closed the connection");
                    self.link = None;
                    return Ok(None);
                }
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    self.link = None;
                    return Err(ClientError::Connection(format!("connection lost: {}", err)));
                }
            }
        }
    }

    /// Closes the connection if one is open.
    pub async fn disconnect(&mut self) {
        if let Some(mut link) = self.link.take() {
            debug!(generation = link.generation, "closing connection");
            let _ = link.stream.close(None).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    async fn bind() -> (TcpListener, Endpoint) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, Endpoint::new("127.0.0.1", port))
    }

    fn client(endpoint: Endpoint) -> StatusClient {
        StatusClient::new(endpoint, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let (listener, endpoint) = bind().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let _ws = accept_async(stream).await.unwrap();
            // A second handshake would mean a duplicate socket.
            let extra = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
            assert!(extra.is_err(), "duplicate connection attempted");
        });

        let mut client = client(endpoint);
        client.connect().await.unwrap();
        client.connect().await.unwrap();

        assert!(client.is_connected());
        assert_eq!(client.generation(), 1);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn open_sends_one_status_request() {
        let (listener, endpoint) = bind().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            let first = ws.next().await.unwrap().unwrap();
            assert_eq!(first.into_text().unwrap(), "/status");
            // Nothing else is sent until a snapshot has been delivered.
            let extra = tokio::time::timeout(Duration::from_millis(100), ws.next()).await;
            assert!(extra.is_err(), "unexpected second message");
        });

        let mut client = client(endpoint);
        client.connect().await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn next_frame_yields_text_and_skips_binary() {
        let (listener, endpoint) = bind().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            ws.next().await; // status request
            ws.send(Message::Binary(vec![1, 2, 3])).await.unwrap();
            ws.send(Message::Text(r#"{"clientsInfo":{}}"#.to_string()))
                .await
                .unwrap();
            // Keep the connection open until the client has read the frame.
            let _ = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
        });

        let mut client = client(endpoint);
        client.connect().await.unwrap();

        let frame = client.next_frame().await.unwrap();
        assert_eq!(frame.as_deref(), Some(r#"{"clientsInfo":{}}"#));
        assert!(client.is_connected());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn reconnect_after_close_bumps_generation() {
        let (listener, endpoint) = bind().await;

        let server = tokio::spawn(async move {
            for _ in 0..2 {
                let (stream, _) = listener.accept().await.unwrap();
                let mut ws = accept_async(stream).await.unwrap();
                ws.next().await; // status request
                ws.close(None).await.unwrap();
            }
        });

        let mut client = client(endpoint);
        client.connect().await.unwrap();
        assert_eq!(client.generation(), 1);

        assert!(client.next_frame().await.unwrap().is_none());
        assert!(!client.is_connected());

        client.connect().await.unwrap();
        assert_eq!(client.generation(), 2);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        let (listener, endpoint) = bind().await;
        drop(listener);

        let mut client = client(endpoint);
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
        assert!(!client.is_connected());
        assert_eq!(client.generation(), 0);
    }

    #[tokio::test]
    async fn connect_times_out_on_unresponsive_server() {
        let (listener, endpoint) = bind().await;

        // Accept raw TCP but never answer the WebSocket handshake.
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(stream);
        });

        let mut client = StatusClient::new(endpoint, Duration::from_millis(100));
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
        assert!(!client.is_connected());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn request_status_requires_a_connection() {
        let mut client = client(Endpoint::new("127.0.0.1", 1));
        let err = client.request_status().await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[tokio::test]
    async fn disconnect_clears_the_link() {
        let (listener, endpoint) = bind().await;

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            ws.next().await; // status request
            // Wait for the client's close frame.
            let _ = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
        });

        let mut client = client(endpoint);
        client.connect().await.unwrap();
        assert!(client.is_connected());

        client.disconnect().await;
        assert!(!client.is_connected());
        assert!(client.next_frame().await.unwrap().is_none());
        server.await.unwrap();
    }
}
