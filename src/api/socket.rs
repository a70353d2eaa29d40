//! Duplex channel listener.
//!
//! The server never pushes message diffs. It only tells the client to refetch
//! everything (`resend_messages`). This module owns the websocket, decodes the
//! JSON envelope of each text frame, and hands recognised events to a callback.

use std::fmt;

use futures::StreamExt;
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_tungstenite::tungstenite::Message as Frame;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;

use super::types::ServerEvent;

#[derive(Debug)]
pub enum SocketError {
    /// Bad URL or header value.
    Config(String),
    /// Connection or handshake failure.
    Handshake(String),
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketError::Config(msg) => write!(f, "socket config error: {msg}"),
            SocketError::Handshake(msg) => write!(f, "socket handshake failed: {msg}"),
        }
    }
}

impl std::error::Error for SocketError {}

/// Why the listener stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEnd {
    /// The server closed the connection (or the stream ended).
    Closed,
    /// A read error tore the connection down.
    Failed(String),
    /// The callback asked to stop (receiver gone).
    Stopped,
}

/// An open, authenticated duplex channel.
pub type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open the channel, sending the bearer token in the handshake.
pub async fn connect(url: &str, token: &str) -> Result<SocketStream, SocketError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| SocketError::Config(e.to_string()))?;
    let auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| SocketError::Config(e.to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, auth);

    let (stream, _response) = connect_async(request)
        .await
        .map_err(|e| SocketError::Handshake(e.to_string()))?;
    info!("Socket connected: {}", url);
    Ok(stream)
}

/// Read frames until the connection ends, feeding recognised events to `on_event`.
///
/// `on_event` returns `false` to stop listening. Unknown events and malformed
/// frames are logged and skipped.
pub async fn pump<F>(stream: &mut SocketStream, mut on_event: F) -> SocketEnd
where
    F: FnMut(ServerEvent) -> bool + Send,
{
    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Socket read error: {}", e);
                return SocketEnd::Failed(e.to_string());
            }
        };

        match frame {
            Frame::Text(text) => match ServerEvent::parse(text.as_str()) {
                Ok(ServerEvent::Other(name)) => {
                    debug!("Ignoring server event: {}", name);
                }
                Ok(event) => {
                    debug!("Server event: {:?}", event);
                    if !on_event(event) {
                        info!("Socket listener stopped by receiver");
                        return SocketEnd::Stopped;
                    }
                }
                Err(e) => warn!("Malformed socket frame ({}): {}", e, text.as_str()),
            },
            Frame::Close(reason) => {
                info!("Socket closed by server: {:?}", reason);
                return SocketEnd::Closed;
            }
            // Pings are answered by tungstenite; binary frames carry nothing we use.
            _ => {}
        }
    }

    info!("Socket stream ended");
    SocketEnd::Closed
}

/// [`connect`] then [`pump`] until the connection ends.
pub async fn listen<F>(url: &str, token: &str, on_event: F) -> Result<SocketEnd, SocketError>
where
    F: FnMut(ServerEvent) -> bool + Send,
{
    let mut stream = connect(url, token).await?;
    Ok(pump(&mut stream, on_event).await)
}
