//! WebSocket event stream.
//!
//! Opens the device's `/ws` endpoint and exposes it as a stream of raw text
//! frames. The stream ends on a close frame or EOF, and yields a single
//! `Err` before ending when the socket fails. There is no reconnection
//! here: the caller owns backoff.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures_util::StreamExt;
//!
//! let mut frames = client.open_stream().await?;
//! while let Some(frame) = frames.next().await {
//!     println!("{}", frame?);
//! }
//! ```

use std::pin::Pin;

use futures_core::Stream;
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder, Message};
use tracing::{debug, info, trace};
use url::Url;

use crate::client::DeviceClient;
use crate::error::Error;

/// Close code reported when the socket dies without a close frame.
const ABNORMAL_CLOSURE: u16 = 1006;

/// Raw text frames from the device, in arrival order.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, Error>> + Send>>;

impl DeviceClient {
    /// The event stream URL: the base URL with `ws`/`wss` swapped in and
    /// the stream path appended.
    pub fn stream_url(&self) -> Result<Url, Error> {
        let mut url = self.url(self.stream_path())?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme).map_err(|()| {
            Error::WebSocketConnect(format!(
                "cannot derive a {scheme} URL from {}",
                self.base_url()
            ))
        })?;
        Ok(url)
    }

    /// Perform the WebSocket handshake and return the frame stream.
    pub async fn open_stream(&self) -> Result<FrameStream, Error> {
        let url = self.stream_url()?;
        info!(url = %url, "connecting event stream");

        let uri: tungstenite::http::Uri = url
            .as_str()
            .parse()
            .map_err(|e: tungstenite::http::uri::InvalidUri| Error::WebSocketConnect(e.to_string()))?;

        let (ws, _response) = tokio_tungstenite::connect_async(ClientRequestBuilder::new(uri))
            .await
            .map_err(|e| Error::WebSocketConnect(e.to_string()))?;

        info!("event stream connected");
        Ok(Box::pin(frames(ws)))
    }
}

fn frames<S>(mut ws: WebSocketStream<S>) -> impl Stream<Item = Result<String, Error>> + Send
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async_stream::stream! {
        while let Some(message) = ws.next().await {
            match message {
                Ok(Message::Text(text)) => yield Ok(text.as_str().to_owned()),
                Ok(Message::Binary(data)) => match std::str::from_utf8(&data) {
                    Ok(text) => yield Ok(text.to_owned()),
                    Err(_) => debug!(len = data.len(), "dropping non-UTF-8 binary frame"),
                },
                Ok(Message::Close(frame)) => {
                    match frame {
                        Some(cf) => info!(code = %cf.code, reason = %cf.reason, "event stream close frame received"),
                        None => info!("event stream close frame received (no payload)"),
                    }
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // tungstenite answers pings on the next read
                    trace!("event stream ping/pong");
                }
                Ok(Message::Frame(_)) => {}
                Err(e) => {
                    yield Err(Error::StreamClosed {
                        code: ABNORMAL_CLOSURE,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }
        debug!("event stream ended");
    }
}
