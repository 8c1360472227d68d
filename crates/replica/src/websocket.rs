use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::Result;
use crate::channel::{Channel, Connector};

/// Dials the authority's `/socket` endpoint.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: String,
}

impl WebSocketConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

pub struct WebSocketChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connector for WebSocketConnector {
    type Channel = WebSocketChannel;

    async fn connect(&self) -> Result<WebSocketChannel> {
        let (stream, response) = connect_async(self.url.as_str()).await?;
        debug!("Handshake with {} returned {}", self.url, response.status());
        Ok(WebSocketChannel { stream })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[async_trait]
impl Channel for WebSocketChannel {
    async fn send(&mut self, text: String) -> Result<()> {
        self.stream.send(Message::text(text)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<String>> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(text) => return Ok(Some(text.as_str().to_string())),
                Message::Close(frame) => {
                    debug!("Authority closed the connection: {:?}", frame);
                    return Ok(None);
                }
                // Pings are answered by tungstenite on the next read or write.
                _ => continue,
            }
        }
        Ok(None)
    }
}
