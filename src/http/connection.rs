use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::app::App;
use crate::error::{Result, ServerError};
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// One accepted client connection.
///
/// Serves exactly one request and then closes; there is no keep-alive.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: BytesMut,
    state: ConnectionState,
    app: Arc<App>,
}

pub enum ConnectionState {
    Reading,
    Routing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, app: Arc<App>) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            app,
        }
    }

    /// Drives the connection until it closes.
    ///
    /// Errors leave the connection without a response; the caller only has
    /// to log them.
    pub async fn run(&mut self) -> Result<()> {
        let limits = self.app.limits();

        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    match timeout(limits.read_timeout, self.read_request()).await {
                        Ok(Ok(Some(req))) => {
                            self.state = ConnectionState::Routing(req);
                        }
                        Ok(Ok(None)) => {
                            debug!(peer = %self.peer, "Client closed before sending a request");
                            self.state = ConnectionState::Closed;
                        }
                        Ok(Err(e)) => return Err(e),
                        Err(_) => return Err(ServerError::Timeout("request read")),
                    }
                }

                ConnectionState::Routing(req) => {
                    let response = self.app.handle(req).await;

                    info!(
                        peer = %self.peer,
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        bytes = response.content_length(),
                        "Request served"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    let written =
                        timeout(limits.write_timeout, writer.write_to_stream(&mut self.stream))
                            .await;
                    match written {
                        Ok(result) => result?,
                        Err(_) => {
                            debug!(
                                peer = %self.peer,
                                unsent = writer.remaining(),
                                "Write deadline passed mid-response"
                            );
                            return Err(ServerError::Timeout("response write"));
                        }
                    }

                    if let Err(e) = self.stream.shutdown().await {
                        debug!(peer = %self.peer, error = %e, "Shutdown after response failed");
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one complete request is buffered.
    ///
    /// `Ok(None)` means the client closed without sending anything. Closing
    /// halfway through a request is malformed.
    pub async fn read_request(&mut self) -> Result<Option<Request>> {
        let max_body = self.app.limits().max_body_bytes;

        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer, max_body) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Err(e.into()),
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(ParseError::Incomplete.into());
            }
        }
    }
}
