use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::app::App;
use crate::error::{Result, ServerError};
use crate::http::connection::Connection;

/// Pause after a failed `accept`, so running out of file descriptors does
/// not turn into a busy loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A bound listener plus the app it serves.
pub struct Server {
    listener: TcpListener,
    app: Arc<App>,
}

impl Server {
    /// Binds `addr`. Failure here is fatal and surfaces as
    /// [`ServerError::Bind`].
    pub async fn bind(addr: &str, app: App) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            app: Arc::new(app),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, one task per connection.
    ///
    /// Nothing a single connection does can end this loop.
    pub async fn serve(self) -> Result<()> {
        let addr = self.local_addr()?;
        info!(
            static_root = %self.app.static_files().root().display(),
            prefix = self.app.router().prefix(),
            routes = self.app.router().len(),
            "Listening on http://{}",
            addr
        );

        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            debug!("Accepted connection from {}", peer);

            let app = Arc::clone(&self.app);
            tokio::spawn(async move {
                let mut conn = Connection::new(socket, peer, app);
                if let Err(e) = conn.run().await {
                    if e.is_client_error() {
                        warn!(%peer, error = %e, "Connection dropped");
                    } else {
                        error!("Connection error from {}: {}", peer, e);
                    }
                }
            });
        }
    }
}

/// Binds `addr` and serves `app` until the process ends.
pub async fn run(addr: &str, app: App) -> Result<()> {
    Server::bind(addr, app).await?.serve().await
}
