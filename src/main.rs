use std::sync::Arc;

use restatic::endpoints::{self, UserRegistry};
use restatic::{server, App, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let registry = Arc::new(UserRegistry::new());
    let app = endpoints::register(App::builder().config(&cfg), registry).build();

    tokio::select! {
        res = server::run(&cfg.listen_addr, app) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
