use recruiting_hub::{config::Config, errors::Result, start_server};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("tracing subscriber already set: {e}");
    }

    let config = Config::from_env().inspect_err(|e| tracing::error!("{e}"))?;
    start_server(config).await
}
