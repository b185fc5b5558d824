use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> project3::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    project3::run().await
}
