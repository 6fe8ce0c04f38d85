use clap::Parser;
use gh_autoland_server::{serve, ServerArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the logger so RUST_LOG can live there too
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match dotenv {
        Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
        Err(_) => log::debug!(".env file not found, will rely on environment variables"),
    }

    let args = ServerArgs::parse();
    log::debug!("Starting with {:?}", args.workflow_settings());

    serve(args).await
}
