//! percept - image-classification inference service entry point

use clap::Parser;
use percept::cli::{cmd_classify, cmd_handle_event, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "percept=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(host, port).await?;
        }
        Commands::Classify { image } => {
            cmd_classify(&image)?;
        }
        Commands::HandleEvent { root, bucket, key } => {
            cmd_handle_event(root, bucket, key)?;
        }
    }

    Ok(())
}
