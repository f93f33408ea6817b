//! flickr-uploader: batch-upload photos to Flickr from a delimited manifest.
//!
//! Each manifest row names a local file plus its title, description, tags,
//! license and album. Rows are uploaded through OAuth-signed API calls under
//! a shared rate limit, filed into albums (created on first use) and
//! reported one outcome per row.

#![warn(clippy::all)]

mod auth;
mod cli;
mod config;
mod flickr;
mod license;
mod manifest;
mod rate_limit;
mod shutdown;
mod tags;
mod types;
mod upload;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flickr::{Endpoints, FlickrClient, PhotoService};
use manifest::ManifestReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    let config = config::Config::from_cli(cli)?;
    tracing::debug!(?config, "Configuration");
    tracing::info!(concurrency = config.threads_num, "Starting flickr-uploader");

    // Opened before authenticating so a bad path fails without network calls.
    let rows = match (&config.manifest, config.auth_only || config.list_albums) {
        (Some(path), false) => {
            let reader = ManifestReader::open(path, config.delimiter)?;
            tracing::info!(
                columns = reader.headers().len(),
                "Opened manifest {}",
                path.display()
            );
            Some(reader)
        }
        _ => None,
    };

    let credentials = auth::read_credentials(&config.auth_file).await?;
    let client = FlickrClient::new(credentials, Endpoints::default(), config.timeout)?;

    let user = client
        .test_login()
        .await
        .context("Flickr rejected the credentials")?;
    tracing::info!(
        user_id = %user.id,
        "Authenticated as {}",
        user.username.content
    );

    if config.auth_only {
        tracing::info!("Authentication completed successfully");
        return Ok(());
    }

    if config.list_albums {
        let photosets = client.list_photosets().await?;
        println!("Albums:");
        for set in &photosets {
            println!("  {} ({})", set.title, set.id);
        }
        return Ok(());
    }

    let Some(rows) = rows else {
        anyhow::bail!("--manifest is required for uploading");
    };

    let shutdown_token = shutdown::install_signal_handler()?;
    let summary =
        upload::upload_manifest(&client, rows, &config.upload_config(), shutdown_token).await;

    if let Some(path) = &config.report {
        summary.report().write(path).await?;
    }

    let failed = summary.tally.failures();
    if failed > 0 {
        anyhow::bail!("{} of {} rows failed", failed, summary.tally.total());
    }

    Ok(())
}
