//! Fetch the next bin collection of a property and send the reminder.

use std::io::stderr;

use anyhow::{Context, Result};
use bcn_core::{
    bin_client::BinClient,
    config::Config,
    http::http_client,
    notifier::Dispatcher,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Send a reminder about the next bin collection.
///
/// Every setting is read from the environment or a `.env` file, starting with the `UPRN` of the
/// property.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Arguments {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _args = Arguments::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(stderr))
        .init();
    let config = Config::from_env()?;
    let client = http_client().context("failed to build the HTTP client")?;
    let collection = BinClient::new(client.clone()).get(&config.uprn).await;
    println!("Bin collection: {collection}");
    let report = Dispatcher::from_config(&config.notify, &client)
        .dispatch(&collection)
        .await;
    info!(
        sent = report.sent(),
        failed = report.failed(),
        skipped = report.skipped(),
        "notifications done"
    );
    Ok(())
}
