use std::sync::Arc;

use anyhow::Context;
use aws_sdk_s3::Client as S3Client;
use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use uploader::{
    cli::Opts, page::UploadPage, provision, server, storage::UploadStorage, types::Environment,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let environment = Environment::from_env();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // JSON logs in production, human-readable everywhere else
    match environment {
        Environment::Production => fmt().json().with_env_filter(filter).init(),
        Environment::Development => fmt().with_env_filter(filter).init(),
    }

    tracing::info!(?environment, "Configured logging");

    let storage_config = opts.storage_config();
    let s3_client = Arc::new(S3Client::from_conf(
        environment.s3_client_config(&storage_config).await,
    ));
    let storage = UploadStorage::new(s3_client, &storage_config.region, opts.url_expiry_secs);

    let urls = provision::run(&storage, &opts.upload_settings())
        .await
        .with_context(|| format!("provision container {}", opts.container))?;

    let page = Arc::new(UploadPage::new(opts.template.clone(), urls));
    server::start(opts.port, page)
        .await
        .context("serve upload page")
}
