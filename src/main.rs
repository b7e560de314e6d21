//! PDF Batch MCP - Entry point
//!
//! With no arguments, serves MCP over stdio. With `--batch <config.json>`, runs
//! a single batch against the mail drop named by `PDF_BATCH_MAIL_DROP` and prints
//! the report as JSON.

use anyhow::{bail, Context};
use pdf_batch_mcp::pdf::PdfiumExtractor;
use pdf_batch_mcp::{run_batch, run_server, BatchConfig, MailDropSource, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_batch_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            tracing::info!("Starting PDF batch MCP server");
            run_server().await
        }
        [flag, path] if flag == "--batch" => run_batch_file(path).await,
        _ => bail!("usage: pdf-batch-mcp [--batch <config.json>]"),
    }
}

async fn run_batch_file(path: &str) -> anyhow::Result<()> {
    let config = BatchConfig::from_file(path)
        .with_context(|| format!("loading batch configuration {}", path))?;

    let Some(mail_drop) = ServerConfig::from_env().mail_drop_dir else {
        bail!("set {} to the mail drop directory", pdf_batch_mcp::config::MAIL_DROP_ENV);
    };
    let source = MailDropSource::new(mail_drop);

    let report = tokio::task::spawn_blocking(move || run_batch(&config, &source, PdfiumExtractor))
        .await
        .context("batch task panicked")??;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
