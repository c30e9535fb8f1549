use anyhow::{bail, Context};
use bar_registry::utils::{logger, validation};
use clap::Parser;
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;

/// Bulk-loads bars from a JSON file into a running server.
#[derive(Debug, Parser)]
#[command(name = "seed_bars")]
struct SeedArgs {
    /// JSON file holding an array of bar objects
    #[arg(long)]
    file: PathBuf,

    #[arg(long, default_value = "http://localhost:3000/bar/add-many")]
    endpoint: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_tool_logger();
    let args = SeedArgs::parse();

    validation::validate_url("endpoint", &args.endpoint, &["http", "https"])?;

    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let bars: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("{} must contain a JSON array", args.file.display()))?;

    if bars.is_empty() {
        println!("⚠️ {} contains no bars, nothing to do", args.file.display());
        return Ok(());
    }

    tracing::info!("Sending {} bars to {}", bars.len(), args.endpoint);
    let response = Client::new()
        .post(&args.endpoint)
        .json(&bars)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("server rejected the batch ({}): {}", status, body);
    }

    let echoed: Vec<Value> = response.json().await?;
    println!("✅ Seeded {} bars", echoed.len());
    Ok(())
}
