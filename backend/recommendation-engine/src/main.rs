use anyhow::Context;
use recommendation_engine::jobs::{BatchRequest, BatchRunner};
use recommendation_engine::Config;
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("recommendation_engine=info,info"));

    // Logs go to stderr; stdout carries the JSON response
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.json_logs());

    info!(service = %config.service_name, "Starting batch ranking");

    // Request from the path given as first argument, else stdin
    let request = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path))?;
            BatchRequest::from_reader(BufReader::new(file))
        }
        None => BatchRequest::from_reader(io::stdin().lock()),
    }
    .context("Failed to parse batch request")?;

    let runner = BatchRunner::new(config);
    let response = runner.run(request).map_err(|e| {
        error!("Batch request failed: {}", e);
        e
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &response).context("Failed to write response")?;
    writeln!(out)?;

    Ok(())
}
