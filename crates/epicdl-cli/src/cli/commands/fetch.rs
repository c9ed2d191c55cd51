//! `epicdl fetch` – fetch the list, then run the worker pipeline over it.

use anyhow::Result;
use epicdl_core::config::EpicConfig;
use epicdl_core::endpoint::Endpoints;
use epicdl_core::feed::fetch_work_list;
use epicdl_core::http::CurlClient;
use epicdl_core::pipeline::{run_batch, BatchOptions, ItemProcessor};
use epicdl_core::storage::ensure_dir;

/// Per-item failures only show up as `ERROR` lines; the run still ends with
/// `OK`. Feed and directory failures are returned as errors.
pub fn run_fetch(cfg: &EpicConfig, date: Option<&str>) -> Result<()> {
    let endpoints = Endpoints::from_config(cfg, cfg.resolve_api_key())?;
    let client = CurlClient::new(cfg.http_timeout());
    let processor = ItemProcessor::from_config(client, endpoints, cfg);

    let items = fetch_work_list(processor.client(), processor.endpoints(), date)?;

    ensure_dir(&cfg.data_dir)?;
    ensure_dir(&cfg.image_dir)?;

    let report = run_batch(
        &processor,
        &items,
        BatchOptions::from_config(cfg),
        |msg| println!("{}", msg),
    );
    if report.collected.errors > 0 {
        tracing::warn!(
            errors = report.collected.errors,
            items = report.items,
            "batch finished with errors"
        );
    }

    println!("OK");
    Ok(())
}
