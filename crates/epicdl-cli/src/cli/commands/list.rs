//! `epicdl list` – print the feed without downloading.

use anyhow::Result;
use epicdl_core::config::EpicConfig;
use epicdl_core::endpoint::Endpoints;
use epicdl_core::feed::fetch_work_list;
use epicdl_core::http::CurlClient;

pub fn run_list(cfg: &EpicConfig, date: Option<&str>) -> Result<()> {
    let endpoints = Endpoints::from_config(cfg, cfg.resolve_api_key())?;
    let client = CurlClient::new(cfg.http_timeout());
    let items = fetch_work_list(&client, &endpoints, date)?;

    if items.is_empty() {
        println!("No images listed.");
        return Ok(());
    }
    for item in &items {
        println!("{} {}", item.image_token, item.date_path());
    }
    Ok(())
}
