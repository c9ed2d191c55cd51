//! Per-item work: persist metadata, then download and store the asset.

use std::path::PathBuf;

use url::Url;

use crate::config::{EpicConfig, DEFAULT_FILE_MODE};
use crate::endpoint::{redact, Endpoints};
use crate::error::ItemError;
use crate::http::HttpGet;
use crate::model::WorkItem;
use crate::sanitize::file_stem;
use crate::storage;

use super::message::StatusMessage;

/// Turns one `WorkItem` into a metadata file and an image file.
///
/// Shared by reference across all workers; holds no mutable state.
#[derive(Debug)]
pub struct ItemProcessor<C> {
    client: C,
    endpoints: Endpoints,
    data_dir: PathBuf,
    image_dir: PathBuf,
    file_mode: u32,
}

impl<C: HttpGet> ItemProcessor<C> {
    pub fn new(
        client: C,
        endpoints: Endpoints,
        data_dir: impl Into<PathBuf>,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            endpoints,
            data_dir: data_dir.into(),
            image_dir: image_dir.into(),
            file_mode: DEFAULT_FILE_MODE,
        }
    }

    pub fn from_config(client: C, endpoints: Endpoints, cfg: &EpicConfig) -> Self {
        Self::new(client, endpoints, &cfg.data_dir, &cfg.image_dir).with_file_mode(cfg.file_mode())
    }

    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn metadata_path(&self, item: &WorkItem) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", file_stem(&item.image_token)))
    }

    pub fn asset_path(&self, item: &WorkItem) -> PathBuf {
        self.image_dir.join(self.endpoints.asset_file_name(item))
    }

    pub fn asset_url(&self, item: &WorkItem) -> Url {
        self.endpoints.asset_url(item)
    }

    /// Writes `<data_dir>/<token>.json`. Always yields exactly one message.
    pub fn persist_metadata(&self, worker: usize, item: &WorkItem) -> StatusMessage {
        let token = &item.image_token;
        match self.write_metadata(item) {
            Ok(path) => {
                tracing::debug!(worker, path = %path.display(), "metadata written");
                StatusMessage::success(worker, format!("Writing info {}", token))
            }
            Err(e) => {
                tracing::warn!(worker, %token, error = %e, "metadata not written");
                StatusMessage::error(worker, format!("Writing info {} [ {} ]", token, e))
            }
        }
    }

    /// Progress line sent before the download starts.
    pub fn announce(&self, worker: usize, url: &Url) -> StatusMessage {
        StatusMessage::info(worker, format!("Downloading {}", redact(url)))
    }

    /// GETs `url` and writes the body to `<image_dir>/<token>.<ext>`.
    /// Always yields exactly one message.
    pub fn fetch_asset(&self, worker: usize, item: &WorkItem, url: &Url) -> StatusMessage {
        let shown = redact(url);
        match self.download(item, url) {
            Ok((path, len)) => {
                tracing::debug!(worker, path = %path.display(), bytes = len, "asset written");
                StatusMessage::success(worker, format!("Completed {}", shown))
            }
            Err(e) => {
                tracing::warn!(worker, url = %shown, error = %e, "asset not written");
                StatusMessage::error(worker, format!("Downloading {} [ {} ]", shown, e))
            }
        }
    }

    fn write_metadata(&self, item: &WorkItem) -> Result<PathBuf, ItemError> {
        let bytes = serde_json::to_vec(item).map_err(ItemError::Serialization)?;
        let path = self.metadata_path(item);
        storage::write_file(&path, &bytes, self.file_mode)
            .map_err(|err| ItemError::Write { path: path.clone(), err })?;
        Ok(path)
    }

    fn download(&self, item: &WorkItem, url: &Url) -> Result<(PathBuf, usize), ItemError> {
        let body = self.client.get(url.as_str())?;
        let path = self.asset_path(item);
        storage::write_file(&path, &body, self.file_mode)
            .map_err(|err| ItemError::Write { path: path.clone(), err })?;
        Ok((path, body.len()))
    }
}
