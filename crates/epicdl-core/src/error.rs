//! Error types for the fetch pipeline.
//!
//! `StartupError` aborts the run. `ItemError` never leaves a worker: it is
//! rendered into an Error status message and the worker moves on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single HTTP GET.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Handle setup or transfer failed before a body arrived (DNS, connect,
    /// timeout, TLS).
    #[error("{0}")]
    Transport(curl::Error),
    /// The connection broke while the response body was being received.
    #[error("reading response body: {0}")]
    Body(curl::Error),
    /// Server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
}

impl FetchError {
    /// Sort a `perform()` failure into transport vs. body-read.
    pub fn from_perform(err: curl::Error) -> Self {
        if err.is_recv_error() || err.is_partial_file() {
            FetchError::Body(err)
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Per-item failure. Rendered verbatim into the status text.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("serializing metadata: {0}")]
    Serialization(serde_json::Error),
    #[error("writing {}: {err}", path.display())]
    Write { path: PathBuf, err: io::Error },
    #[error("download failed: {0}")]
    Download(FetchError),
    #[error("response read failed: {0}")]
    ResponseRead(FetchError),
}

impl From<FetchError> for ItemError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Body(_) => ItemError::ResponseRead(err),
            FetchError::Transport(_) | FetchError::Status(_) => ItemError::Download(err),
        }
    }
}

/// Failures that stop the run before any worker starts.
#[derive(Debug, Error)]
pub enum StartupError {
    /// `url` is already redacted.
    #[error("fetching work list from {url}")]
    FetchList {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("decoding work list")]
    DecodeList(#[source] serde_json::Error),
    #[error("creating directory {}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid API base URL {url}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_errors_map_to_response_read() {
        // CURLE_RECV_ERROR
        let err = FetchError::from_perform(curl::Error::new(56));
        assert!(matches!(ItemError::from(err), ItemError::ResponseRead(_)));
    }

    #[test]
    fn upload_read_error_is_transport() {
        // CURLE_READ_ERROR comes from the upload callback, not the response
        let err = FetchError::from_perform(curl::Error::new(26));
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn connect_and_status_errors_map_to_download() {
        // CURLE_COULDNT_CONNECT
        let err = FetchError::from_perform(curl::Error::new(7));
        assert!(matches!(err, FetchError::Transport(_)));
        assert!(matches!(ItemError::from(err), ItemError::Download(_)));
        let status = ItemError::from(FetchError::Status(404));
        assert_eq!(status.to_string(), "download failed: HTTP 404");
    }

    #[test]
    fn write_error_names_path() {
        let err = ItemError::Write {
            path: PathBuf::from("data/x.json"),
            err: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "writing data/x.json: denied");
    }
}
