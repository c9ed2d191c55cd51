//! Blocking HTTP GET over libcurl.
//!
//! One `CurlClient` is shared read-only by every worker. Each worker thread
//! keeps its own easy handle, so connections are reused across that thread's
//! requests without any locking.

use std::cell::RefCell;
use std::time::Duration;

use curl::easy::Easy;

use crate::error::FetchError;

/// Whole-body GET. The seam workers use to reach the network.
pub trait HttpGet: Send + Sync {
    /// Returns the full response body of a 2xx response.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

thread_local! {
    static EASY: RefCell<Option<Easy>> = const { RefCell::new(None) };
}

/// libcurl-backed client with a per-request total timeout.
#[derive(Debug, Clone)]
pub struct CurlClient {
    timeout: Duration,
    user_agent: String,
}

impl CurlClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: format!("epicdl/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    fn configure(&self, easy: &mut Easy, url: &str) -> Result<(), curl::Error> {
        // reset keeps the connection cache
        easy.reset();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.timeout(self.timeout)?;
        Ok(())
    }

    fn perform(&self, easy: &mut Easy, url: &str) -> Result<Vec<u8>, FetchError> {
        self.configure(easy, url).map_err(FetchError::Transport)?;

        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(FetchError::Transport)?;
            transfer.perform().map_err(FetchError::from_perform)?;
        }

        let code = easy.response_code().map_err(FetchError::Transport)?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Status(code));
        }
        Ok(body)
    }
}

impl HttpGet for CurlClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        EASY.with(|slot| {
            let mut slot = slot.borrow_mut();
            let easy = slot.get_or_insert_with(Easy::new);
            self.perform(easy, url)
        })
    }
}
