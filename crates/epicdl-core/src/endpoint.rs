//! Feed and archive URLs for the EPIC API.

use url::Url;

use crate::config::{Collection, EpicConfig, ImageFormat};
use crate::error::StartupError;
use crate::model::WorkItem;
use crate::sanitize::file_stem;

const API_KEY_PARAM: &str = "api_key";
const REDACTED: &str = "***";

/// Builds feed and asset URLs. Cheap to share across workers.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    collection: Collection,
    format: ImageFormat,
    api_key: String,
}

impl Endpoints {
    pub fn new(
        api_base: &str,
        collection: Collection,
        format: ImageFormat,
        api_key: impl Into<String>,
    ) -> Result<Self, StartupError> {
        let base = Url::parse(api_base).map_err(|source| StartupError::BaseUrl {
            url: api_base.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(StartupError::BaseUrl {
                url: api_base.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        Ok(Self {
            base,
            collection,
            format,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(cfg: &EpicConfig, api_key: impl Into<String>) -> Result<Self, StartupError> {
        Self::new(&cfg.api_base, cfg.collection, cfg.image_format, api_key)
    }

    /// `<base>/api/<collection>` or, with a date, `<base>/api/<collection>/date/<date>`.
    pub fn list_url(&self, date: Option<&str>) -> Url {
        let mut segments = vec!["api", self.collection.as_str()];
        if let Some(date) = date {
            segments.push("date");
            segments.push(date);
        }
        self.build(&segments)
    }

    /// `<base>/archive/<collection>/<YYYY>/<MM>/<DD>/<format>/<token>.<ext>`.
    pub fn asset_url(&self, item: &WorkItem) -> Url {
        let [year, month, day] = item.date_segments();
        let file = self.asset_file_name(item);
        self.build(&[
            "archive",
            self.collection.as_str(),
            year,
            month,
            day,
            self.format.extension(),
            file.as_str(),
        ])
    }

    /// `<token>.<ext>` as stored in the image directory.
    pub fn asset_file_name(&self, item: &WorkItem) -> String {
        format!("{}.{}", file_stem(&item.image_token), self.format.extension())
    }

    fn build(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair(API_KEY_PARAM, &self.api_key);
        url
    }
}

/// URL for display: the `api_key` value replaced with `***`.
pub fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == API_KEY_PARAM) {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}
