//! EPIC image metadata records as served by the feed and persisted to disk.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Position vector in the J2000 reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quaternion {
    pub q0: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// One image record from the daily feed.
///
/// Field names match the upstream JSON so the persisted metadata file has the
/// same shape as the API response entry. Missing fields default, unknown
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkItem {
    pub identifier: String,
    pub caption: String,
    /// Image token, e.g. `epic_1b_20200923001751`. Names both the metadata
    /// file and the archive asset.
    #[serde(rename = "image")]
    pub image_token: String,
    pub version: String,
    #[serde(rename = "centroid_coordinates")]
    pub centroid: LatLon,
    pub dscovr_j2000_position: Xyz,
    pub lunar_j2000_position: Xyz,
    pub sun_j2000_position: Xyz,
    pub attitude_quaternions: Quaternion,
    pub date: String,
}

impl WorkItem {
    /// Year, month and day taken from the last `_`-delimited segment of the
    /// image token. Not validated: a short or malformed token yields empty or
    /// garbage segments.
    pub fn date_segments(&self) -> [&str; 3] {
        date_segments(&self.image_token)
    }

    /// `YYYY/MM/DD` archive path for this item.
    pub fn date_path(&self) -> String {
        date_path(&self.image_token)
    }
}

/// Splits `<prefix>_<YYYYMMDD...>` into `[YYYY, MM, DD]`.
pub fn date_segments(token: &str) -> [&str; 3] {
    let stamp = token.rsplit('_').next().unwrap_or(token);
    [
        stamp.get(0..4).unwrap_or(""),
        stamp.get(4..6).unwrap_or(""),
        stamp.get(6..8).unwrap_or(""),
    ]
}

/// `date_path("epic_1b_20200923001751") == "2020/09/23"`.
pub fn date_path(token: &str) -> String {
    date_segments(token).join("/")
}
