pub mod config;
pub mod logging;

pub mod endpoint;
pub mod error;
pub mod feed;
pub mod http;
pub mod model;
pub mod pipeline;
pub mod sanitize;
pub mod storage;
