//! Errors raised outside the parsing core. Parsing itself never fails; these
//! cover the record wrapper, row decoding and settings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid unix timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
