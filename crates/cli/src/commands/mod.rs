//! CLI command implementations.

pub mod input;
pub mod pack;
pub mod plan;

use std::path::PathBuf;

use parcelwise_core::{ParcelTypeKeyError, TooManyUnits};
use thiserror::Error;

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Order too large: {0}")]
    TooManyUnits(#[from] TooManyUnits),
    #[error("Invalid parcel type key: {0}")]
    ParcelTypeKey(#[from] ParcelTypeKeyError),
    #[error("Failed to write output: {0}")]
    Write(#[from] serde_json::Error),
}
