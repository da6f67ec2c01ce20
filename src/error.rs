//! Crate-level error type

use crate::config::ConfigError;
use crate::dataset::DatasetError;
use crate::external::SignalError;
use crate::pipeline::PipelineError;
use crate::status::StatusError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimNetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClaimNetResult<T> = Result<T, ClaimNetError>;
