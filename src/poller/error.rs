use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("predict error: {0}")]
    Predict(#[from] PredictError),
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
    #[error("pointing error: {0}")]
    Pointing(std::io::Error),
}
