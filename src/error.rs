use thiserror::Error;

/// Errors shared by the three pipeline stages.
///
/// Everything here is fatal for the stage that raised it; the one recovered
/// failure mode, a change value that does not parse as a number, never
/// becomes an error value. It is kept as a missing cell and only surfaces
/// as [`PriceError::MissingChange`] if the estimator actually consults it.
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input format error: {0}")]
    InputFormat(String),

    #[error("no change record for {item:?} in {year}")]
    MissingChange { item: String, year: i32 },

    #[error("no base price for {item:?}")]
    MissingBasePrice { item: String },
}

pub type Result<T> = std::result::Result<T, PriceError>;
