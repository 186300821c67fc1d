use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacingError {
    #[error("Invalid date in {context}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { context: String, value: String },

    #[error("Invalid monetary value in {context}: '{value}'")]
    InvalidMoney { context: String, value: String },

    #[error("Invalid contract for partner '{partner}': {details}")]
    ValidationError { partner: String, details: String },

    #[error("Contract for partner '{partner}' does not cover a single finance week")]
    EmptyWeekRange { partner: String },

    #[error("Reference date {reference} is outside reporting month {year:04}-{month:02}")]
    ReferenceOutsideMonth {
        reference: String,
        year: i32,
        month: u32,
    },

    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PacingError>;
