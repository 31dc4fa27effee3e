use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Invalid configuration value for {field}: {details}")]
    InvalidConfig { field: String, details: String },

    #[error("Invalid compounding frequency {0}: must be one of 1, 2, 4 or 12 per year")]
    InvalidCompoundingFrequency(u32),

    #[error("Invalid GST mode '{0}': expected 'add' or 'remove'")]
    InvalidGstMode(String),

    #[error("Invalid gold purity '{0}': expected one of 24K, 22K, 18K, 14K")]
    InvalidPurity(String),

    #[error("Unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
