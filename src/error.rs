// Error handling module
// Defines the error types shared by the prober and the fleet client

use thiserror::Error;

/// Errors that can occur while talking to the fleet API
#[derive(Error, Debug)]
pub enum FleetError {
    /// Connection refused, timeout, TLS failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status from the fleet API
    #[error("Fleet API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Decode error: {0}")]
    Decode(String),

    /// GraphQL response carried an `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// No vehicle matched the requested name
    #[error("No vehicle found matching '{0}'")]
    VehicleNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FleetError {
    fn from(err: serde_json::Error) -> Self {
        FleetError::Decode(err.to_string())
    }
}

/// Result type alias for fleet operations
pub type Result<T> = std::result::Result<T, FleetError>;
