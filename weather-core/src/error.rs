use thiserror::Error;

/// Broad category of a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    Authentication,
    NotFound,
    Provider,
    Network,
    Unexpected,
}

/// Why a lookup produced no summary.
///
/// The `Display` output is the user-facing message shown by both front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("API key not configured")]
    MissingCredential,

    #[error("Please enter a city name")]
    EmptyCity,

    #[error("Invalid API key. Please check your OpenWeatherMap API key.")]
    InvalidCredential,

    #[error("City \"{city}\" not found. Please check the spelling.")]
    CityNotFound { city: String },

    #[error("API Error: {status} - {reason}")]
    Provider { status: u16, reason: String },

    #[error("Network error: Please check your internet connection.")]
    Network,

    #[error("Error fetching weather data: {0}")]
    Unexpected(String),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::MissingCredential => ErrorKind::Configuration,
            LookupError::EmptyCity => ErrorKind::InvalidInput,
            LookupError::InvalidCredential => ErrorKind::Authentication,
            LookupError::CityNotFound { .. } => ErrorKind::NotFound,
            LookupError::Provider { .. } => ErrorKind::Provider,
            LookupError::Network => ErrorKind::Network,
            LookupError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}
