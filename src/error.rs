//! Error types and handling for the airport weather store

use std::fmt;

use thiserror::Error;

/// Input field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Iata,
    Latitude,
    Longitude,
    Category,
    Radius,
}

impl Field {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Iata => "iata",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Category => "category",
            Field::Radius => "radius",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the airport weather store
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Caller supplied a malformed or out-of-range value; nothing was changed
    #[error("{message}")]
    Validation { field: Field, message: String },

    /// The operation requires an airport that is not registered
    #[error("Airport with iata=[{iata}] has not found")]
    NotFound { iata: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed bootstrap input
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// HTTP client errors
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherError {
    /// Create a new validation error for `field`
    pub fn validation<S: Into<String>>(field: Field, message: S) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a new not-found error for an IATA code
    pub fn not_found<S: Into<String>>(iata: S) -> Self {
        Self::NotFound { iata: iata.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a new HTTP client error
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// The offending field, for validation errors
    #[must_use]
    pub fn field(&self) -> Option<Field> {
        match self {
            WeatherError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, WeatherError::Validation { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::NotFound { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Validation { message, .. } => message.clone(),
            WeatherError::NotFound { .. } => self.to_string(),
            WeatherError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            WeatherError::Parse { line, .. } => {
                format!("Airport file is malformed at line {line}.")
            }
            WeatherError::Http { .. } => {
                "Unable to reach the weather server. Please check that it is running.".to_string()
            }
            WeatherError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::http(err.to_string())
    }
}
