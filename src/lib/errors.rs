use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Server { code: i64, message: String },
    Parse(String),
    Serialization(String),
    Storage(String),
}

impl AppError {
    /// Returns the message without its category prefix, used as notice body text.
    pub fn detail(&self) -> &str {
        match self {
            AppError::Config(message)
            | AppError::Network(message)
            | AppError::Timeout(message)
            | AppError::Parse(message)
            | AppError::Serialization(message)
            | AppError::Storage(message)
            | AppError::Http { message, .. }
            | AppError::Server { message, .. } => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            AppError::Server { code, message } => {
                write!(formatter, "Server rejected request ({code}): {message}")
            }
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
            AppError::Storage(message) => write!(formatter, "Storage error: {message}"),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn detail_strips_category_prefix() {
        let err = AppError::Http {
            status: 404,
            message: "not here".to_string(),
        };
        assert_eq!(err.detail(), "not here");
        assert_eq!(err.to_string(), "Request failed (404): not here");
    }

    #[test]
    fn server_error_displays_code() {
        let err = AppError::Server {
            code: 409,
            message: "IP already has an active session".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Server rejected request (409): IP already has an active session"
        );
    }
}
