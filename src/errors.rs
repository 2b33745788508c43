//! Unified error type for the points service.
//!
//! Every operation returns [`Result`]. Callers that need to turn an error into a
//! response class use [`Error::kind`], which also translates store failures into
//! `Unavailable` or `Internal` instead of leaking raw database errors.

use sea_orm::DbErr;
use thiserror::Error;

/// All errors raised by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced entity does not exist
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "Product")
        entity: &'static str,
        /// The id or name used for the lookup
        key: String,
    },

    /// A malformed argument
    #[error("{message}")]
    InvalidInput {
        /// Message shown to the caller
        message: String,
    },

    /// The requested change conflicts with stored state
    #[error("{message}")]
    AlreadyInDatabase {
        /// Message shown to the caller
        message: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Failure inside the data store
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a `NotFound` error for an entity looked up by `key`.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Builds an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Classifies this error for the caller.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::AlreadyInDatabase { .. } => ErrorKind::Conflict,
            Self::Database(DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
                ErrorKind::Unavailable
            }
            Self::Database(_) | Self::Config { .. } | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

/// Response class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity absent
    NotFound,
    /// Malformed argument
    InvalidInput,
    /// Conflicting state, e.g. a duplicate enrollment
    Conflict,
    /// The data store could not be reached
    Unavailable,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Conventional HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InvalidInput => 400,
            Self::Conflict => 409,
            Self::Unavailable => 503,
            Self::Internal => 500,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_domain_errors_map_to_kinds() {
        assert_eq!(Error::not_found("Product", 7).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::invalid_input("bad flag").kind(),
            ErrorKind::InvalidInput
        );
        let conflict = Error::AlreadyInDatabase {
            message: "Product already in program".to_string(),
        };
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert_eq!(conflict.kind().status_code(), 409);
    }

    #[test]
    fn test_store_errors_are_translated() {
        let conn = Error::from(DbErr::Conn(RuntimeErr::Internal("refused".to_string())));
        assert_eq!(conn.kind(), ErrorKind::Unavailable);
        assert_eq!(conn.kind().status_code(), 503);

        let query = Error::from(DbErr::Custom("constraint failed".to_string()));
        assert_eq!(query.kind(), ErrorKind::Internal);
        assert_eq!(query.kind().status_code(), 500);
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("Product", 999);
        assert_eq!(err.to_string(), "Product not found: 999");
    }
}
