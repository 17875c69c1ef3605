use config::ConfigError;
use mongodb::error::{Error as DBError, ErrorKind as DBErrorKind};
use std::time::Duration;

/// Code attached to every rejected (empty or zero) argument.
pub const INVALID_ARGUMENT_CODE: u16 = 400;
/// Code attached to a failed contact lookup by internal id.
pub const CONTACT_NOT_FOUND_CODE: u16 = 4001;

#[derive(Debug)]
pub enum Error {
    InvalidArgument(&'static str),
    UnparsableArgument { argument: &'static str, value: String },
    ContactNotFound { internal_id: i64, product_id: i64 },
    ConnectionFailure(DBError),
    DbError(DBError),
    ConfigError(ConfigError),
    Timeout(Duration),
    MalformedRecord(String),
}

impl Error {
    pub fn code(&self) -> u16 {
        match self {
            Error::InvalidArgument(_) | Error::UnparsableArgument { .. } => INVALID_ARGUMENT_CODE,
            Error::ContactNotFound { .. } => CONTACT_NOT_FOUND_CODE,
            Error::ConnectionFailure(_) => 503,
            Error::Timeout(_) => 504,
            Error::DbError(_) | Error::ConfigError(_) | Error::MalformedRecord(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ContactNotFound { .. })
    }

    /// True when the driver rejected the credentials, either while connecting
    /// or on a later operation.
    pub fn is_authentication(&self) -> bool {
        match self {
            Error::ConnectionFailure(e) | Error::DbError(e) => {
                matches!(*e.kind, DBErrorKind::Authentication { .. })
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(argument) => {
                write!(f, "Empty data: {} must not be empty", argument)
            }
            Error::UnparsableArgument { argument, value } => {
                write!(f, "Cannot parse {} from {:?}", argument, value)
            }
            Error::ContactNotFound {
                internal_id,
                product_id,
            } => {
                write!(
                    f,
                    "Contact not found by internal ID {} (product {})",
                    internal_id, product_id
                )
            }
            Error::ConnectionFailure(e) => {
                write!(f, "Cannot connect to the database: {}", e)
            }
            Error::DbError(e) => {
                write!(f, "There's a problem with the database: {}", e)
            }
            Error::ConfigError(e) => {
                write!(f, "Cannot load settings: {}", e)
            }
            Error::Timeout(limit) => {
                write!(f, "Database call timed out after {:?}", limit)
            }
            Error::MalformedRecord(what) => {
                write!(f, "Malformed record: {}", what)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConnectionFailure(e) | Error::DbError(e) => Some(e),
            Error::ConfigError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DBError> for Error {
    fn from(e: DBError) -> Self {
        Error::DbError(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::ConfigError(e)
    }
}
