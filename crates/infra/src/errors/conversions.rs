//! Conversions from external infrastructure errors into domain errors.

use deadpool_postgres::PoolError;
use ias_adapter_domain::IasAdapterError;
use reqwest::Error as HttpError;
use tokio_postgres::error::SqlState;
use tokio_postgres::Error as PgError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub IasAdapterError);

impl From<InfraError> for IasAdapterError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<IasAdapterError> for InfraError {
    fn from(value: IasAdapterError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAdapterError {
    fn into_adapter(self) -> IasAdapterError;
}

/* -------------------------------------------------------------------------- */
/* tokio_postgres::Error → IasAdapterError */
/* -------------------------------------------------------------------------- */

impl IntoAdapterError for PgError {
    fn into_adapter(self) -> IasAdapterError {
        if self.is_closed() {
            return IasAdapterError::Database("database connection closed".into());
        }

        let Some(db_error) = self.as_db_error() else {
            return IasAdapterError::Database(self.to_string());
        };

        let code = db_error.code();
        let message = db_error.message().to_string();

        if *code == SqlState::UNIQUE_VIOLATION {
            IasAdapterError::AlreadyExists(format!("unique constraint violation: {message}"))
        } else if *code == SqlState::UNDEFINED_TABLE {
            IasAdapterError::Database(format!("missing table: {message}"))
        } else if *code == SqlState::INVALID_PASSWORD
            || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION
        {
            IasAdapterError::Auth(format!("database rejected credentials: {message}"))
        } else {
            IasAdapterError::Database(format!("postgres error {}: {message}", code.code()))
        }
    }
}

impl From<PgError> for InfraError {
    fn from(value: PgError) -> Self {
        InfraError(value.into_adapter())
    }
}

/* -------------------------------------------------------------------------- */
/* deadpool_postgres::PoolError → IasAdapterError */
/* -------------------------------------------------------------------------- */

impl IntoAdapterError for PoolError {
    fn into_adapter(self) -> IasAdapterError {
        match self {
            PoolError::Backend(err) => err.into_adapter(),
            PoolError::Timeout(_) => {
                IasAdapterError::Database("timed out waiting for a database connection".into())
            }
            PoolError::Closed => IasAdapterError::Database("database pool is closed".into()),
            other => IasAdapterError::Database(format!("database pool error: {other}")),
        }
    }
}

impl From<PoolError> for InfraError {
    fn from(value: PoolError) -> Self {
        InfraError(value.into_adapter())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → IasAdapterError */
/* -------------------------------------------------------------------------- */

impl IntoAdapterError for HttpError {
    fn into_adapter(self) -> IasAdapterError {
        if self.is_timeout() {
            return IasAdapterError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return IasAdapterError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return IasAdapterError::Serialization(format!("invalid HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => IasAdapterError::Auth(message),
                404 => IasAdapterError::NotFound(message),
                400..=499 => IasAdapterError::InvalidInput(message),
                _ => IasAdapterError::Network(message),
            };
        }

        IasAdapterError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_adapter())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → IasAdapterError */
/* -------------------------------------------------------------------------- */

impl IntoAdapterError for std::io::Error {
    fn into_adapter(self) -> IasAdapterError {
        match self.kind() {
            std::io::ErrorKind::NotFound => IasAdapterError::NotFound(self.to_string()),
            _ => IasAdapterError::Internal(format!("I/O error: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_adapter())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
