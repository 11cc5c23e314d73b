//! Structured repository error carrying the operation, a failure kind, and
//! optional entity context.

use thiserror::Error;

/// The repository operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOperation {
    FindAll,
    FindById,
    FindByCategory,
    Exists,
    Save,
    Delete,
    Count,
}

impl std::fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FindAll => "find_all",
            Self::FindById => "find_by_id",
            Self::FindByCategory => "find_by_category",
            Self::Exists => "exists",
            Self::Save => "save",
            Self::Delete => "delete",
            Self::Count => "count",
        };
        write!(f, "{name}")
    }
}

/// Classification of a repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryErrorKind {
    /// The requested entity does not exist.
    NotFound,
    /// Input rejected before any write happened.
    ValidationFailed,
    /// The store rejected the write (e.g. foreign key, unique index).
    ConstraintViolation,
    /// Could not reach the store.
    ConnectionFailed,
    Timeout,
    /// The store reported an error or returned inconsistent data.
    DatabaseError,
    Other,
}

impl std::fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotFound => "not_found",
            Self::ValidationFailed => "validation_failed",
            Self::ConstraintViolation => "constraint_violation",
            Self::ConnectionFailed => "connection_failed",
            Self::Timeout => "timeout",
            Self::DatabaseError => "database_error",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Error)]
#[error("repository {operation} failed ({kind}): {message}")]
pub struct RepositoryError {
    pub operation: RepositoryOperation,
    pub kind: RepositoryErrorKind,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

impl RepositoryError {
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    pub fn not_found(entity_type: impl Into<String>, entity_id: impl std::fmt::Display) -> Self {
        let entity_type = entity_type.into();
        let entity_id = entity_id.to_string();
        Self {
            operation: RepositoryOperation::FindById,
            kind: RepositoryErrorKind::NotFound,
            message: format!("{entity_type} {entity_id} not found"),
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
        }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Save,
            RepositoryErrorKind::ValidationFailed,
            message,
        )
    }

    pub fn constraint_violation(
        operation: RepositoryOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::ConstraintViolation, message)
    }

    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl std::fmt::Display,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether retrying the same call could succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::new(
                RepositoryOperation::FindById,
                RepositoryErrorKind::NotFound,
                "row not found",
            ),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() || db.is_unique_violation() => {
                Self::new(
                    RepositoryOperation::Save,
                    RepositoryErrorKind::ConstraintViolation,
                    db.message().to_string(),
                )
            }
            sqlx::Error::PoolTimedOut => Self::new(
                RepositoryOperation::FindAll,
                RepositoryErrorKind::Timeout,
                "connection pool timed out",
            ),
            sqlx::Error::Io(_) | sqlx::Error::PoolClosed => Self::new(
                RepositoryOperation::FindAll,
                RepositoryErrorKind::ConnectionFailed,
                err.to_string(),
            ),
            _ => Self::new(
                RepositoryOperation::FindAll,
                RepositoryErrorKind::DatabaseError,
                err.to_string(),
            ),
        }
    }
}
