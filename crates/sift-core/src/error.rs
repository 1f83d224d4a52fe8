use crate::{
    cache::{CacheError, DiscoveryError},
    domain::DomainError,
    handle::HandleError,
    procedure::ProcedureError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Classified error for callers that want one type across every boundary.
/// Per-boundary enums stay the source of truth; this only adds class and
/// origin for routing and reporting.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<HandleError> for Error {
    fn from(err: HandleError) -> Self {
        let class = match err {
            HandleError::ConflictingRegex { .. } => ErrorClass::Conflict,
            HandleError::UnknownField { .. } | HandleError::UnreachableColumn { .. } => {
                ErrorClass::NotFound
            }
            HandleError::MissingAttribute { .. }
            | HandleError::EmptyPathSegment { .. }
            | HandleError::MissingNativeQuery { .. } => ErrorClass::InvalidArgument,
        };

        Self::new(class, ErrorOrigin::Handle, err.to_string())
    }
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Domain,
            err.to_string(),
        )
    }
}

impl From<DiscoveryError> for Error {
    fn from(err: DiscoveryError) -> Self {
        let class = match err {
            DiscoveryError::SchemaNotFound { .. } | DiscoveryError::IndexNotFound { .. } => {
                ErrorClass::NotFound
            }
            DiscoveryError::AmbiguousName { .. } => ErrorClass::Conflict,
            DiscoveryError::Unavailable { .. } => ErrorClass::Unavailable,
        };

        Self::new(class, ErrorOrigin::Discovery, err.to_string())
    }
}

impl From<CacheError> for Error {
    fn from(err: CacheError) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Cache, err.to_string())
    }
}

impl From<ProcedureError> for Error {
    fn from(err: ProcedureError) -> Self {
        let class = match err {
            ProcedureError::NotFound { .. } => ErrorClass::NotFound,
            ProcedureError::Duplicate { .. } => ErrorClass::Conflict,
            ProcedureError::InvalidIdentifier { .. }
            | ProcedureError::Arity { .. }
            | ProcedureError::ArgumentKind { .. }
            | ProcedureError::ArgumentOrder { .. } => ErrorClass::InvalidArgument,
            ProcedureError::Failed { .. } => ErrorClass::Internal,
        };

        Self::new(class, ErrorOrigin::Procedure, err.to_string())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    NotFound,
    Conflict,
    Unavailable,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Handle,
    Domain,
    Discovery,
    Cache,
    Procedure,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Handle => "handle",
            Self::Domain => "domain",
            Self::Discovery => "discovery",
            Self::Cache => "cache",
            Self::Procedure => "procedure",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_errors_are_classified() {
        let err = Error::from(HandleError::ConflictingRegex {
            column: "a".into(),
            existing: "x".into(),
            pattern: "y".into(),
        });
        assert_eq!(err.class, ErrorClass::Conflict);
        assert_eq!(err.origin, ErrorOrigin::Handle);
        assert!(err.display_with_class().starts_with("handle:conflict: "));
    }

    #[test]
    fn discovery_not_found_is_not_found() {
        let err = Error::from(DiscoveryError::IndexNotFound {
            schema: "s".into(),
            index: "i".into(),
        });
        assert!(err.is_not_found());
        assert_eq!(err.origin, ErrorOrigin::Discovery);
    }

    #[test]
    fn procedure_arity_is_invalid_argument() {
        let err = Error::from(ProcedureError::Arity {
            procedure: "system.flush_metadata_cache".into(),
            expected: 0,
            found: 1,
        });
        assert_eq!(err.class, ErrorClass::InvalidArgument);
        assert_eq!(
            err.to_string(),
            "procedure 'system.flush_metadata_cache' expects 0 arguments, got 1"
        );
    }
}
