//! Module: procedure
//! Responsibility: administrative procedures callable as `schema.name(args)`.
//! Does not own: SQL `CALL` parsing or access control.
//! Boundary: handlers receive literal arguments that already passed the
//! arity and kind checks.

mod flush;


pub use flush::{FLUSH_METADATA_CACHE, MetadataCacheCoordinator, SYSTEM_SCHEMA};

use crate::value::{Literal, LiteralKind};
use std::{collections::BTreeMap, fmt, sync::Arc};
use thiserror::Error as ThisError;

type Handler = Arc<dyn Fn(&[Literal]) -> Result<(), ProcedureError> + Send + Sync>;

///
/// ProcedureError
///

#[derive(Debug, ThisError)]
pub enum ProcedureError {
    #[error("'{identifier}' is not a valid procedure identifier")]
    InvalidIdentifier { identifier: String },

    #[error("procedure '{procedure}' is already registered")]
    Duplicate { procedure: String },

    #[error("procedure '{procedure}' not found")]
    NotFound { procedure: String },

    #[error("procedure '{procedure}' expects {expected} arguments, got {found}")]
    Arity {
        procedure: String,
        expected: usize,
        found: usize,
    },

    #[error("argument '{argument}' of procedure '{procedure}' expects {expected}, got {found}")]
    ArgumentKind {
        procedure: String,
        argument: String,
        expected: LiteralKind,
        found: LiteralKind,
    },

    #[error("required argument '{argument}' of procedure '{procedure}' follows an optional one")]
    ArgumentOrder { procedure: String, argument: String },

    #[error("procedure '{procedure}' failed: {message}")]
    Failed { procedure: String, message: String },
}

///
/// ProcedureArgument
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcedureArgument {
    name: String,
    kind: LiteralKind,
    required: bool,
}

impl ProcedureArgument {
    pub fn required(name: impl Into<String>, kind: LiteralKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, kind: LiteralKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> LiteralKind {
        self.kind
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

///
/// Procedure
///
/// Named handler with a fixed argument list. Required arguments precede
/// optional ones.
///

#[derive(Clone)]
pub struct Procedure {
    schema: String,
    name: String,
    arguments: Vec<ProcedureArgument>,
    handler: Handler,
}

impl Procedure {
    pub fn try_new<F>(
        schema: impl Into<String>,
        name: impl Into<String>,
        arguments: Vec<ProcedureArgument>,
        handler: F,
    ) -> Result<Self, ProcedureError>
    where
        F: Fn(&[Literal]) -> Result<(), ProcedureError> + Send + Sync + 'static,
    {
        let schema = schema.into();
        let name = name.into();

        for identifier in [&schema, &name]
            .into_iter()
            .chain(arguments.iter().map(|arg| &arg.name))
        {
            if !is_identifier(identifier) {
                return Err(ProcedureError::InvalidIdentifier {
                    identifier: identifier.clone(),
                });
            }
        }
        if let Some(split) = arguments.iter().position(|arg| !arg.required)
            && let Some(late) = arguments[split..].iter().find(|arg| arg.required)
        {
            return Err(ProcedureError::ArgumentOrder {
                procedure: format!("{schema}.{name}"),
                argument: late.name.clone(),
            });
        }

        Ok(Self {
            schema,
            name,
            arguments,
            handler: Arc::new(handler),
        })
    }

    // Zero-argument procedure named by constants already known to be valid.
    pub(crate) fn builtin<F>(schema: &'static str, name: &'static str, handler: F) -> Self
    where
        F: Fn(&[Literal]) -> Result<(), ProcedureError> + Send + Sync + 'static,
    {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            arguments: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn arguments(&self) -> &[ProcedureArgument] {
        &self.arguments
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Check `args` against the declared arguments, then run the handler.
    pub fn invoke(&self, args: &[Literal]) -> Result<(), ProcedureError> {
        let required = self.arguments.iter().filter(|arg| arg.required).count();
        if args.len() < required || args.len() > self.arguments.len() {
            return Err(ProcedureError::Arity {
                procedure: self.qualified_name(),
                expected: if args.len() < required {
                    required
                } else {
                    self.arguments.len()
                },
                found: args.len(),
            });
        }

        for (argument, value) in self.arguments.iter().zip(args) {
            if value.kind() != argument.kind {
                return Err(ProcedureError::ArgumentKind {
                    procedure: self.qualified_name(),
                    argument: argument.name.clone(),
                    expected: argument.kind,
                    found: value.kind(),
                });
            }
        }

        (self.handler)(args)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("schema", &self.schema)
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

///
/// ProcedureRegistry
///
/// Procedures keyed by qualified name.
///

#[derive(Debug, Default)]
pub struct ProcedureRegistry {
    procedures: BTreeMap<String, Procedure>,
}

impl ProcedureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, procedure: Procedure) -> Result<(), ProcedureError> {
        let key = procedure.qualified_name();
        if self.procedures.contains_key(&key) {
            return Err(ProcedureError::Duplicate { procedure: key });
        }
        self.procedures.insert(key, procedure);

        Ok(())
    }

    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<&Procedure> {
        self.procedures.get(qualified_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(String::as_str)
    }

    pub fn call(&self, qualified_name: &str, args: &[Literal]) -> Result<(), ProcedureError> {
        self.get(qualified_name)
            .ok_or_else(|| ProcedureError::NotFound {
                procedure: qualified_name.to_string(),
            })?
            .invoke(args)
    }
}

// lowercase ASCII identifier: [a-z_][a-z0-9_]*
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();

    chars
        .next()
        .is_some_and(|first| first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
