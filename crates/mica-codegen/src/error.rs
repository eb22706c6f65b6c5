use mica_frontend::ast::ExprType;
use thiserror::Error;

/// Classification of a compile failure. Declaration errors concern
/// names (duplicates, unknown identifiers); semantic errors concern
/// types and internal invariants. The first error of either kind
/// aborts the translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Declaration,
    Semantic,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("duplicate declaration of global variable '{0}'")]
    DuplicateGlobal(String),
    #[error("duplicate declaration of local variable '{0}'")]
    DuplicateLocal(String),
    #[error("undeclared variable '{0}'")]
    Undeclared(String),
    #[error("undeclared local variable '{0}'")]
    UnresolvedLocal(String),
    #[error("invalid operands for binary '{op}' (only int and double values can be used)")]
    InvalidBinaryOperands { op: char },
    #[error("cannot assign {found} value to '{name}' of type {expected}")]
    AssignTypeMismatch {
        name: String,
        expected: ExprType,
        found: ExprType,
    },
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::DuplicateGlobal(_)
            | CompileError::DuplicateLocal(_)
            | CompileError::Undeclared(_)
            | CompileError::UnresolvedLocal(_) => ErrorKind::Declaration,
            CompileError::InvalidBinaryOperands { .. }
            | CompileError::AssignTypeMismatch { .. }
            | CompileError::Internal(_) => ErrorKind::Semantic,
        }
    }
}
