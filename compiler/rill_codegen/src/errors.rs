//! Error types for code generation.
//!
//! Every failure mode is a typed variant carrying structured data, so the
//! driver can match on kinds instead of parsing message strings. The
//! `Display` impl produces the user-facing message text.
//!
//! All errors are fatal to the single function or expression being
//! lowered, never to the process: lowering is all-or-nothing, with no
//! retries and no partial results.

use std::fmt;

/// Result of lowering one expression or function.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Typed code generation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodegenError {
    /// Variable read with no visible binding.
    UnknownIdentifier { name: String },
    /// Assignment target has no visible binding.
    UnboundAssignment { name: String },
    /// Call to a function the table has never seen.
    UnknownFunction { name: String },
    /// Call-site argument count differs from the resolved prototype.
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    /// A full definition for a function that already has a body.
    Redefinition { name: String },
    /// Arity disagrees with a prior declaration of the same name.
    SignatureConflict { name: String },
    /// Backend-detected structural defect in an otherwise successfully
    /// lowered function. The staged function is removed before this
    /// propagates.
    VerificationFailed { name: String },
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentifier { name } => write!(f, "unknown identifier: {name}"),
            Self::UnboundAssignment { name } => {
                write!(f, "assignment to unbound variable: {name}")
            }
            Self::UnknownFunction { name } => write!(f, "unknown function: {name}"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => write!(
                f,
                "function {name} expects {expected} argument(s), got {got}"
            ),
            Self::Redefinition { name } => write!(f, "function {name} already has a body"),
            Self::SignatureConflict { name } => {
                write!(f, "conflicting signature for function {name}")
            }
            Self::VerificationFailed { name } => {
                write!(f, "verification failed for function {name}")
            }
        }
    }
}

impl std::error::Error for CodegenError {}
