//! Lowering error types.
//!
//! Two-level taxonomy: `InvariantViolation` for compiler-internal
//! precondition failures (an upstream bug, never user error), and
//! `PassError` for the pass-level failure that aborts lowering of the
//! whole module. Neither is recoverable.

use std::fmt;

/// A compiler-internal invariant was violated during lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub message: String,
}

impl InvariantViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "internal invariant violated: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Failure of the debug-lowering pass over one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    /// A function containing debug ops has no launch coordinate
    /// registered in the context.
    MissingCoordinate { func: String },
    /// A debug op could not be legalized.
    Legalize {
        func: String,
        /// Index of the offending instruction within the function body.
        index: usize,
        /// Printed form of the offending op.
        op: String,
        source: InvariantViolation,
    },
}

impl PassError {
    /// The function the failure occurred in.
    pub fn func(&self) -> &str {
        match self {
            PassError::MissingCoordinate { func } => func,
            PassError::Legalize { func, .. } => func,
        }
    }

    /// Instruction index of the offending op, if the failure has one.
    pub fn instr_index(&self) -> Option<usize> {
        match self {
            PassError::MissingCoordinate { .. } => None,
            PassError::Legalize { index, .. } => Some(*index),
        }
    }
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassError::MissingCoordinate { func } => {
                write!(f, "no launch coordinate registered for fn @{}", func)
            }
            PassError::Legalize {
                func,
                index,
                op,
                source,
            } => {
                write!(
                    f,
                    "cannot legalize `{}` in fn @{} (instr {}): {}",
                    op, func, index, source
                )
            }
        }
    }
}

impl std::error::Error for PassError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PassError::MissingCoordinate { .. } => None,
            PassError::Legalize { source, .. } => Some(source),
        }
    }
}
