//! riptide-cpu — CPU-backend lowering of debug instrumentation.
//!
//! One stage of the Riptide lowering pipeline: `debug.print`,
//! `debug.assert`, and `debug.barrier` ops become calls against a small
//! fixed runtime ABI (or disappear, for barriers). See `lower` for the
//! lowering logic and `lower::runtime` for the ABI.

pub mod diagnostic;
pub mod ir;
pub mod lower;

pub use diagnostic::{pass_error_diagnostic, Diagnostic, Severity, Span};
pub use ir::debug::{Coordinate, DebugOp, Loc};
pub use ir::{Function, Instr, Module, Type, Value};
pub use lower::{InvariantViolation, LaunchCtx, LowerDebugPass, PassError};
