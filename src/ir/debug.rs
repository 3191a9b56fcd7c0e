//! Debug-instrumentation operations and their source locations.
//!
//! Upstream decomposition guarantees a print carries at most one operand
//! by the time it reaches this backend; the `Option<Value>` operand makes
//! that invariant unrepresentable to violate.

use std::fmt;

use super::Value;

/// A debug-instrumentation operation awaiting lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugOp {
    /// Print a literal prefix and an optional single value.
    Print {
        prefix: String,
        operand: Option<Value>,
        /// Render integer operands in hexadecimal.
        hex: bool,
        /// Treat integer operands as signed.
        signed: bool,
    },
    /// Runtime assertion with a message and best-effort source location.
    Assert {
        cond: Value,
        message: String,
        loc: Loc,
    },
    /// Cross-lane synchronization point. A no-op on this backend.
    Barrier,
}

impl fmt::Display for DebugOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugOp::Print {
                prefix,
                operand,
                hex,
                signed,
            } => {
                write!(f, "debug.print {:?}", prefix)?;
                if let Some(v) = operand {
                    write!(f, ", {} : {}", v, v.ty)?;
                }
                if *hex {
                    write!(f, " hex")?;
                }
                if *signed {
                    write!(f, " signed")?;
                }
                Ok(())
            }
            DebugOp::Assert { cond, message, loc } => {
                write!(f, "debug.assert {}, {:?}", cond, message)?;
                if !matches!(loc, Loc::Unknown) {
                    write!(f, " at {}", loc)?;
                }
                Ok(())
            }
            DebugOp::Barrier => write!(f, "debug.barrier"),
        }
    }
}

// ─── Source locations ─────────────────────────────────────────────

/// Sentinel used when a file or function name cannot be resolved.
pub const UNKNOWN_LOC: &str = "unknown";

/// Best-effort source location attached to an assert.
///
/// Locations form a chain: call-site wrappers from inlining, an optional
/// enclosing-function wrapper, and a concrete file/line/column leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loc {
    File {
        file: String,
        line: u32,
        col: u32,
    },
    /// Location inside a named function.
    InFunc {
        func: String,
        inner: Box<Loc>,
    },
    /// Call-site wrapper; the callee side carries the interesting location.
    CallSite {
        callee: Box<Loc>,
    },
    Unknown,
}

/// A location resolved to the strings the assert runtime call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLoc {
    pub file: String,
    pub line: u32,
    pub func: String,
}

impl Loc {
    pub fn file(file: impl Into<String>, line: u32, col: u32) -> Self {
        Loc::File {
            file: file.into(),
            line,
            col,
        }
    }

    pub fn in_func(func: impl Into<String>, inner: Loc) -> Self {
        Loc::InFunc {
            func: func.into(),
            inner: Box::new(inner),
        }
    }

    pub fn call_site(callee: Loc) -> Self {
        Loc::CallSite {
            callee: Box::new(callee),
        }
    }

    /// Unwrap call-site wrappers until a concrete file/line is found,
    /// collecting the innermost enclosing function name along the way.
    /// Anything unresolved falls back to the `"unknown"` sentinels and
    /// line 0.
    pub fn resolve(&self) -> ResolvedLoc {
        let mut resolved = ResolvedLoc {
            file: UNKNOWN_LOC.to_string(),
            line: 0,
            func: UNKNOWN_LOC.to_string(),
        };
        let mut loc = self;
        loop {
            match loc {
                Loc::CallSite { callee } => loc = callee,
                Loc::InFunc { func, inner } => {
                    resolved.func = func.clone();
                    loc = inner;
                }
                Loc::File { file, line, .. } => {
                    resolved.file = file.clone();
                    resolved.line = *line;
                    return resolved;
                }
                Loc::Unknown => return resolved,
            }
        }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loc::File { file, line, col } => write!(f, "{}:{}:{}", file, line, col),
            Loc::InFunc { func, inner } => write!(f, "{}[{}]", func, inner),
            Loc::CallSite { callee } => write!(f, "callsite({})", callee),
            Loc::Unknown => write!(f, "?"),
        }
    }
}

/// The executing unit's position along the three launch-grid axes,
/// queried once per function from the launch context. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate(pub [Value; 3]);

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Type;

    #[test]
    fn test_resolve_concrete_file() {
        let loc = Loc::file("kernel.rpt", 42, 7);
        let r = loc.resolve();
        assert_eq!(r.file, "kernel.rpt");
        assert_eq!(r.line, 42);
        assert_eq!(r.func, "unknown");
    }

    #[test]
    fn test_resolve_unwraps_call_sites() {
        let loc = Loc::call_site(Loc::call_site(Loc::in_func(
            "softmax",
            Loc::file("model.rpt", 9, 1),
        )));
        let r = loc.resolve();
        assert_eq!(r.file, "model.rpt");
        assert_eq!(r.line, 9);
        assert_eq!(r.func, "softmax");
    }

    #[test]
    fn test_resolve_unknown_uses_sentinels() {
        let r = Loc::Unknown.resolve();
        assert_eq!(r.file, "unknown");
        assert_eq!(r.func, "unknown");
        assert_eq!(r.line, 0);

        // A call-site chain that never reaches a concrete file.
        let r = Loc::call_site(Loc::Unknown).resolve();
        assert_eq!(r.file, "unknown");
        assert_eq!(r.line, 0);
    }

    #[test]
    fn test_debug_op_display() {
        let op = DebugOp::Print {
            prefix: "x: ".into(),
            operand: Some(Value::new("x", Type::Int(32))),
            hex: true,
            signed: false,
        };
        assert_eq!(format!("{}", op), "debug.print \"x: \", %x : i32 hex");

        let op = DebugOp::Print {
            prefix: "tick".into(),
            operand: None,
            hex: false,
            signed: false,
        };
        assert_eq!(format!("{}", op), "debug.print \"tick\"");

        let op = DebugOp::Assert {
            cond: Value::new("ok", Type::Int(1)),
            message: "lane out of range".into(),
            loc: Loc::file("kernel.rpt", 3, 5),
        };
        assert_eq!(
            format!("{}", op),
            "debug.assert %ok, \"lane out of range\" at kernel.rpt:3:5"
        );

        assert_eq!(format!("{}", DebugOp::Barrier), "debug.barrier");
    }
}
