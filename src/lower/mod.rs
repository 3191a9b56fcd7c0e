//! Debug-instrumentation lowering for the CPU backend.
//!
//! Replaces `debug.print` / `debug.assert` / `debug.barrier` ops with
//! calls against the fixed runtime ABI (`lower::runtime`). Driven one op
//! at a time, single-threaded, no reentrancy; per-module mutable state
//! lives in an explicit `ModuleLoweringState` owned by the pass.

pub mod error;
pub mod format;
pub mod promote;
pub mod runtime;
pub mod state;


use std::collections::HashMap;

use crate::ir::debug::{Coordinate, DebugOp, Loc};
use crate::ir::{CallInstr, Instr, Module, Operand, Type, Value};

pub use error::{InvariantViolation, PassError};
pub use state::ModuleLoweringState;

use format::format_token;
use promote::promote;

// ─── Launch context ───────────────────────────────────────────────

/// Read-only host-injected context: the launch coordinate for each
/// function that may contain debug ops. Passed into every lowering call
/// instead of being queried from an enclosing-scope walk.
#[derive(Debug, Default)]
pub struct LaunchCtx {
    coords: HashMap<String, Coordinate>,
}

impl LaunchCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_coordinate(&mut self, func: impl Into<String>, coord: Coordinate) {
        self.coords.insert(func.into(), coord);
    }

    pub fn coordinate(&self, func: &str) -> Option<&Coordinate> {
        self.coords.get(func)
    }
}

// ─── Dispatcher ───────────────────────────────────────────────────

/// Classification predicate: scalar path if there is no operand or the
/// operand is scalar-typed; otherwise the operand is a rank-1 buffer and
/// takes the vector path.
pub fn use_scalar_path(operand: Option<&Value>) -> bool {
    operand.map_or(true, |v| v.ty.is_scalar())
}

/// Lower one debug op to zero or one runtime calls. The caller removes
/// the original op; `Ok(None)` means it is removed without replacement.
pub fn lower_debug_op(
    op: &DebugOp,
    coord: &Coordinate,
    state: &mut ModuleLoweringState,
) -> Result<Option<CallInstr>, InvariantViolation> {
    match op {
        DebugOp::Print {
            prefix,
            operand,
            hex,
            signed,
        } => match operand {
            Some(v) if !use_scalar_path(Some(v)) => {
                lower_vector_print(prefix, v, *hex, *signed, coord, state).map(Some)
            }
            _ => lower_scalar_print(prefix, operand.as_ref(), *hex, *signed, coord, state)
                .map(Some),
        },
        DebugOp::Assert { cond, message, loc } => {
            lower_assert(cond, message, loc, coord, state).map(Some)
        }
        // Synchronization is unneeded in this backend's execution model.
        DebugOp::Barrier => Ok(None),
    }
}

/// Scalar path: compose and intern the full format string, promote the
/// operand, call the variadic scalar-print symbol.
///
/// The format string is `(<c0>, <c1>, <c2>)<prefix><operand?>\n`, so a
/// zero-operand print still reports the launch coordinate.
fn lower_scalar_print(
    prefix: &str,
    operand: Option<&Value>,
    hex: bool,
    signed: bool,
    coord: &Coordinate,
    state: &mut ModuleLoweringState,
) -> Result<CallInstr, InvariantViolation> {
    if prefix.is_empty() {
        return Err(InvariantViolation::new("print with empty prefix"));
    }

    let mut fmt = String::from("(");
    for (i, pid) in coord.0.iter().enumerate() {
        if i > 0 {
            fmt.push_str(", ");
        }
        fmt.push_str(&format_token(&pid.ty, false, None, false)?);
    }
    fmt.push(')');
    fmt.push_str(prefix);
    if let Some(v) = operand {
        fmt.push_str(&format_token(&v.ty, hex, None, signed)?);
    }
    fmt.push('\n');

    let fmt_global = state.intern("printf_format_", &fmt);
    state.get_or_declare(runtime::SCALAR_PRINT, runtime::scalar_print_sig);

    let mut args = vec![Operand::Global(fmt_global)];
    for pid in &coord.0 {
        args.push(Operand::Use(pid.clone()));
    }
    if let Some(v) = operand {
        args.push(promote(v, signed));
    }

    Ok(CallInstr {
        callee: runtime::SCALAR_PRINT.to_string(),
        args,
    })
}

/// Vector path: intern the literal prefix and call the fixed-arity
/// vector-print symbol with the buffer descriptor and element layout.
///
/// Rank-1 only; higher-rank values are not decomposed to buffers
/// upstream, so they never reach this path.
fn lower_vector_print(
    prefix: &str,
    operand: &Value,
    hex: bool,
    signed: bool,
    coord: &Coordinate,
    state: &mut ModuleLoweringState,
) -> Result<CallInstr, InvariantViolation> {
    if prefix.is_empty() {
        return Err(InvariantViolation::new("print with empty prefix"));
    }

    let elem = match &operand.ty {
        Type::Buf(elem) => elem.as_ref(),
        other => {
            return Err(InvariantViolation::new(format!(
                "print operand must be scalar or rank-1 buffer, got {}",
                other
            )))
        }
    };
    let elem_bits = elem.int_or_float_bits().ok_or_else(|| {
        InvariantViolation::new(format!("unsupported buffer element type: {}", elem))
    })?;

    let prefix_global = state.intern("vector_print_prefix_", prefix);
    state.get_or_declare(runtime::VECTOR_PRINT, runtime::vector_print_sig);

    let mut args = Vec::with_capacity(9);
    for pid in &coord.0 {
        args.push(Operand::Use(pid.clone()));
    }
    args.push(Operand::Global(prefix_global));
    args.push(Operand::Use(operand.clone()));
    args.push(Operand::ConstI32(elem_bits as i32));
    args.push(Operand::ConstI32(elem.is_int() as i32));
    args.push(Operand::ConstI32(signed as i32));
    args.push(Operand::ConstI32(hex as i32));

    Ok(CallInstr {
        callee: runtime::VECTOR_PRINT.to_string(),
        args,
    })
}

/// Assert: intern message, resolved file name, and function name, then
/// call the assertion symbol.
fn lower_assert(
    cond: &Value,
    message: &str,
    loc: &Loc,
    coord: &Coordinate,
    state: &mut ModuleLoweringState,
) -> Result<CallInstr, InvariantViolation> {
    let resolved = loc.resolve();

    let message_global = state.intern("assert_message_", message);
    let file_global = state.intern("assert_file_", &resolved.file);
    let func_global = state.intern("assert_func_", &resolved.func);
    state.get_or_declare(runtime::ASSERT, runtime::assert_sig);

    let mut args = Vec::with_capacity(8);
    for pid in &coord.0 {
        args.push(Operand::Use(pid.clone()));
    }
    args.push(Operand::Use(cond.clone()));
    args.push(Operand::Global(message_global));
    args.push(Operand::Global(file_global));
    args.push(Operand::ConstI32(resolved.line as i32));
    args.push(Operand::Global(func_global));

    Ok(CallInstr {
        callee: runtime::ASSERT.to_string(),
        args,
    })
}

// ─── Pass ─────────────────────────────────────────────────────────

/// The debug-lowering pass: one serial walk over every function body,
/// replacing each debug op with its runtime call (or removing it).
/// On failure the module is left partially lowered and must be discarded.
pub struct LowerDebugPass;

impl LowerDebugPass {
    pub fn run(module: &mut Module, ctx: &LaunchCtx) -> Result<(), PassError> {
        let mut state = ModuleLoweringState::new();
        let mut lowered = 0usize;

        for func in &mut module.funcs {
            // Coordinate lookup is lazy: a function without debug ops
            // never needs one.
            let mut coord: Option<&Coordinate> = None;

            let body = std::mem::take(&mut func.body);
            let mut out = Vec::with_capacity(body.len());
            for (index, instr) in body.into_iter().enumerate() {
                let op = match instr {
                    Instr::Debug(op) => op,
                    other => {
                        out.push(other);
                        continue;
                    }
                };

                let coord = match coord {
                    Some(c) => c,
                    None => {
                        let c = ctx.coordinate(&func.name).ok_or_else(|| {
                            PassError::MissingCoordinate {
                                func: func.name.clone(),
                            }
                        })?;
                        coord = Some(c);
                        c
                    }
                };

                tracing::debug!(func = %func.name, index, op = %op, "lowering debug op");
                match lower_debug_op(&op, coord, &mut state) {
                    Ok(Some(call)) => out.push(Instr::Call(call)),
                    Ok(None) => {}
                    Err(source) => {
                        return Err(PassError::Legalize {
                            func: func.name.clone(),
                            index,
                            op: op.to_string(),
                            source,
                        })
                    }
                }
                lowered += 1;
            }
            func.body = out;
        }

        state.finish(module);
        tracing::debug!(
            module = %module.name,
            lowered,
            decls = module.decls.len(),
            globals = module.globals.len(),
            "debug lowering complete"
        );
        Ok(())
    }
}
