//! The fixed runtime ABI this lowering targets.
//!
//! Three entry points, stable contract with the CPU runtime library.
//! Signatures live here in one place so every call site and declaration
//! agrees by construction.

use crate::ir::{Signature, Type};

/// Variadic scalar print: `printf(format: ptr, ...) -> i32`.
pub const SCALAR_PRINT: &str = "printf";

/// Fixed-arity vector print:
/// `riptide_vector_print(pid0, pid1, pid2: i32, label: ptr,
///  data: {i64, ptr}, elem_bits: i32, is_int: i32, is_signed: i32,
///  is_hex: i32) -> i32`.
pub const VECTOR_PRINT: &str = "riptide_vector_print";

/// Fixed-arity assertion:
/// `riptide_assert(pid0, pid1, pid2: i32, cond: i1, message: ptr,
///  file: ptr, line: i32, func: ptr) -> void`.
pub const ASSERT: &str = "riptide_assert";

pub fn scalar_print_sig() -> Signature {
    Signature {
        params: vec![Type::Ptr],
        ret: Some(Type::Int(32)),
        variadic: true,
    }
}

pub fn vector_print_sig() -> Signature {
    Signature {
        params: vec![
            Type::Int(32),
            Type::Int(32),
            Type::Int(32),
            Type::Ptr,
            // Rank-1 buffer descriptor: element count and data pointer.
            Type::Struct(vec![Type::Int(64), Type::Ptr]),
            Type::Int(32),
            Type::Int(32),
            Type::Int(32),
            Type::Int(32),
        ],
        ret: Some(Type::Int(32)),
        variadic: false,
    }
}

pub fn assert_sig() -> Signature {
    Signature {
        params: vec![
            Type::Int(32),
            Type::Int(32),
            Type::Int(32),
            Type::Int(1),
            Type::Ptr,
            Type::Ptr,
            Type::Int(32),
            Type::Ptr,
        ],
        ret: None,
        variadic: false,
    }
}
