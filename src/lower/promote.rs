//! Variadic-argument promotion.
//!
//! Must match C's default argument promotions exactly: the scalar print
//! entry point is an ordinary variadic text-formatting routine, so the
//! runtime reads every integer slot as at least 32 bits and every float
//! slot as f64.

use crate::ir::{ExtKind, Operand, Type, Value};

/// Return an operand safe to pass through the variadic call interface.
///
/// Integers (and index values) narrower than 32 bits widen to i32 —
/// zero-extended when unsigned, sign-extended otherwise. Floats narrower
/// than 64 bits extend to f64. Everything else passes through unchanged.
/// The IR's integers are signless; `signed` comes from the debug op.
pub fn promote(value: &Value, signed: bool) -> Operand {
    match &value.ty {
        Type::Int(bits) if *bits < 32 => {
            let kind = if signed { ExtKind::Sext } else { ExtKind::Zext };
            Operand::Ext(kind, value.clone())
        }
        Type::F16 | Type::BF16 | Type::F32 => Operand::Ext(ExtKind::Fpext, value.clone()),
        _ => Operand::Use(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::format::format_token;

    fn val(ty: Type) -> Value {
        Value::new("v", ty)
    }

    #[test]
    fn test_narrow_ints_widen_to_i32() {
        for bits in [1, 8, 16] {
            let v = val(Type::Int(bits));
            assert_eq!(promote(&v, true), Operand::Ext(ExtKind::Sext, v.clone()));
            assert_eq!(promote(&v, false), Operand::Ext(ExtKind::Zext, v.clone()));
            assert_eq!(promote(&v, true).ty(), Type::Int(32));
        }
    }

    #[test]
    fn test_narrow_floats_extend_to_f64() {
        for ty in [Type::F16, Type::BF16, Type::F32] {
            let v = val(ty);
            let p = promote(&v, false);
            assert_eq!(p, Operand::Ext(ExtKind::Fpext, v));
            assert_eq!(p.ty(), Type::F64);
        }
    }

    #[test]
    fn test_wide_values_pass_through() {
        for ty in [Type::Int(32), Type::Int(64), Type::F64, Type::Ptr, Type::Index] {
            let v = val(ty.clone());
            assert_eq!(promote(&v, true), Operand::Use(v));
        }
    }

    #[test]
    fn test_promotion_matches_post_promotion_token() {
        // An i8 signed value promotes to i32 and formats as %i, never %hhi.
        for bits in [1, 8, 16] {
            let v = val(Type::Int(bits));
            let promoted_ty = promote(&v, true).ty();
            assert_eq!(format_token(&promoted_ty, false, None, true).unwrap(), "%i");
            let promoted_ty = promote(&v, false).ty();
            assert_eq!(format_token(&promoted_ty, false, None, false).unwrap(), "%u");
        }
        // Narrow floats promote to f64, which still formats as %f.
        for ty in [Type::F16, Type::BF16, Type::F32] {
            let promoted_ty = promote(&val(ty), false).ty();
            assert_eq!(format_token(&promoted_ty, false, None, false).unwrap(), "%f");
        }
    }
}
