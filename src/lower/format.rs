//! Format descriptor synthesis: semantic type + flags → printf token.

use super::error::InvariantViolation;
use crate::ir::Type;

/// Produce the printf token for one value of type `ty`.
///
/// Priority order: pointers are always `%p` (all flags ignored); hex mode
/// pads to one digit per 4 bits and ignores `width`; otherwise the token
/// is `%[width]` followed by `f` for any float width, `lli`/`llu` for
/// 64-bit integers, `i`/`u` below. Any other type is an upstream bug.
pub fn format_token(
    ty: &Type,
    hex: bool,
    width: Option<u32>,
    signed: bool,
) -> Result<String, InvariantViolation> {
    if *ty == Type::Ptr {
        return Ok("%p".to_string());
    }

    if hex {
        let bits = ty.int_or_float_bits().ok_or_else(|| {
            InvariantViolation::new(format!("unsupported type for formatting: {}", ty))
        })?;
        // One hex digit per 4 bits: 4 for f16, 8 for i32, 16 for i64.
        let digits = bits / 4;
        return Ok(if bits > 32 {
            format!("0x%0{}llx", digits)
        } else {
            format!("0x%0{}x", digits)
        });
    }

    let mut token = String::from("%");
    if let Some(w) = width {
        token.push_str(&w.to_string());
    }

    if ty.is_float() {
        // Precision is handled by promotion to f64; every float width
        // shares the same token.
        token.push('f');
        Ok(token)
    } else if let Type::Int(bits) = ty {
        if *bits == 64 {
            token.push_str(if signed { "lli" } else { "llu" });
        } else {
            token.push_str(if signed { "i" } else { "u" });
        }
        Ok(token)
    } else {
        Err(InvariantViolation::new(format!(
            "unsupported type for formatting: {}",
            ty
        )))
    }
}
