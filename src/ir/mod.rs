//! Target-level IR for the CPU backend.
//!
//! A deliberately small slice of the backend's low-level representation:
//! just enough structure for the debug-instrumentation lowering to operate
//! on. A `Module` holds runtime declarations (always at the top), interned
//! global byte constants, and functions whose bodies mix not-yet-lowered
//! debug ops with emitted runtime calls.

pub mod debug;

use std::fmt;

// ─── Types ────────────────────────────────────────────────────────

/// Scalar and aggregate types at the CPU-backend level.
///
/// Integers are signless (signedness travels on the debug op, not the
/// type). `Buf` is the rank-1 unranked-buffer ceiling: its low-level
/// representation is the `{i64, ptr}` length/data record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Integer with an explicit bit width (i1, i8, i16, i32, i64).
    Int(u32),
    /// IEEE 754 half precision.
    F16,
    /// bfloat16.
    BF16,
    F32,
    F64,
    /// Opaque pointer.
    Ptr,
    /// Target-width index (64-bit on this backend).
    Index,
    /// Record passed by value, e.g. the `{i64, ptr}` buffer descriptor.
    Struct(Vec<Type>),
    /// Unranked buffer of elements. Rank-1 only; higher ranks are not
    /// decomposed to this form upstream.
    Buf(Box<Type>),
}

impl Type {
    /// Bit width of an integer or floating-point type; `None` otherwise.
    /// `index` deliberately has no width here: it never legitimately
    /// reaches a format site.
    pub fn int_or_float_bits(&self) -> Option<u32> {
        match self {
            Type::Int(bits) => Some(*bits),
            Type::F16 | Type::BF16 => Some(16),
            Type::F32 => Some(32),
            Type::F64 => Some(64),
            _ => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::F16 | Type::BF16 | Type::F32 | Type::F64)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int(_))
    }

    /// True for values the scalar print path can handle directly.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Type::Int(_)
                | Type::F16
                | Type::BF16
                | Type::F32
                | Type::F64
                | Type::Ptr
                | Type::Index
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int(bits) => write!(f, "i{}", bits),
            Type::F16 => write!(f, "f16"),
            Type::BF16 => write!(f, "bf16"),
            Type::F32 => write!(f, "f32"),
            Type::F64 => write!(f, "f64"),
            Type::Ptr => write!(f, "ptr"),
            Type::Index => write!(f, "index"),
            Type::Struct(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, "}}")
            }
            Type::Buf(elem) => write!(f, "buf<{}>", elem),
        }
    }
}

// ─── Values & operands ────────────────────────────────────────────

/// A named SSA value with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub name: String,
    pub ty: Type,
}

impl Value {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.name)
    }
}

/// Widening casts the promotion engine may fold into a call operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtKind {
    /// Sign-extend to i32.
    Sext,
    /// Zero-extend to i32.
    Zext,
    /// Extend to f64.
    Fpext,
}

impl ExtKind {
    /// The type the cast widens to.
    pub fn target(&self) -> Type {
        match self {
            ExtKind::Sext | ExtKind::Zext => Type::Int(32),
            ExtKind::Fpext => Type::F64,
        }
    }
}

impl fmt::Display for ExtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtKind::Sext => write!(f, "sext"),
            ExtKind::Zext => write!(f, "zext"),
            ExtKind::Fpext => write!(f, "fpext"),
        }
    }
}

/// A call argument: a value use, an immediate, the address of a global
/// constant, or a value with a widening cast folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Use(Value),
    ConstI32(i32),
    /// Address of a module-level global constant, by name.
    Global(String),
    Ext(ExtKind, Value),
}

impl Operand {
    /// The type this operand carries into the call.
    pub fn ty(&self) -> Type {
        match self {
            Operand::Use(v) => v.ty.clone(),
            Operand::ConstI32(_) => Type::Int(32),
            Operand::Global(_) => Type::Ptr,
            Operand::Ext(kind, _) => kind.target(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Use(v) => write!(f, "{} : {}", v, v.ty),
            Operand::ConstI32(n) => write!(f, "{} : i32", n),
            Operand::Global(name) => write!(f, "@{}", name),
            Operand::Ext(kind, v) => {
                write!(f, "{} {} : {} to {}", kind, v, v.ty, kind.target())
            }
        }
    }
}

// ─── Instructions ─────────────────────────────────────────────────

/// A call to a declared runtime symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInstr {
    pub callee: String,
    pub args: Vec<Operand>,
}

impl fmt::Display for CallInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call @{}(", self.callee)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

/// A function-body instruction. `Debug` before lowering, `Call` after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Debug(debug::DebugOp),
    Call(CallInstr),
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Debug(op) => write!(f, "{}", op),
            Instr::Call(call) => write!(f, "{}", call),
        }
    }
}

// ─── Module-level entities ────────────────────────────────────────

/// Signature of a runtime entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Type>,
    /// `None` for void.
    pub ret: Option<Type>,
    pub variadic: bool,
}

/// Declaration of a runtime symbol. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDecl {
    pub name: String,
    pub sig: Signature,
}

impl fmt::Display for RuntimeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sig.ret {
            Some(ty) => write!(f, "declare {} @{}(", ty, self.name)?,
            None => write!(f, "declare void @{}(", self.name)?,
        }
        for (i, param) in self.sig.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        if self.sig.variadic {
            if !self.sig.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        write!(f, ")")
    }
}

/// An immutable, null-terminated module-level byte constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStr {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Display for GlobalStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} = c\"", self.name)?;
        for &b in &self.bytes {
            if (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\{:02X}", b)?;
            }
        }
        write!(f, "\"")
    }
}

/// A function with its (single-block) body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub body: Vec<Instr>,
}

impl Function {
    pub fn new(name: impl Into<String>, body: Vec<Instr>) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

/// A module: runtime declarations first, then globals, then functions.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub name: String,
    pub decls: Vec<RuntimeDecl>,
    pub globals: Vec<GlobalStr>,
    pub funcs: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Deterministic textual rendering. Declarations precede all uses;
    /// this is the text diagnostics and snapshot tests run against.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("; module {}\n", self.name));
        for decl in &self.decls {
            out.push_str(&format!("{}\n", decl));
        }
        for global in &self.globals {
            out.push_str(&format!("{}\n", global));
        }
        for func in &self.funcs {
            out.push('\n');
            out.push_str(&format!("fn @{} {{\n", func.name));
            for instr in &func.body {
                out.push_str(&format!("  {}\n", instr));
            }
            out.push_str("}\n");
        }
        out
    }
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(format!("{}", Type::Int(32)), "i32");
        assert_eq!(format!("{}", Type::Int(1)), "i1");
        assert_eq!(format!("{}", Type::BF16), "bf16");
        assert_eq!(format!("{}", Type::Ptr), "ptr");
        assert_eq!(
            format!("{}", Type::Struct(vec![Type::Int(64), Type::Ptr])),
            "{i64, ptr}"
        );
        assert_eq!(format!("{}", Type::Buf(Box::new(Type::F32))), "buf<f32>");
    }

    #[test]
    fn test_bit_widths() {
        assert_eq!(Type::Int(8).int_or_float_bits(), Some(8));
        assert_eq!(Type::F16.int_or_float_bits(), Some(16));
        assert_eq!(Type::BF16.int_or_float_bits(), Some(16));
        assert_eq!(Type::F64.int_or_float_bits(), Some(64));
        assert_eq!(Type::Ptr.int_or_float_bits(), None);
        assert_eq!(Type::Index.int_or_float_bits(), None);
    }

    #[test]
    fn test_scalar_predicate() {
        assert!(Type::Int(16).is_scalar());
        assert!(Type::Index.is_scalar());
        assert!(Type::Ptr.is_scalar());
        assert!(!Type::Buf(Box::new(Type::Int(32))).is_scalar());
        assert!(!Type::Struct(vec![Type::Int(64), Type::Ptr]).is_scalar());
    }

    #[test]
    fn test_operand_display() {
        let v = Value::new("x", Type::Int(8));
        assert_eq!(format!("{}", Operand::Use(v.clone())), "%x : i8");
        assert_eq!(format!("{}", Operand::ConstI32(7)), "7 : i32");
        assert_eq!(format!("{}", Operand::Global("fmt_0".into())), "@fmt_0");
        assert_eq!(
            format!("{}", Operand::Ext(ExtKind::Sext, v)),
            "sext %x : i8 to i32"
        );
    }

    #[test]
    fn test_operand_types() {
        let v = Value::new("x", Type::Int(8));
        assert_eq!(Operand::Use(v.clone()).ty(), Type::Int(8));
        assert_eq!(Operand::ConstI32(0).ty(), Type::Int(32));
        assert_eq!(Operand::Global("g".into()).ty(), Type::Ptr);
        assert_eq!(Operand::Ext(ExtKind::Zext, v.clone()).ty(), Type::Int(32));
        let f = Value::new("f", Type::F16);
        assert_eq!(Operand::Ext(ExtKind::Fpext, f).ty(), Type::F64);
    }

    #[test]
    fn test_decl_display() {
        let printf = RuntimeDecl {
            name: "printf".into(),
            sig: Signature {
                params: vec![Type::Ptr],
                ret: Some(Type::Int(32)),
                variadic: true,
            },
        };
        assert_eq!(format!("{}", printf), "declare i32 @printf(ptr, ...)");

        let void_fn = RuntimeDecl {
            name: "halt".into(),
            sig: Signature {
                params: vec![],
                ret: None,
                variadic: false,
            },
        };
        assert_eq!(format!("{}", void_fn), "declare void @halt()");
    }

    #[test]
    fn test_global_escaping() {
        let g = GlobalStr {
            name: "fmt_0".into(),
            bytes: b"(%u)x\n\0".to_vec(),
        };
        assert_eq!(format!("{}", g), "@fmt_0 = c\"(%u)x\\0A\\00\"");

        let quoted = GlobalStr {
            name: "g".into(),
            bytes: b"a\"b\\c\0".to_vec(),
        };
        assert_eq!(format!("{}", quoted), "@g = c\"a\\22b\\5Cc\\00\"");
    }

    #[test]
    fn test_call_display() {
        let call = CallInstr {
            callee: "printf".into(),
            args: vec![
                Operand::Global("fmt_0".into()),
                Operand::Use(Value::new("pid0", Type::Int(32))),
            ],
        };
        assert_eq!(format!("{}", call), "call @printf(@fmt_0, %pid0 : i32)");
    }

    #[test]
    fn test_module_dump_shape() {
        let mut module = Module::new("m");
        module.decls.push(RuntimeDecl {
            name: "printf".into(),
            sig: Signature {
                params: vec![Type::Ptr],
                ret: Some(Type::Int(32)),
                variadic: true,
            },
        });
        module.globals.push(GlobalStr {
            name: "fmt_0".into(),
            bytes: b"hi\0".to_vec(),
        });
        module.funcs.push(Function::new(
            "kernel",
            vec![Instr::Call(CallInstr {
                callee: "printf".into(),
                args: vec![Operand::Global("fmt_0".into())],
            })],
        ));

        let dump = module.dump();
        assert_eq!(
            dump,
            "; module m\n\
             declare i32 @printf(ptr, ...)\n\
             @fmt_0 = c\"hi\\00\"\n\
             \n\
             fn @kernel {\n\
             \x20 call @printf(@fmt_0)\n\
             }\n"
        );
    }
}
