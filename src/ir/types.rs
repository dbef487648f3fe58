//! Type definitions for the intermediate representation.
//!
//! Types are purely structural: two types are equal iff they are
//! recursively identical. There is no subtyping and no implicit widening,
//! so the derived `PartialEq` is the type equality used by the checker.

use std::fmt::Display;

/// The four fixed floating-point widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    Half,
    Float,
    Double,
    Fp128,
}

impl FloatKind {
    pub fn name(&self) -> &'static str {
        match self {
            FloatKind::Half => "half",
            FloatKind::Float => "float",
            FloatKind::Double => "double",
            FloatKind::Fp128 => "fp128",
        }
    }

    pub fn from_name(name: &str) -> Option<FloatKind> {
        match name {
            "half" => Some(FloatKind::Half),
            "float" => Some(FloatKind::Float),
            "double" => Some(FloatKind::Double),
            "fp128" => Some(FloatKind::Fp128),
            _ => None,
        }
    }
}

/// Primitive types: the only types a vector may hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PTy {
    Int(u32),
    Float(FloatKind),
    Ptr(Box<Ty>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Void,
    Prim(PTy),
    /// `<N x P>`
    Vector(u32, PTy),
    /// `[N x T]`
    Array(u32, Box<Ty>),
    /// `{T, T, ...}`, order significant
    Tuple(Vec<Ty>),
    /// `fun (T, ...) -> T`
    Fun(Vec<Ty>, Box<Ty>),
}

/// Largest integer width accepted anywhere (LLVM's limit).
pub const MAX_INT_WIDTH: u32 = 1 << 23;

/// Whether `value` fits in `width` bits under a signed or unsigned reading.
pub fn int_fits(value: i128, width: u32) -> bool {
    if width == 0 || width > MAX_INT_WIDTH {
        return false;
    }
    if width >= 128 {
        return true;
    }

    let min = -(1i128 << (width - 1));
    let max = if width == 127 { i128::MAX } else { (1i128 << width) - 1 };
    (min..=max).contains(&value)
}

impl Ty {
    pub fn int(width: u32) -> Ty {
        Ty::Prim(PTy::Int(width))
    }

    pub fn float(kind: FloatKind) -> Ty {
        Ty::Prim(PTy::Float(kind))
    }

    pub fn ptr(target: Ty) -> Ty {
        Ty::Prim(PTy::Ptr(Box::new(target)))
    }

    pub fn fun(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Fun(params, Box::new(ret))
    }

    /// Returns the bit width if this is an integer type.
    pub fn int_width(&self) -> Option<u32> {
        match self {
            Ty::Prim(PTy::Int(width)) => Some(*width),
            _ => None,
        }
    }

    /// Integer or floating-point primitive. Pointers and aggregates are not numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Prim(PTy::Int(_)) | Ty::Prim(PTy::Float(_)))
    }

    pub fn pointee(&self) -> Option<&Ty> {
        match self {
            Ty::Prim(PTy::Ptr(target)) => Some(target),
            _ => None,
        }
    }

    pub fn as_prim(&self) -> Option<&PTy> {
        match self {
            Ty::Prim(prim) => Some(prim),
            _ => None,
        }
    }

    pub fn as_fun(&self) -> Option<(&[Ty], &Ty)> {
        match self {
            Ty::Fun(params, ret) => Some((params, ret)),
            _ => None,
        }
    }
}

impl From<PTy> for Ty {
    fn from(prim: PTy) -> Self {
        Ty::Prim(prim)
    }
}

impl Display for PTy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PTy::Int(width) => write!(f, "i{}", width),
            PTy::Float(kind) => write!(f, "{}", kind.name()),
            PTy::Ptr(target) => write!(f, "&{}", target),
        }
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Void => write!(f, "void"),
            Ty::Prim(prim) => write!(f, "{}", prim),
            Ty::Vector(len, elem) => write!(f, "<{} x {}>", len, elem),
            Ty::Array(len, elem) => write!(f, "[{} x {}]", len, elem),
            Ty::Tuple(fields) => {
                write!(f, "{{")?;
                write_list(f, fields)?;
                write!(f, "}}")
            }
            Ty::Fun(params, ret) => {
                write!(f, "fun (")?;
                write_list(f, params)?;
                write!(f, ") -> {}", ret)
            }
        }
    }
}

pub(crate) fn write_list<T: Display>(f: &mut std::fmt::Formatter<'_>, items: &[T]) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
