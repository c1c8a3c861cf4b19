//! Local variables and their static types.
//!
//! The IR addresses locals through lightweight [`LocalId`] handles into the
//! body's local table. The handle encodes no semantic information; the name,
//! declared type and origin live in [`Local`].
//!
//! # Variable Origins
//!
//! Locals come from two places:
//!
//! 1. **Source** - variables declared in the original program
//! 2. **Temporary** - compiler-generated temporaries introduced while
//!    flattening stack-based bytecode into three-address form
//!
//! The distinction matters to optimization passes that run in a restricted
//! mode where only compiler-introduced storage may be touched.

use std::fmt;

/// Unique identifier for a local within one method body.
///
/// A plain index into the body's local table, providing O(1) access to the
/// local's metadata. Identifiers are unique within a single body but not
/// across bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(usize);

impl LocalId {
    /// Creates a local identifier from a raw table index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw table index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// Where a local came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalOrigin {
    /// Declared in the original source program.
    Source,
    /// Introduced by the IR builder while lowering to three-address form.
    Temporary,
}

/// The static type of a local or constant in the IR.
///
/// This is the numeric and reference model of a managed runtime: the integral
/// types wrap or fault, the floating types follow IEEE 754 (a zero divisor
/// produces an infinity or NaN, never a fault), and `Null` is the type of the
/// bare `null` literal before it is merged into a reference type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TacType {
    /// Boolean, stored as a small integer.
    Bool,
    /// Unsigned 8-bit integer.
    Byte,
    /// 16-bit character.
    Char,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit IEEE 754 floating point.
    Float,
    /// 64-bit IEEE 754 floating point.
    Double,
    /// Object reference, carrying the fully qualified type name.
    Object(String),
    /// Array with the given element type.
    Array(Box<TacType>),
    /// The type of the `null` literal.
    Null,
}

impl TacType {
    /// Creates an object reference type from a fully qualified name.
    #[must_use]
    pub fn object(name: &str) -> Self {
        Self::Object(name.to_string())
    }

    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array(elem: TacType) -> Self {
        Self::Array(Box::new(elem))
    }

    /// Returns `true` for the integral numeric types.
    ///
    /// Division and remainder on these types can fault at runtime on a zero
    /// divisor; on the floating types they cannot.
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Byte | Self::Char | Self::Short | Self::Int | Self::Long
        )
    }

    /// Returns `true` for the IEEE 754 floating types.
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Returns `true` if this is the null-literal type.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A local variable slot in a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    /// Name, for diagnostics and display.
    name: String,
    /// Declared static type.
    ty: TacType,
    /// Whether the local is source-declared or compiler-generated.
    origin: LocalOrigin,
}

impl Local {
    /// Creates a new local.
    #[must_use]
    pub fn new(name: &str, ty: TacType, origin: LocalOrigin) -> Self {
        Self {
            name: name.to_string(),
            ty,
            origin,
        }
    }

    /// Returns the local's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the local's declared type.
    #[must_use]
    pub const fn ty(&self) -> &TacType {
        &self.ty
    }

    /// Returns the local's origin.
    #[must_use]
    pub const fn origin(&self) -> LocalOrigin {
        self.origin
    }

    /// Returns `true` if this local is a compiler-generated temporary.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.origin == LocalOrigin::Temporary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_id_display() {
        assert_eq!(LocalId::new(3).to_string(), "l3");
        assert_eq!(LocalId::new(3).index(), 3);
    }

    #[test]
    fn test_integral_types() {
        for ty in [
            TacType::Bool,
            TacType::Byte,
            TacType::Char,
            TacType::Short,
            TacType::Int,
            TacType::Long,
        ] {
            assert!(ty.is_integral(), "{ty:?} should be integral");
            assert!(!ty.is_floating());
        }
    }

    #[test]
    fn test_floating_types() {
        assert!(TacType::Float.is_floating());
        assert!(TacType::Double.is_floating());
        assert!(!TacType::Float.is_integral());
    }

    #[test]
    fn test_reference_types() {
        let obj = TacType::object("System.String");
        assert!(!obj.is_integral());
        assert!(!obj.is_floating());
        assert!(TacType::Null.is_null());
        assert!(!obj.is_null());

        let arr = TacType::array(TacType::Int);
        assert_eq!(arr, TacType::Array(Box::new(TacType::Int)));
    }

    #[test]
    fn test_local_origin() {
        let tmp = Local::new("$t0", TacType::Int, LocalOrigin::Temporary);
        let src = Local::new("count", TacType::Int, LocalOrigin::Source);
        assert!(tmp.is_temporary());
        assert!(!src.is_temporary());
    }
}
