//! Right-hand-side expressions of the three-address IR.
//!
//! Every value-producing computation is a single [`Expr`] over flat
//! [`Operand`]s; there are no nested expression trees. The variant set is a
//! closed sum, so passes classify side effects with one exhaustive match
//! instead of chained type tests.
//!
//! Side-effect classification is the load-bearing property here: an
//! elimination pass may only discard an expression whose evaluation is
//! invisible. Allocation can trigger class initialization, array and field
//! access can fault on a bad base or index, casts can fail, and integral
//! division can fault on a zero divisor. The classification lives on
//! [`crate::ir::Body`] (see [`crate::ir::Body::expr_may_throw`]) because it
//! needs the static types of the operands.

use strum::{EnumCount, EnumIter};

use crate::ir::{LocalId, TacType};

/// A constant embedded directly in an operand slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// 32-bit integer constant.
    I32(i32),
    /// 64-bit integer constant.
    I64(i64),
    /// 32-bit float constant.
    F32(f32),
    /// 64-bit float constant.
    F64(f64),
    /// String literal.
    Str(String),
    /// The `null` literal.
    Null,
}

impl ConstValue {
    /// Returns the static type of this constant.
    #[must_use]
    pub fn ty(&self) -> TacType {
        match self {
            Self::I32(_) => TacType::Int,
            Self::I64(_) => TacType::Long,
            Self::F32(_) => TacType::Float,
            Self::F64(_) => TacType::Double,
            Self::Str(_) => TacType::object("System.String"),
            Self::Null => TacType::Null,
        }
    }
}

/// A flat operand: either a local read or an embedded constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Reads the current value of a local.
    Local(LocalId),
    /// An immediate constant.
    Const(ConstValue),
}

impl Operand {
    /// Returns the local read by this operand, if it is one.
    #[must_use]
    pub const fn as_local(&self) -> Option<LocalId> {
        match self {
            Self::Local(id) => Some(*id),
            Self::Const(_) => None,
        }
    }
}

/// Reference to a field by owning type and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Fully qualified name of the declaring type.
    pub owner: String,
    /// Field name.
    pub name: String,
}

impl FieldRef {
    /// Creates a field reference.
    #[must_use]
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

/// Reference to a method by owning type and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    /// Fully qualified name of the declaring type.
    pub owner: String,
    /// Method name.
    pub name: String,
}

impl MethodRef {
    /// Creates a method reference.
    #[must_use]
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

/// A call, either as an assignment right-hand side or as a bare statement.
///
/// A `None` receiver denotes a static call.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeExpr {
    /// The callee.
    pub target: MethodRef,
    /// Receiver local for instance calls, `None` for static calls.
    pub receiver: Option<LocalId>,
    /// Argument operands in declaration order.
    pub args: Vec<Operand>,
}

impl InvokeExpr {
    /// Creates a static call.
    #[must_use]
    pub fn new_static(target: MethodRef, args: Vec<Operand>) -> Self {
        Self {
            target,
            receiver: None,
            args,
        }
    }

    /// Creates an instance call on `receiver`.
    #[must_use]
    pub fn new_instance(target: MethodRef, receiver: LocalId, args: Vec<Operand>) -> Self {
        Self {
            target,
            receiver: Some(receiver),
            args,
        }
    }

    /// Returns the locals this call reads: the receiver (if any) followed by
    /// the argument locals, in slot order.
    pub fn used_locals(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.receiver
            .into_iter()
            .chain(self.args.iter().filter_map(Operand::as_local))
    }
}

/// Unary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Bitwise complement.
    Not,
}

/// Binary operators.
///
/// `Div` and `Rem` are the interesting ones for side-effect classification;
/// everything else is pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division. Faults on a zero divisor for integral operands.
    Div,
    /// Remainder. Faults on a zero divisor for integral operands.
    Rem,
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    /// Bitwise xor.
    Xor,
    /// Shift left.
    Shl,
    /// Arithmetic shift right.
    Shr,
    /// Logical shift right.
    Ushr,
    /// Equality comparison.
    CmpEq,
    /// Inequality comparison.
    CmpNe,
    /// Less-than comparison.
    CmpLt,
    /// Less-or-equal comparison.
    CmpLe,
    /// Greater-than comparison.
    CmpGt,
    /// Greater-or-equal comparison.
    CmpGe,
}

/// A right-hand-side expression in three-address form.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A plain copy of an operand.
    Use(Operand),
    /// Unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Operand,
    },
    /// Binary operation.
    Binary {
        /// The operator.
        op: BinOp,
        /// Left operand.
        left: Operand,
        /// Right operand.
        right: Operand,
    },
    /// A call producing a value.
    Invoke(InvokeExpr),
    /// Reads an array element. Faults on a null base or bad index.
    ArrayLoad {
        /// The array local.
        base: LocalId,
        /// The element index.
        index: Operand,
    },
    /// Checked cast. Faults when the value is not of the target type.
    Cast {
        /// The target type.
        to: TacType,
        /// The value being cast.
        operand: Operand,
    },
    /// Allocates an object. Can trigger class initialization.
    NewObject {
        /// Fully qualified name of the allocated type.
        class: String,
    },
    /// Allocates a one-dimensional array. Faults on a negative length.
    NewArray {
        /// Element type.
        elem: TacType,
        /// Array length.
        length: Operand,
    },
    /// Allocates a multi-dimensional array. Faults on a negative dimension.
    NewMultiArray {
        /// Element type.
        elem: TacType,
        /// Length of each dimension, outermost first.
        dims: Vec<Operand>,
    },
    /// Reads a static field. Can trigger class initialization.
    StaticFieldLoad {
        /// The field.
        field: FieldRef,
    },
    /// Reads an instance field. Faults on a null base.
    InstanceFieldLoad {
        /// The object whose field is read.
        base: LocalId,
        /// The field.
        field: FieldRef,
    },
}

/// Plain discriminant of [`Expr`], without payloads.
///
/// Useful for tests and diagnostics that enumerate or label expression kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter)]
pub enum ExprKind {
    /// [`Expr::Use`]
    Use,
    /// [`Expr::Unary`]
    Unary,
    /// [`Expr::Binary`]
    Binary,
    /// [`Expr::Invoke`]
    Invoke,
    /// [`Expr::ArrayLoad`]
    ArrayLoad,
    /// [`Expr::Cast`]
    Cast,
    /// [`Expr::NewObject`]
    NewObject,
    /// [`Expr::NewArray`]
    NewArray,
    /// [`Expr::NewMultiArray`]
    NewMultiArray,
    /// [`Expr::StaticFieldLoad`]
    StaticFieldLoad,
    /// [`Expr::InstanceFieldLoad`]
    InstanceFieldLoad,
}

impl Expr {
    /// Returns the payload-free discriminant of this expression.
    #[must_use]
    pub const fn kind(&self) -> ExprKind {
        match self {
            Self::Use(_) => ExprKind::Use,
            Self::Unary { .. } => ExprKind::Unary,
            Self::Binary { .. } => ExprKind::Binary,
            Self::Invoke(_) => ExprKind::Invoke,
            Self::ArrayLoad { .. } => ExprKind::ArrayLoad,
            Self::Cast { .. } => ExprKind::Cast,
            Self::NewObject { .. } => ExprKind::NewObject,
            Self::NewArray { .. } => ExprKind::NewArray,
            Self::NewMultiArray { .. } => ExprKind::NewMultiArray,
            Self::StaticFieldLoad { .. } => ExprKind::StaticFieldLoad,
            Self::InstanceFieldLoad { .. } => ExprKind::InstanceFieldLoad,
        }
    }

    /// Returns `true` if this expression is a call.
    #[must_use]
    pub const fn is_invoke(&self) -> bool {
        matches!(self, Self::Invoke(_))
    }

    /// Appends the locals this expression reads to `out`, in slot order.
    pub fn collect_used_locals(&self, out: &mut Vec<LocalId>) {
        fn push_op(out: &mut Vec<LocalId>, op: &Operand) {
            if let Some(id) = op.as_local() {
                out.push(id);
            }
        }
        match self {
            Self::Use(op) | Self::Unary { operand: op, .. } | Self::Cast { operand: op, .. } => {
                push_op(out, op);
            }
            Self::Binary { left, right, .. } => {
                push_op(out, left);
                push_op(out, right);
            }
            Self::Invoke(inv) => out.extend(inv.used_locals()),
            Self::ArrayLoad { base, index } => {
                out.push(*base);
                push_op(out, index);
            }
            Self::NewArray { length, .. } => push_op(out, length),
            Self::NewMultiArray { dims, .. } => {
                for dim in dims {
                    push_op(out, dim);
                }
            }
            Self::InstanceFieldLoad { base, .. } => out.push(*base),
            Self::NewObject { .. } | Self::StaticFieldLoad { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_covers_every_variant() {
        // One representative expression per kind; kind() must round-trip.
        let samples: Vec<Expr> = vec![
            Expr::Use(Operand::Const(ConstValue::I32(1))),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Operand::Local(LocalId::new(0)),
            },
            Expr::Binary {
                op: BinOp::Add,
                left: Operand::Local(LocalId::new(0)),
                right: Operand::Const(ConstValue::I32(1)),
            },
            Expr::Invoke(InvokeExpr::new_static(
                MethodRef::new("System.Console", "WriteLine"),
                vec![],
            )),
            Expr::ArrayLoad {
                base: LocalId::new(0),
                index: Operand::Const(ConstValue::I32(0)),
            },
            Expr::Cast {
                to: TacType::object("System.String"),
                operand: Operand::Local(LocalId::new(0)),
            },
            Expr::NewObject {
                class: "System.Object".to_string(),
            },
            Expr::NewArray {
                elem: TacType::Int,
                length: Operand::Const(ConstValue::I32(4)),
            },
            Expr::NewMultiArray {
                elem: TacType::Int,
                dims: vec![Operand::Const(ConstValue::I32(2))],
            },
            Expr::StaticFieldLoad {
                field: FieldRef::new("System.Math", "PI"),
            },
            Expr::InstanceFieldLoad {
                base: LocalId::new(0),
                field: FieldRef::new("Widget", "count"),
            },
        ];

        let kinds: Vec<ExprKind> = samples.iter().map(Expr::kind).collect();
        for expected in ExprKind::iter() {
            assert!(kinds.contains(&expected), "no sample for {expected:?}");
        }
        assert_eq!(samples.len(), <ExprKind as strum::EnumCount>::COUNT);
    }

    #[test]
    fn test_used_locals_slot_order() {
        let inv = InvokeExpr::new_instance(
            MethodRef::new("Widget", "Resize"),
            LocalId::new(2),
            vec![
                Operand::Local(LocalId::new(5)),
                Operand::Const(ConstValue::I32(1)),
                Operand::Local(LocalId::new(3)),
            ],
        );
        let mut used = Vec::new();
        Expr::Invoke(inv).collect_used_locals(&mut used);
        assert_eq!(used, vec![LocalId::new(2), LocalId::new(5), LocalId::new(3)]);
    }

    #[test]
    fn test_array_load_used_locals() {
        // Base first, then the index local; constant indices contribute
        // nothing.
        let mut used = Vec::new();
        Expr::ArrayLoad {
            base: LocalId::new(2),
            index: Operand::Local(LocalId::new(7)),
        }
        .collect_used_locals(&mut used);
        assert_eq!(used, vec![LocalId::new(2), LocalId::new(7)]);

        used.clear();
        Expr::ArrayLoad {
            base: LocalId::new(2),
            index: Operand::Const(ConstValue::I32(0)),
        }
        .collect_used_locals(&mut used);
        assert_eq!(used, vec![LocalId::new(2)]);
    }

    #[test]
    fn test_const_types() {
        assert_eq!(ConstValue::I32(0).ty(), TacType::Int);
        assert_eq!(ConstValue::I64(0).ty(), TacType::Long);
        assert_eq!(ConstValue::F32(0.0).ty(), TacType::Float);
        assert_eq!(ConstValue::F64(0.0).ty(), TacType::Double);
        assert!(ConstValue::Null.ty().is_null());
    }

    #[test]
    fn test_allocation_reads_no_locals() {
        let mut used = Vec::new();
        Expr::NewObject {
            class: "System.Object".to_string(),
        }
        .collect_used_locals(&mut used);
        assert!(used.is_empty());

        Expr::StaticFieldLoad {
            field: FieldRef::new("System.Math", "PI"),
        }
        .collect_used_locals(&mut used);
        assert!(used.is_empty());
    }
}
