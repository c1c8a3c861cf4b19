//! Statements of the three-address IR.
//!
//! A method body is an ordered sequence of [`Stmt`]s. Branch targets and trap
//! boundaries are statement indices into that sequence, so structural edits
//! go through [`crate::ir::Body`], which keeps indices consistent.
//!
//! Each statement knows which local it defines and which locals it reads;
//! the dataflow analyses are built entirely from those two views.

use crate::ir::{Expr, FieldRef, InvokeExpr, LocalId, Operand};

/// Debug metadata attached to a statement.
///
/// Rewrites that replace a statement (for example demoting an assignment to a
/// bare call) must carry this forward so source mapping survives the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceInfo {
    /// Source line, if known.
    pub line: Option<u32>,
    /// Offset of the originating instruction in the bytecode stream.
    pub offset: Option<u32>,
}

impl SourceInfo {
    /// Creates source info with a line number.
    #[must_use]
    pub const fn at_line(line: u32) -> Self {
        Self {
            line: Some(line),
            offset: None,
        }
    }
}

/// The target of an assignment.
///
/// Only [`Place::Local`] writes storage private to the body; the other places
/// are observable effects (heap or array writes) and make their statement
/// ineligible for elimination.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    /// Writes a local.
    Local(LocalId),
    /// Writes an array element. Faults on a null base or bad index.
    ArrayElement {
        /// The array local.
        base: LocalId,
        /// The element index.
        index: Operand,
    },
    /// Writes a static field. Can trigger class initialization.
    StaticField(FieldRef),
    /// Writes an instance field. Faults on a null base.
    InstanceField {
        /// The object whose field is written.
        base: LocalId,
        /// The field.
        field: FieldRef,
    },
}

impl Place {
    /// Returns the written local, if this place is one.
    #[must_use]
    pub const fn as_local(&self) -> Option<LocalId> {
        match self {
            Self::Local(id) => Some(*id),
            _ => None,
        }
    }
}

/// The value bound by an identity statement.
///
/// Identity statements sit at the head of a body (and at handler entries) and
/// bind method inputs to locals, giving every local a defining statement the
/// dataflow analyses can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityValue {
    /// The implicit receiver of an instance method.
    This,
    /// The parameter at the given position.
    Parameter(u16),
    /// The exception object at a handler entry.
    CaughtException,
}

/// A single IR statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Binds a method input to a local.
    Identity {
        /// The bound local.
        local: LocalId,
        /// What is bound.
        value: IdentityValue,
    },
    /// Evaluates an expression and stores the result into a place.
    Assign {
        /// The target.
        place: Place,
        /// The right-hand side.
        value: Expr,
    },
    /// Evaluates a call for its effects, discarding any result.
    Invoke(InvokeExpr),
    /// Does nothing; a padding marker left behind by upstream lowering.
    Nop,
    /// Unconditional jump to a statement index.
    Goto {
        /// Target statement index.
        target: usize,
    },
    /// Conditional jump; falls through when the condition is false.
    If {
        /// The branch condition.
        cond: Expr,
        /// Target statement index when the condition holds.
        target: usize,
    },
    /// Multi-way jump on an integer key.
    Switch {
        /// The scrutinee.
        key: Operand,
        /// `(case value, target index)` pairs.
        cases: Vec<(i32, usize)>,
        /// Target index when no case matches.
        default: usize,
    },
    /// Returns from the method, optionally with a value.
    Return(Option<Operand>),
    /// Throws the referenced exception object.
    Throw(Operand),
    /// Acquires the monitor of an object.
    EnterMonitor(LocalId),
    /// Releases the monitor of an object.
    ExitMonitor(LocalId),
}

/// A statement paired with its debug metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    kind: StmtKind,
    source: SourceInfo,
}

impl Stmt {
    /// Creates a statement without source information.
    #[must_use]
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            source: SourceInfo::default(),
        }
    }

    /// Creates a statement with source information.
    #[must_use]
    pub const fn with_source(kind: StmtKind, source: SourceInfo) -> Self {
        Self { kind, source }
    }

    /// Returns the statement kind.
    #[must_use]
    pub const fn kind(&self) -> &StmtKind {
        &self.kind
    }

    /// Returns the attached source information.
    #[must_use]
    pub const fn source(&self) -> SourceInfo {
        self.source
    }

    /// Returns the local this statement defines, if any.
    ///
    /// Only local-targeted assignments and identity bindings define a local;
    /// heap and array stores define nothing the dataflow layer tracks.
    #[must_use]
    pub const fn defined_local(&self) -> Option<LocalId> {
        match &self.kind {
            StmtKind::Identity { local, .. } => Some(*local),
            StmtKind::Assign { place, .. } => place.as_local(),
            _ => None,
        }
    }

    /// Returns the locals this statement reads, in slot order.
    #[must_use]
    pub fn used_locals(&self) -> Vec<LocalId> {
        let mut used = Vec::new();
        let mut push_op = |op: &Operand| {
            if let Some(id) = op.as_local() {
                used.push(id);
            }
        };
        match &self.kind {
            StmtKind::Assign { place, value } => {
                match place {
                    Place::ArrayElement { base, index } => {
                        used.push(*base);
                        if let Some(id) = index.as_local() {
                            used.push(id);
                        }
                    }
                    Place::InstanceField { base, .. } => used.push(*base),
                    Place::Local(_) | Place::StaticField(_) => {}
                }
                value.collect_used_locals(&mut used);
            }
            StmtKind::Invoke(inv) => used.extend(inv.used_locals()),
            StmtKind::If { cond, .. } => cond.collect_used_locals(&mut used),
            StmtKind::Switch { key, .. } => push_op(key),
            StmtKind::Return(Some(op)) | StmtKind::Throw(op) => push_op(op),
            StmtKind::EnterMonitor(id) | StmtKind::ExitMonitor(id) => used.push(*id),
            StmtKind::Identity { .. }
            | StmtKind::Nop
            | StmtKind::Goto { .. }
            | StmtKind::Return(None) => {}
        }
        used
    }

    /// Returns `true` if control can fall through to the next statement.
    #[must_use]
    pub const fn falls_through(&self) -> bool {
        !matches!(
            self.kind,
            StmtKind::Goto { .. }
                | StmtKind::Switch { .. }
                | StmtKind::Return(_)
                | StmtKind::Throw(_)
        )
    }
}
