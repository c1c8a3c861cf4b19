//! The method body: an ordered, editable statement sequence.
//!
//! [`Body`] owns the local table, the statement sequence, the trap (exception
//! handler) table and the method-level context the passes need: whether the
//! method is static and which local binds the implicit receiver.
//!
//! Structural edits are mask-based: a pass computes which statements survive
//! and commits the whole decision at once with [`Body::retain_by_mask`],
//! which rebuilds the sequence and remaps branch targets and trap ranges.
//! This avoids the iterator-invalidation hazards of removing statements one
//! by one from a live sequence.

use crate::{
    ir::{BinOp, Expr, Local, LocalId, LocalOrigin, Place, Stmt, StmtKind, TacType},
    utils::BitSet,
};

/// A protected statement range and its handler.
///
/// The range is half-open: statements with indices in `start..end` are
/// covered. When one of them faults, control transfers to `handler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trap {
    /// First covered statement index.
    pub start: usize,
    /// One past the last covered statement index.
    pub end: usize,
    /// Statement index of the handler entry.
    pub handler: usize,
}

/// One method body in three-address form.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Method name, for diagnostics.
    name: String,
    /// The local table.
    locals: Vec<Local>,
    /// The ordered statement sequence.
    stmts: Vec<Stmt>,
    /// Protected ranges.
    traps: Vec<Trap>,
    /// Whether the method has no implicit receiver.
    is_static: bool,
    /// The local binding the implicit receiver, for instance methods.
    this_local: Option<LocalId>,
}

impl Body {
    /// Creates an empty static method body.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            locals: Vec::new(),
            stmts: Vec::new(),
            traps: Vec::new(),
            is_static: true,
            this_local: None,
        }
    }

    /// Marks this body as an instance method with `receiver` binding `this`.
    pub fn set_receiver(&mut self, receiver: LocalId) {
        self.is_static = false;
        self.this_local = Some(receiver);
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the method has no implicit receiver.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// Returns the receiver local of an instance method.
    #[must_use]
    pub const fn this_local(&self) -> Option<LocalId> {
        self.this_local
    }

    /// Adds a local and returns its handle.
    pub fn add_local(&mut self, name: &str, ty: TacType, origin: LocalOrigin) -> LocalId {
        let id = LocalId::new(self.locals.len());
        self.locals.push(Local::new(name, ty, origin));
        id
    }

    /// Returns the local for a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this body.
    #[must_use]
    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id.index()]
    }

    /// Returns the local table.
    #[must_use]
    pub fn locals(&self) -> &[Local] {
        &self.locals
    }

    /// Appends a statement and returns its index.
    pub fn push(&mut self, stmt: Stmt) -> usize {
        self.stmts.push(stmt);
        self.stmts.len() - 1
    }

    /// Appends a statement built from a bare kind.
    pub fn push_kind(&mut self, kind: StmtKind) -> usize {
        self.push(Stmt::new(kind))
    }

    /// Returns the statement at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn stmt(&self, index: usize) -> &Stmt {
        &self.stmts[index]
    }

    /// Returns the statement sequence.
    #[must_use]
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Returns the number of statements.
    #[must_use]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// Registers a protected range.
    pub fn add_trap(&mut self, start: usize, end: usize, handler: usize) {
        self.traps.push(Trap {
            start,
            end,
            handler,
        });
    }

    /// Returns the trap table.
    #[must_use]
    pub fn traps(&self) -> &[Trap] {
        &self.traps
    }

    /// Returns the static type of an operand under this body's local table.
    #[must_use]
    pub fn operand_type(&self, op: &crate::ir::Operand) -> TacType {
        match op {
            crate::ir::Operand::Local(id) => self.local(*id).ty().clone(),
            crate::ir::Operand::Const(c) => c.ty(),
        }
    }

    /// Returns `true` if evaluating `expr` can transfer control exceptionally.
    #[must_use]
    pub fn expr_may_throw(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Invoke(_)
            | Expr::ArrayLoad { .. }
            | Expr::Cast { .. }
            | Expr::NewObject { .. }
            | Expr::NewArray { .. }
            | Expr::NewMultiArray { .. }
            | Expr::StaticFieldLoad { .. }
            | Expr::InstanceFieldLoad { .. } => true,
            Expr::Binary {
                op: BinOp::Div | BinOp::Rem,
                left,
                right,
            } => {
                // Zero divisors fault only for integral operands; floating
                // division produces infinities or NaN.
                self.operand_type(left).is_integral() || self.operand_type(right).is_integral()
            }
            Expr::Use(_) | Expr::Unary { .. } | Expr::Binary { .. } => false,
        }
    }

    /// Returns `true` if executing `stmt` can transfer control exceptionally.
    #[must_use]
    pub fn stmt_may_throw(&self, stmt: &Stmt) -> bool {
        match stmt.kind() {
            StmtKind::Assign { place, value } => match place {
                Place::Local(_) => self.expr_may_throw(value),
                // Heap and array stores can fault regardless of the RHS.
                Place::ArrayElement { .. } | Place::StaticField(_) | Place::InstanceField { .. } => {
                    true
                }
            },
            StmtKind::Invoke(_)
            | StmtKind::Throw(_)
            | StmtKind::EnterMonitor(_)
            | StmtKind::ExitMonitor(_) => true,
            StmtKind::Identity { .. }
            | StmtKind::Nop
            | StmtKind::Goto { .. }
            | StmtKind::If { .. }
            | StmtKind::Switch { .. }
            | StmtKind::Return(_) => false,
        }
    }

    /// Replaces the kind of the statement at `index`, keeping its source
    /// information.
    ///
    /// This is the narrowing edit used by demotion: the replacement evaluates
    /// a subset of the original statement's effects at the same program point.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_kind(&mut self, index: usize, kind: StmtKind) {
        let source = self.stmts[index].source();
        self.stmts[index] = Stmt::with_source(kind, source);
    }

    /// Keeps exactly the statements whose bit is set in `keep`, preserving
    /// their original relative order, and remaps branch targets and trap
    /// ranges to the new indices.
    ///
    /// A target that pointed at a dropped statement is redirected to the next
    /// surviving statement. Dropped statements always fall through, so this
    /// preserves where control ends up. Traps whose covered range becomes
    /// empty are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `keep.len()` differs from the statement count.
    pub fn retain_by_mask(&mut self, keep: &BitSet) {
        let n = self.stmts.len();
        assert_eq!(keep.len(), n, "mask must cover the statement sequence");
        let new_len = keep.count();
        if new_len == n {
            return;
        }

        // forward[i] = new index of the first kept statement at or after i,
        // or new_len when none remains.
        let mut forward = vec![new_len; n + 1];
        let mut next_new = new_len;
        for i in (0..n).rev() {
            if keep.contains(i) {
                next_new -= 1;
            }
            forward[i] = next_new;
        }

        let redirect = |target: usize| -> usize {
            // Only fall-through statements are ever dropped, so a branch can
            // never point past the last survivor of a non-empty body.
            forward[target].min(new_len.saturating_sub(1))
        };

        let old_stmts = std::mem::take(&mut self.stmts);
        self.stmts = old_stmts
            .into_iter()
            .enumerate()
            .filter(|(i, _)| keep.contains(*i))
            .map(|(_, stmt)| stmt)
            .collect();

        for stmt in &mut self.stmts {
            let source = stmt.source();
            let remapped = match stmt.kind().clone() {
                StmtKind::Goto { target } => StmtKind::Goto {
                    target: redirect(target),
                },
                StmtKind::If { cond, target } => StmtKind::If {
                    cond,
                    target: redirect(target),
                },
                StmtKind::Switch {
                    key,
                    cases,
                    default,
                } => StmtKind::Switch {
                    key,
                    cases: cases
                        .into_iter()
                        .map(|(value, target)| (value, redirect(target)))
                        .collect(),
                    default: redirect(default),
                },
                other => other,
            };
            *stmt = Stmt::with_source(remapped, source);
        }

        self.traps = self
            .traps
            .iter()
            .filter_map(|trap| {
                let start = forward[trap.start];
                let end = forward[trap.end];
                if start >= end {
                    return None;
                }
                Some(Trap {
                    start,
                    end,
                    handler: redirect(trap.handler),
                })
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConstValue, Operand};

    fn const_assign(body: &mut Body, target: LocalId, value: i32) -> usize {
        body.push_kind(StmtKind::Assign {
            place: Place::Local(target),
            value: Expr::Use(Operand::Const(ConstValue::I32(value))),
        })
    }

    #[test]
    fn test_add_local_and_lookup() {
        let mut body = Body::new("m");
        let a = body.add_local("a", TacType::Int, LocalOrigin::Source);
        let t = body.add_local("$t0", TacType::Long, LocalOrigin::Temporary);

        assert_eq!(body.local(a).name(), "a");
        assert!(body.local(t).is_temporary());
        assert_eq!(body.locals().len(), 2);
    }

    #[test]
    fn test_receiver_context() {
        let mut body = Body::new("m");
        assert!(body.is_static());

        let this = body.add_local("this", TacType::object("Widget"), LocalOrigin::Source);
        body.set_receiver(this);
        assert!(!body.is_static());
        assert_eq!(body.this_local(), Some(this));
    }

    #[test]
    fn test_div_throw_by_operand_type() {
        let mut body = Body::new("m");
        let i = body.add_local("i", TacType::Int, LocalOrigin::Source);
        let f = body.add_local("f", TacType::Double, LocalOrigin::Source);

        let int_div = Expr::Binary {
            op: BinOp::Div,
            left: Operand::Local(i),
            right: Operand::Const(ConstValue::I32(2)),
        };
        assert!(body.expr_may_throw(&int_div));

        let float_div = Expr::Binary {
            op: BinOp::Div,
            left: Operand::Local(f),
            right: Operand::Const(ConstValue::F64(0.0)),
        };
        assert!(!body.expr_may_throw(&float_div));
    }

    #[test]
    fn test_retain_remaps_branch_targets() {
        let mut body = Body::new("m");
        let x = body.add_local("$x", TacType::Int, LocalOrigin::Temporary);
        let c = body.add_local("c", TacType::Bool, LocalOrigin::Source);

        // 0: if c goto 3
        // 1: $x = 1        (dropped)
        // 2: $x = 2        (dropped)
        // 3: return
        body.push_kind(StmtKind::If {
            cond: Expr::Use(Operand::Local(c)),
            target: 3,
        });
        const_assign(&mut body, x, 1);
        const_assign(&mut body, x, 2);
        body.push_kind(StmtKind::Return(None));

        let mut keep = BitSet::new(4);
        keep.insert(0);
        keep.insert(3);
        body.retain_by_mask(&keep);

        assert_eq!(body.stmt_count(), 2);
        match body.stmt(0).kind() {
            StmtKind::If { target, .. } => assert_eq!(*target, 1),
            other => panic!("expected if, got {other:?}"),
        }
        assert!(matches!(body.stmt(1).kind(), StmtKind::Return(None)));
    }

    #[test]
    fn test_retain_redirects_target_into_dropped_run() {
        let mut body = Body::new("m");
        let x = body.add_local("$x", TacType::Int, LocalOrigin::Temporary);
        let c = body.add_local("c", TacType::Bool, LocalOrigin::Source);

        // 0: if c goto 2   (target dropped; must redirect to the return)
        // 1: $x = 1        (dropped)
        // 2: $x = 2        (dropped)
        // 3: return
        body.push_kind(StmtKind::If {
            cond: Expr::Use(Operand::Local(c)),
            target: 2,
        });
        const_assign(&mut body, x, 1);
        const_assign(&mut body, x, 2);
        body.push_kind(StmtKind::Return(None));

        let mut keep = BitSet::new(4);
        keep.insert(0);
        keep.insert(3);
        body.retain_by_mask(&keep);

        match body.stmt(0).kind() {
            StmtKind::If { target, .. } => assert_eq!(*target, 1),
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn test_retain_remaps_traps_and_drops_empty_ones() {
        let mut body = Body::new("m");
        let x = body.add_local("$x", TacType::Int, LocalOrigin::Temporary);

        // 0: $x = 1        (dropped; trap A covers only this)
        // 1: $x = 2        (kept; trap B covers this)
        // 2: return
        const_assign(&mut body, x, 1);
        const_assign(&mut body, x, 2);
        body.push_kind(StmtKind::Return(None));
        body.add_trap(0, 1, 2);
        body.add_trap(1, 2, 2);

        let mut keep = BitSet::new(3);
        keep.insert(1);
        keep.insert(2);
        body.retain_by_mask(&keep);

        assert_eq!(body.traps().len(), 1);
        assert_eq!(
            body.traps()[0],
            Trap {
                start: 0,
                end: 1,
                handler: 1
            }
        );
    }

    #[test]
    fn test_retain_full_mask_is_noop() {
        let mut body = Body::new("m");
        let x = body.add_local("$x", TacType::Int, LocalOrigin::Temporary);
        const_assign(&mut body, x, 1);
        body.push_kind(StmtKind::Return(None));

        let before = body.clone();
        let mut keep = BitSet::new(2);
        keep.insert(0);
        keep.insert(1);
        body.retain_by_mask(&keep);
        assert_eq!(body, before);
    }

    #[test]
    fn test_replace_kind_keeps_source() {
        let mut body = Body::new("m");
        let idx = body.push(Stmt::with_source(
            StmtKind::Nop,
            crate::ir::SourceInfo::at_line(12),
        ));
        body.replace_kind(idx, StmtKind::Return(None));
        assert_eq!(body.stmt(idx).source().line, Some(12));
        assert!(matches!(body.stmt(idx).kind(), StmtKind::Return(None)));
    }
}
