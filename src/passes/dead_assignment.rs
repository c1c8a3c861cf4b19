//! Dead assignment elimination.
//!
//! Removes assignments whose computed value is never observed, without
//! changing any observable behavior of the body: control flow, heap and
//! array effects, calls, monitor operations and fault points are all
//! preserved. The pass neither propagates values nor merges computations;
//! it only deletes and demotes.
//!
//! The pass runs in three phases over one body:
//!
//! 1. **Classification.** One linear scan decides for each statement whether
//!    it is essential, meaning it must survive on its own account. Trivially
//!    dead statements (`x = x` and `Nop`) are dropped up front so they can
//!    never act as definitions in the next phase.
//! 2. **Closure.** If anything was non-essential, a backward closure over
//!    def-use chains retains every statement an essential statement
//!    transitively depends on. Everything outside the closure is dropped in
//!    one mask commit.
//! 3. **Demotion.** A surviving call assignment whose result has no
//!    surviving reader is rewritten to a bare call. The call still happens,
//!    the dead store does not.
//!
//! The dataflow analyses are built lazily: a body whose statements are all
//! essential and contain no eliminable call assignment never pays for a
//! graph.

use std::time::Instant;

use crate::{
    analysis::{DefUseChains, StmtGraph},
    ir::{BinOp, Body, Expr, LocalId, Operand, Place, Stmt, StmtKind},
    passes::{BodyPass, Event, EventKind, PassContext},
    utils::BitSet,
    Result,
};

/// The dead assignment elimination pass.
///
/// Stateless; one instance can be run over any number of bodies, also
/// concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadAssignmentElimination;

impl DeadAssignmentElimination {
    /// Creates the pass.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Returns `true` for statements that are dead regardless of any dataflow:
/// no-ops and assignments of a local to itself.
fn is_trivially_dead(stmt: &Stmt) -> bool {
    match stmt.kind() {
        StmtKind::Nop => true,
        StmtKind::Assign {
            place: Place::Local(target),
            value: Expr::Use(Operand::Local(source)),
        } => target == source,
        _ => false,
    }
}

/// Returns the assigned local if `stmt` is an assignment this pass is
/// allowed to remove: the target must be a local, and under
/// `only_temporaries` a compiler-generated or null-typed one.
fn eliminable_target(body: &Body, stmt: &Stmt, only_temporaries: bool) -> Option<LocalId> {
    let StmtKind::Assign {
        place: Place::Local(target),
        ..
    } = stmt.kind()
    else {
        return None;
    };
    if only_temporaries {
        let local = body.local(*target);
        if !local.is_temporary() && !local.ty().is_null() {
            return None;
        }
    }
    Some(*target)
}

/// Returns `true` if evaluating `value` has an effect beyond producing the
/// result, so the assignment computing it must survive even when the result
/// is dead.
///
/// The one deliberate divergence from [`Body::expr_may_throw`] is the
/// instance field load off the method's own receiver: `this` is never null,
/// so that load cannot fault and the statement may go.
fn rhs_is_essential(body: &Body, value: &Expr) -> bool {
    match value {
        Expr::Invoke(_)
        | Expr::ArrayLoad { .. }
        | Expr::Cast { .. }
        | Expr::NewObject { .. }
        | Expr::NewArray { .. }
        | Expr::NewMultiArray { .. }
        | Expr::StaticFieldLoad { .. } => true,
        Expr::InstanceFieldLoad { base, .. } => {
            body.is_static() || body.this_local() != Some(*base)
        }
        Expr::Binary {
            op: BinOp::Div | BinOp::Rem,
            left,
            right,
        } => body.operand_type(left).is_integral() || body.operand_type(right).is_integral(),
        Expr::Use(_) | Expr::Unary { .. } | Expr::Binary { .. } => false,
    }
}

impl BodyPass for DeadAssignmentElimination {
    fn name(&self) -> &'static str {
        "dead-assignment-elimination"
    }

    fn description(&self) -> &'static str {
        "Removes assignments whose value is never read and demotes dead call assignments to bare calls"
    }

    fn run(&self, body: &mut Body, ctx: &PassContext) -> Result<bool> {
        let config = *ctx.config();
        let started = config.time.then(Instant::now);
        if config.verbose {
            ctx.events().record(Event {
                pass: self.name(),
                body: body.name().to_string(),
                kind: EventKind::Progress {
                    message: format!("processing {} statements", body.stmt_count()),
                },
            });
        }

        let mut changed = false;

        // Trivially dead statements go first. Left in place, a self
        // assignment would reach uses of its local and the closure below
        // would retain it together with everything it reads.
        let n = body.stmt_count();
        let mut keep = BitSet::new(n);
        for (i, stmt) in body.stmts().iter().enumerate() {
            if !is_trivially_dead(stmt) {
                keep.insert(i);
            }
        }
        let mut removed = n - keep.count();
        if removed > 0 {
            body.retain_by_mask(&keep);
            changed = true;
        }

        let n = body.stmt_count();
        let mut essential = Vec::with_capacity(n);
        let mut check_invoke = false;
        let mut all_essential = true;
        for (i, stmt) in body.stmts().iter().enumerate() {
            let is_essential = match (
                stmt.kind(),
                eliminable_target(body, stmt, config.only_temporaries),
            ) {
                (StmtKind::Assign { value, .. }, Some(_)) => {
                    check_invoke |= value.is_invoke();
                    rhs_is_essential(body, value)
                }
                _ => true,
            };
            if is_essential {
                essential.push(i);
            } else {
                all_essential = false;
            }
        }

        if check_invoke || !all_essential {
            let graph = StmtGraph::build(body)?;
            let chains = DefUseChains::build(body, &graph)?;

            let mut retained = BitSet::new(n);
            if all_essential {
                for i in 0..n {
                    retained.insert(i);
                }
            } else {
                // Backward closure: the retained set doubles as the visited
                // marker, so every statement is expanded at most once.
                let mut worklist = essential;
                while let Some(i) = worklist.pop() {
                    if retained.contains(i) {
                        continue;
                    }
                    retained.insert(i);
                    for local in body.stmt(i).used_locals() {
                        worklist.extend(chains.defs_reaching(local, i));
                    }
                }
            }

            if check_invoke {
                // A call assignment is always essential and therefore always
                // retained; only its store can be dead. Decisions are made
                // against the retained set, before the commit renumbers
                // anything.
                let mut demotions = Vec::new();
                for i in retained.iter() {
                    let stmt = body.stmt(i);
                    if eliminable_target(body, stmt, config.only_temporaries).is_none() {
                        continue;
                    }
                    let StmtKind::Assign {
                        value: Expr::Invoke(invoke),
                        ..
                    } = stmt.kind()
                    else {
                        continue;
                    };
                    if chains
                        .uses_of(i)
                        .iter()
                        .all(|site| !retained.contains(site.stmt))
                    {
                        demotions.push((i, invoke.clone()));
                    }
                }
                for (i, invoke) in demotions {
                    let committed = retained.iter().take_while(|&k| k < i).count();
                    body.replace_kind(i, StmtKind::Invoke(invoke));
                    ctx.events().record(Event {
                        pass: self.name(),
                        body: body.name().to_string(),
                        kind: EventKind::InvokeDemoted { stmt: committed },
                    });
                    changed = true;
                }
            }

            let dead = n - retained.count();
            if dead > 0 {
                removed += dead;
                body.retain_by_mask(&retained);
                changed = true;
            }
        }

        if removed > 0 {
            ctx.events().record(Event {
                pass: self.name(),
                body: body.name().to_string(),
                kind: EventKind::StatementsRemoved { count: removed },
            });
        }
        if let Some(started) = started {
            ctx.events().record(Event {
                pass: self.name(),
                body: body.name().to_string(),
                kind: EventKind::Timing {
                    elapsed: started.elapsed(),
                },
            });
        }
        Ok(changed)
    }
}
