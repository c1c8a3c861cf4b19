//! Def-use chains over one body.
//!
//! Answers the two queries the elimination pass needs:
//!
//! - **definitions reaching a use**: which statements may have defined the
//!   value a statement reads
//! - **uses of a definition**: which statement slots may read the value a
//!   statement defines
//!
//! Both are derived from [`ReachingDefinitions`]: every use slot of every
//! statement is attributed to each of its reaching definitions. The chains
//! are exception-flow aware because the underlying graph is.

use crate::{
    analysis::{ReachingDefinitions, StmtGraph},
    ir::{Body, LocalId},
    Error, Result,
};

/// One read of a defined value: the reading statement and the slot position
/// within its operand list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UseSite {
    /// Index of the reading statement.
    pub stmt: usize,
    /// Position of the read within the statement's used-local list.
    pub slot: usize,
}

/// Def-use chains for one body.
#[derive(Debug)]
pub struct DefUseChains {
    reaching: ReachingDefinitions,
    /// Per statement: the use sites of the value it defines.
    uses: Vec<Vec<UseSite>>,
}

impl DefUseChains {
    /// Builds the chains for `body` over `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] when a reachable statement reads a local
    /// no definition reaches: the body is inconsistent and cannot be
    /// analyzed.
    pub fn build(body: &Body, graph: &StmtGraph) -> Result<Self> {
        let reaching = ReachingDefinitions::build(body, graph);
        let n = body.stmt_count();
        let mut uses = vec![Vec::new(); n];

        for (i, stmt) in body.stmts().iter().enumerate() {
            for (slot, local) in stmt.used_locals().into_iter().enumerate() {
                let defs = reaching.defs_of_at(local, i);
                if defs.is_empty() {
                    if graph.is_reachable(i) {
                        return Err(Error::GraphError(format!(
                            "no definition of {local} reaches its use at statement {i} in {}",
                            body.name()
                        )));
                    }
                    continue;
                }
                for def in defs {
                    uses[def].push(UseSite { stmt: i, slot });
                }
            }
        }

        Ok(Self { reaching, uses })
    }

    /// Returns the statements that may define `local` at the entry of `stmt`.
    #[must_use]
    pub fn defs_reaching(&self, local: LocalId, stmt: usize) -> Vec<usize> {
        self.reaching.defs_of_at(local, stmt)
    }

    /// Returns the use sites of the value defined by `def_stmt`.
    ///
    /// Empty for statements that define nothing, and for definitions nothing
    /// reads.
    #[must_use]
    pub fn uses_of(&self, def_stmt: usize) -> &[UseSite] {
        &self.uses[def_stmt]
    }

    /// Returns the number of use sites of the value defined by `def_stmt`.
    #[must_use]
    pub fn use_count(&self, def_stmt: usize) -> usize {
        self.uses[def_stmt].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BinOp, ConstValue, Expr, LocalOrigin, Operand, Place, StmtKind, TacType};

    #[test]
    fn test_uses_attributed_to_definition() {
        let mut body = Body::new("m");
        let x = body.add_local("x", TacType::Int, LocalOrigin::Source);
        let y = body.add_local("y", TacType::Int, LocalOrigin::Source);

        // 0: x = 1
        // 1: y = x + x
        // 2: return y
        body.push_kind(StmtKind::Assign {
            place: Place::Local(x),
            value: Expr::Use(Operand::Const(ConstValue::I32(1))),
        });
        body.push_kind(StmtKind::Assign {
            place: Place::Local(y),
            value: Expr::Binary {
                op: BinOp::Add,
                left: Operand::Local(x),
                right: Operand::Local(x),
            },
        });
        body.push_kind(StmtKind::Return(Some(Operand::Local(y))));

        let graph = StmtGraph::build(&body).unwrap();
        let chains = DefUseChains::build(&body, &graph).unwrap();

        // x is read twice at statement 1, once per slot.
        assert_eq!(
            chains.uses_of(0),
            &[UseSite { stmt: 1, slot: 0 }, UseSite { stmt: 1, slot: 1 }]
        );
        // y is read once by the return.
        assert_eq!(chains.uses_of(1), &[UseSite { stmt: 2, slot: 0 }]);
        assert_eq!(chains.use_count(2), 0);
    }

    #[test]
    fn test_unused_definition_has_no_uses() {
        let mut body = Body::new("m");
        let x = body.add_local("$x", TacType::Int, LocalOrigin::Temporary);

        // 0: $x = 1
        // 1: return
        body.push_kind(StmtKind::Assign {
            place: Place::Local(x),
            value: Expr::Use(Operand::Const(ConstValue::I32(1))),
        });
        body.push_kind(StmtKind::Return(None));

        let graph = StmtGraph::build(&body).unwrap();
        let chains = DefUseChains::build(&body, &graph).unwrap();
        assert!(chains.uses_of(0).is_empty());
    }

    #[test]
    fn test_use_without_definition_is_rejected() {
        let mut body = Body::new("m");
        let x = body.add_local("x", TacType::Int, LocalOrigin::Source);

        // 0: return x      (x never defined)
        body.push_kind(StmtKind::Return(Some(Operand::Local(x))));

        let graph = StmtGraph::build(&body).unwrap();
        let err = DefUseChains::build(&body, &graph).unwrap_err();
        assert!(matches!(err, Error::GraphError(_)));
    }

    #[test]
    fn test_parameter_identity_provides_definition() {
        let mut body = Body::new("m");
        let p = body.add_local("p", TacType::Int, LocalOrigin::Source);

        // 0: p := @parameter0
        // 1: return p
        body.push_kind(StmtKind::Identity {
            local: p,
            value: crate::ir::IdentityValue::Parameter(0),
        });
        body.push_kind(StmtKind::Return(Some(Operand::Local(p))));

        let graph = StmtGraph::build(&body).unwrap();
        let chains = DefUseChains::build(&body, &graph).unwrap();
        assert_eq!(chains.uses_of(0), &[UseSite { stmt: 1, slot: 0 }]);
        assert_eq!(chains.defs_reaching(p, 1), vec![0]);
    }
}
