//! Exception-aware statement-level flow graph.
//!
//! The dataflow analyses in this crate run at statement granularity: every
//! statement of a [`Body`] is one node, and edges follow both normal control
//! flow and possible exceptional transfers into trap handlers.
//!
//! # Exceptional Edges
//!
//! For a may-throw statement `s` covered by a trap, the graph contains an
//! edge from `s` to the handler *and* edges from each normal predecessor of
//! `s` to the handler. The second set matters for reaching definitions: when
//! `s` itself faults, any value it would have defined never materializes, so
//! the handler must also see the states that held just before `s`.
//!
//! # Validation
//!
//! Construction checks the structural preconditions the analyses rely on:
//! branch targets and trap indices inside the sequence, trap ranges
//! non-inverted, and no fall-through past the last statement. A violation
//! reports the body as malformed and aborts processing for that body only.

use crate::{
    ir::{Body, StmtKind},
    utils::BitSet,
    Result,
};

/// Flow graph over the statements of one body.
///
/// Nodes are statement indices; statement `0` is the entry. The graph is
/// built on demand, only when a pass actually needs flow information.
#[derive(Debug)]
pub struct StmtGraph {
    /// Successor lists per statement.
    succs: Vec<Vec<usize>>,
    /// Predecessor lists per statement.
    preds: Vec<Vec<usize>>,
    /// Statements reachable from the entry.
    reachable: BitSet,
}

impl StmtGraph {
    /// Builds the flow graph for `body`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] when a branch target or trap index
    /// lies outside the statement sequence, a trap range is inverted, or the
    /// last statement can fall through the end of the body.
    pub fn build(body: &Body) -> Result<Self> {
        let n = body.stmt_count();
        let mut graph = Self {
            succs: vec![Vec::new(); n],
            preds: vec![Vec::new(); n],
            reachable: BitSet::new(n),
        };

        for trap in body.traps() {
            if trap.start > trap.end || trap.end > n {
                return Err(malformed_error!(
                    "trap range {}..{} outside body of {} statements",
                    trap.start,
                    trap.end,
                    n
                ));
            }
            if trap.handler >= n {
                return Err(malformed_error!(
                    "trap handler {} outside body of {} statements",
                    trap.handler,
                    n
                ));
            }
        }

        // Normal control flow edges.
        for (i, stmt) in body.stmts().iter().enumerate() {
            let mut targets: Vec<usize> = Vec::new();
            match stmt.kind() {
                StmtKind::Goto { target } => targets.push(*target),
                StmtKind::If { target, .. } => targets.push(*target),
                StmtKind::Switch {
                    cases, default, ..
                } => {
                    targets.extend(cases.iter().map(|(_, t)| *t));
                    targets.push(*default);
                }
                _ => {}
            }
            for target in targets {
                if target >= n {
                    return Err(malformed_error!(
                        "branch target {target} outside body of {n} statements"
                    ));
                }
                graph.add_edge(i, target);
            }
            if stmt.falls_through() {
                if i + 1 == n {
                    return Err(malformed_error!(
                        "statement {i} falls through the end of the body"
                    ));
                }
                graph.add_edge(i, i + 1);
            }
        }

        // Exceptional edges into handlers. Collected against the normal
        // predecessor lists before insertion so handler edges do not cascade
        // into each other.
        let mut handler_edges: Vec<(usize, usize)> = Vec::new();
        for trap in body.traps() {
            for s in trap.start..trap.end {
                if !body.stmt_may_throw(body.stmt(s)) {
                    continue;
                }
                handler_edges.push((s, trap.handler));
                for &p in &graph.preds[s] {
                    handler_edges.push((p, trap.handler));
                }
            }
        }
        for (from, to) in handler_edges {
            graph.add_edge(from, to);
        }

        graph.compute_reachability();
        Ok(graph)
    }

    fn add_edge(&mut self, from: usize, to: usize) {
        if !self.succs[from].contains(&to) {
            self.succs[from].push(to);
            self.preds[to].push(from);
        }
    }

    fn compute_reachability(&mut self) {
        if self.succs.is_empty() {
            return;
        }
        let mut stack = vec![0usize];
        self.reachable.insert(0);
        while let Some(node) = stack.pop() {
            for &succ in &self.succs[node] {
                if !self.reachable.contains(succ) {
                    self.reachable.insert(succ);
                    stack.push(succ);
                }
            }
        }
    }

    /// Returns the number of statement nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.succs.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.succs.is_empty()
    }

    /// Returns the successors of a statement.
    #[must_use]
    pub fn successors(&self, stmt: usize) -> &[usize] {
        &self.succs[stmt]
    }

    /// Returns the predecessors of a statement.
    #[must_use]
    pub fn predecessors(&self, stmt: usize) -> &[usize] {
        &self.preds[stmt]
    }

    /// Returns `true` if control can reach `stmt` from the entry.
    #[must_use]
    pub fn is_reachable(&self, stmt: usize) -> bool {
        self.reachable.contains(stmt)
    }
}
