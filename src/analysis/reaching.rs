//! Reaching definitions analysis.
//!
//! Computes, for each statement, which definitions of each local may still
//! hold when control arrives there. This IR is not in SSA form, so a later
//! definition of the same local kills earlier ones along a path.
//!
//! # Algorithm
//!
//! Definition sites are the statements that define a local (local-targeted
//! assignments and identity bindings), numbered densely. Per statement:
//!
//! - `GEN[s]` = the site of `s`, if `s` defines a local
//! - `KILL[s]` = all other sites of the same local
//! - `IN[s]` = ∪{OUT[p] | p is a predecessor of `s`}
//! - `OUT[s]` = GEN[s] ∪ (IN[s] - KILL[s])
//!
//! Solved to a fixpoint with a deduplicating worklist; the meet is union, so
//! a definition reaches if it reaches along any path, including exceptional
//! edges of the [`StmtGraph`].

use std::collections::VecDeque;

use crate::{analysis::StmtGraph, ir::Body, ir::LocalId, utils::BitSet};

/// Reaching definitions over one body.
///
/// Built from a [`StmtGraph`]; queries answer in terms of statement indices.
#[derive(Debug)]
pub struct ReachingDefinitions {
    /// Definition site index -> defining statement index.
    site_stmts: Vec<usize>,
    /// Local index -> its definition sites.
    sites_by_local: Vec<Vec<usize>>,
    /// Per statement: the sites reaching its entry.
    in_states: Vec<BitSet>,
}

impl ReachingDefinitions {
    /// Runs the analysis for `body` over `graph`.
    #[must_use]
    pub fn build(body: &Body, graph: &StmtGraph) -> Self {
        let n = body.stmt_count();
        let num_locals = body.locals().len();

        // Number the definition sites.
        let mut site_stmts = Vec::new();
        let mut sites_by_local = vec![Vec::new(); num_locals];
        let mut site_of_stmt = vec![None; n];
        for (i, stmt) in body.stmts().iter().enumerate() {
            if let Some(local) = stmt.defined_local() {
                let site = site_stmts.len();
                site_stmts.push(i);
                sites_by_local[local.index()].push(site);
                site_of_stmt[i] = Some(site);
            }
        }
        let num_sites = site_stmts.len();

        // Per-statement gen/kill.
        let mut gen_sets = vec![BitSet::new(num_sites); n];
        let mut kill_sets = vec![BitSet::new(num_sites); n];
        for (i, stmt) in body.stmts().iter().enumerate() {
            if let (Some(site), Some(local)) = (site_of_stmt[i], stmt.defined_local()) {
                gen_sets[i].insert(site);
                for &other in &sites_by_local[local.index()] {
                    if other != site {
                        kill_sets[i].insert(other);
                    }
                }
            }
        }

        // Fixpoint iteration.
        let mut in_states = vec![BitSet::new(num_sites); n];
        let mut out_states = vec![BitSet::new(num_sites); n];
        let mut worklist: VecDeque<usize> = (0..n).collect();
        let mut in_worklist = vec![true; n];

        while let Some(i) = worklist.pop_front() {
            in_worklist[i] = false;

            let mut input = BitSet::new(num_sites);
            for &p in graph.predecessors(i) {
                input.union_with(&out_states[p]);
            }

            let mut output = input.clone();
            output.difference_with(&kill_sets[i]);
            output.union_with(&gen_sets[i]);

            in_states[i] = input;
            if output != out_states[i] {
                out_states[i] = output;
                for &s in graph.successors(i) {
                    if !in_worklist[s] {
                        worklist.push_back(s);
                        in_worklist[s] = true;
                    }
                }
            }
        }

        Self {
            site_stmts,
            sites_by_local,
            in_states,
        }
    }

    /// Returns the statements defining `local` that may reach the entry of
    /// `stmt`, in body order.
    #[must_use]
    pub fn defs_of_at(&self, local: LocalId, stmt: usize) -> Vec<usize> {
        let reaching = &self.in_states[stmt];
        self.sites_by_local[local.index()]
            .iter()
            .filter(|&&site| reaching.contains(site))
            .map(|&site| self.site_stmts[site])
            .collect()
    }

    /// Returns the number of definition sites in the body.
    #[must_use]
    pub fn site_count(&self) -> usize {
        self.site_stmts.len()
    }
}
