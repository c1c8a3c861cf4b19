//! Flow analyses over method bodies.
//!
//! Everything here is computed per body, on demand, and discarded when the
//! requesting pass finishes; nothing is cached across invocations.
//!
//! # Key Components
//!
//! - [`StmtGraph`] - exception-aware statement-level flow graph
//! - [`ReachingDefinitions`] - which definitions of a local may reach a
//!   statement
//! - [`DefUseChains`] - the def-use oracle the elimination pass queries
//!
//! The graph is the expensive part; passes construct it lazily, only when a
//! body actually has work to do.

mod cfg;
mod defuse;
mod reaching;

pub use cfg::StmtGraph;
pub use defuse::{DefUseChains, UseSite};
pub use reaching::ReachingDefinitions;
