#![doc(html_no_source)]
#![deny(missing_docs)]

//! # tacpass
//!
//! Scalar optimization passes over a three-address intermediate
//! representation for managed bytecode. The crate models method bodies as
//! flat statement sequences with explicit locals, builds exception-aware
//! flow graphs and def-use chains over them, and ships passes that transform
//! bodies without changing their observable behavior.
//!
//! ## Features
//!
//! - **Three-address IR** - Flat statements over locals and constants, with
//!   identity statements binding receivers, parameters and caught exceptions
//! - **Exception-aware dataflow** - Statement-level flow graphs that model
//!   trap (handler) edges, reaching definitions and def-use chains
//! - **Dead assignment elimination** - Removes assignments whose value is
//!   never read and demotes dead call assignments to bare calls
//! - **Diagnostics** - Thread-safe event log recording what each pass did,
//!   with optional per-body timing
//!
//! ## Quick Start
//!
//! ```rust
//! use tacpass::prelude::*;
//!
//! let mut body = Body::new("example");
//! let x = body.add_local("x", TacType::Int, LocalOrigin::Source);
//! body.push_kind(StmtKind::Assign {
//!     place: Place::Local(x),
//!     value: Expr::Use(Operand::Const(ConstValue::I32(42))),
//! });
//! body.push_kind(StmtKind::Return(None));
//!
//! let ctx = PassContext::default();
//! let changed = DeadAssignmentElimination::new().run(&mut body, &ctx)?;
//! assert!(changed);
//! assert_eq!(body.stmt_count(), 1);
//! # Ok::<(), tacpass::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The crate is layered bottom-up:
//!
//! - [`ir`] - the statement model: locals, expressions, statements, bodies
//! - [`analysis`] - flow graph, reaching definitions, def-use chains
//! - [`passes`] - the [`passes::BodyPass`] trait, configuration, diagnostics
//!   and the passes themselves
//!
//! Analyses are built per body on demand and discarded after the pass
//! commits; nothing is cached across invocations.

#[macro_use]
pub(crate) mod error;
pub(crate) mod utils;

pub mod analysis;
pub mod ir;
pub mod passes;
pub mod prelude;

/// Central result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Central error type covering every failure this crate can report.
pub use error::Error;
