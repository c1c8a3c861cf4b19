//! # tacpass Prelude
//!
//! Convenient re-exports of the most commonly used types. Import this module
//! to build bodies and run passes without spelling out the module paths.

/// The main error type for all tacpass operations
pub use crate::Error;

/// The result type used throughout tacpass
pub use crate::Result;

/// The statement model
pub use crate::ir::{
    BinOp, Body, ConstValue, Expr, FieldRef, IdentityValue, InvokeExpr, Local, LocalId,
    LocalOrigin, MethodRef, Operand, Place, SourceInfo, Stmt, StmtKind, TacType, Trap, UnaryOp,
};

/// The dataflow analyses
pub use crate::analysis::{DefUseChains, ReachingDefinitions, StmtGraph, UseSite};

/// Pass infrastructure and the passes themselves
pub use crate::passes::{
    BodyPass, DeadAssignmentElimination, Event, EventKind, EventLog, PassConfig, PassContext,
};
