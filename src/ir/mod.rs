//! The three-address IR for managed-bytecode method bodies.
//!
//! Stack-based bytecode is assumed to have been lowered upstream into flat
//! statements over named locals: every computation is a single statement
//! reading [`Operand`]s and writing at most one [`Place`]. This module owns
//! the data model only; flow analyses live in [`crate::analysis`] and
//! transformations in [`crate::passes`].
//!
//! # Key Components
//!
//! - [`Body`] - one method's ordered statement sequence, local table, trap
//!   table, and method context
//! - [`Stmt`] / [`StmtKind`] - statements, with branch targets as statement
//!   indices
//! - [`Expr`] - the closed sum of right-hand-side expression kinds
//! - [`Local`] / [`LocalId`] / [`TacType`] - variables and their static types

mod body;
mod expr;
mod local;
mod stmt;

pub use body::{Body, Trap};
pub use expr::{
    BinOp, ConstValue, Expr, ExprKind, FieldRef, InvokeExpr, MethodRef, Operand, UnaryOp,
};
pub use local::{Local, LocalId, LocalOrigin, TacType};
pub use stmt::{IdentityValue, Place, SourceInfo, Stmt, StmtKind};
