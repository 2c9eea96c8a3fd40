// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Typed, in-memory representations of the two data structures a bounded model checker's
//! middle end works on.
//!
//! 1. [goto_program::GotoFunctions] is the control-flow IR ("GOTO program"): per function, a
//!    sequence of [goto_program::Instruction]s, each carrying a guard, a payload and a location.
//! 2. [ssa::SsaStep] is one entry of the linear trace ("SSA equation") that symbolic execution
//!    produces from a GOTO program.
//!
//! Both are built from [goto_program::Expr] trees typed by [goto_program::Type]. Names inside
//! expressions refer into a [goto_program::SymbolTable]; every name is an [InternedString].
//!
//! The encoding follows CBMC's: operator and type names map onto CBMC's irep ids, and the
//! constructors of [goto_program::Expr] check the same typing rules CBMC enforces.
//! [goto_program::Expr::new_unchecked] and the serde impls are the only ways to build a tree
//! that skips those checks; consumers of such trees must validate what they rely on.

mod interner;
mod machine_model;

pub mod goto_program;
pub mod ssa;

pub use interner::{InternString, InternStringOption, InternedString};
pub use machine_model::MachineModel;
