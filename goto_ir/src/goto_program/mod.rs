// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This module contains typesafe representations of CBMC's GOTO programs

// There are a fair number of constructs in this module that are better maintained as
// explicit pattern matching versus using the `matches!` macro.
#![allow(clippy::match_like_matches_macro)]

mod expr;
mod instruction;
mod location;
mod program;
mod symbol;
mod symbol_table;
mod typ;

pub use expr::{BinaryOperator, Expr, ExprValue, UnaryOperator};
pub use instruction::{Instruction, InstructionBody, OtherStatement};
pub use location::Location;
pub use program::{GotoFunction, GotoFunctions, GotoProgram};
pub use symbol::{Symbol, SymbolValues};
pub use symbol_table::SymbolTable;
pub use typ::{CIntType, DatatypeComponent, Parameter, Type, aggr_tag};
