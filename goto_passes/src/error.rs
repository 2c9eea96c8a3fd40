// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use goto_ir::InternedString;
use goto_ir::goto_program::Expr;
use thiserror::Error;

/// Structural violations in the IR handed to a pass.
///
/// These indicate a bug in whatever produced the IR, never a property of the program under
/// verification: a possibly unsafe access is reported as an assertion, not as an error.
/// The pass stops at the first violation.
#[derive(Debug, Error)]
pub enum MalformedIr {
    #[error("{operator} must be Boolean, but got {expr:?}")]
    NonBooleanOperator { operator: &'static str, expr: Expr },

    #[error("{operator} takes Boolean operands only, but got {operand:?}")]
    NonBooleanOperand { operator: &'static str, operand: Expr },

    #[error("first argument of if must be boolean, but got {0:?}")]
    NonBooleanCondition(Expr),

    #[error("guard conjunct must be boolean, but got {0:?}")]
    NonBooleanGuard(Expr),

    #[error("{operator} expects a pointer operand, but got {operand:?}")]
    NonPointerOperand { operator: &'static str, operand: Expr },

    #[error("index into a pointer expects an integer index, but got {0:?}")]
    NonIntegerIndex(Expr),

    #[error("dereferenced object refers to unknown symbol `{0}`")]
    UnknownSymbol(InternedString),

    #[error("value set of {pointer:?} contains an object that is not addressable: {object:?}")]
    InvalidValueSetObject { pointer: Expr, object: Expr },
}

pub type Result<T> = std::result::Result<T, MalformedIr>;
