// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The path condition accumulated while walking an expression tree.

use crate::error::{MalformedIr, Result};
use goto_ir::goto_program::{BinaryOperator, Expr, ExprValue};

/// An ordered conjunction of boolean conditions.
///
/// Conjuncts are pushed while descending into a branch and removed with [Guard::truncate]
/// when the branch is done, so a guard behaves like a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guard {
    conjuncts: Vec<Expr>,
}

impl Guard {
    pub fn new() -> Self {
        Guard::default()
    }

    /// Add `expr` as a conjunct. Conjunctions are split, and `true` adds nothing.
    pub fn add(&mut self, expr: Expr) -> Result<()> {
        if !expr.typ().is_bool() {
            return Err(MalformedIr::NonBooleanGuard(expr));
        }
        if expr.is_true() {
            return Ok(());
        }
        match expr.into_parts() {
            (ExprValue::BinOp { op: BinaryOperator::And, lhs, rhs }, ..) => {
                self.add(lhs)?;
                self.add(rhs)
            }
            (value, typ, location) => {
                self.conjuncts.push(Expr::new_unchecked(value, typ).with_location(location));
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.conjuncts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conjuncts.is_empty()
    }

    /// Drop every conjunct added after the guard had length `len`.
    pub fn truncate(&mut self, len: usize) {
        self.conjuncts.truncate(len);
    }

    /// The guard as a single expression: `true` when empty, otherwise `c0 && c1 && ...`.
    pub fn as_expr(&self) -> Expr {
        let mut conjuncts = self.conjuncts.iter().cloned();
        match conjuncts.next() {
            None => Expr::bool_true(),
            Some(first) => conjuncts.fold(first, Expr::and),
        }
    }
}
