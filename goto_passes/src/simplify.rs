// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Expression simplification used on emitted assertions.
//!
//! A full simplifier (arithmetic, pointer arithmetic, type canonicalization through typedefs)
//! belongs to the surrounding pipeline and is plugged in through [Simplifier]. The
//! [BasicSimplifier] shipped here only cleans up the boolean structure that guard negation
//! produces.

use goto_ir::goto_program::BinaryOperator::{And, Implies, Or};
use goto_ir::goto_program::ExprValue::{BinOp, BoolConstant, If, UnOp};
use goto_ir::goto_program::UnaryOperator::Not;
use goto_ir::goto_program::{Expr, SymbolTable, Type};

/// Semantics-preserving rewriting of expressions.
pub trait Simplifier {
    /// Rewrite `expr` into an equivalent, ideally smaller, expression.
    fn simplify(&self, expr: Expr) -> Expr;

    /// Replace types in `expr` by their canonical representative.
    fn canonicalize_type(&self, expr: Expr, _symbol_table: &SymbolTable) -> Expr {
        expr
    }
}

/// Constant folding and negation normal form for `&&`, `||`, `==>`, `!` and boolean `?:`.
///
/// Other operators are left alone, so `!(p != NULL)` stays as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSimplifier;

impl Simplifier for BasicSimplifier {
    fn simplify(&self, expr: Expr) -> Expr {
        if !expr.typ().is_bool() {
            return expr;
        }
        let location = *expr.location();
        let result = match expr.into_parts() {
            (BinOp { op: And, lhs, rhs }, ..) if is_bool(&lhs) && is_bool(&rhs) => {
                conjoin(self.simplify(lhs), self.simplify(rhs))
            }
            (BinOp { op: Or, lhs, rhs }, ..) if is_bool(&lhs) && is_bool(&rhs) => {
                disjoin(self.simplify(lhs), self.simplify(rhs))
            }
            (BinOp { op: Implies, lhs, rhs }, ..) if is_bool(&lhs) && is_bool(&rhs) => {
                implication(self.simplify(lhs), self.simplify(rhs))
            }
            (UnOp { op: Not, e }, ..) if is_bool(&e) => negate(self.simplify(e)),
            (If { c, t, e }, ..) if is_bool(&c) && is_bool(&t) && is_bool(&e) => {
                choose(self.simplify(c), self.simplify(t), self.simplify(e))
            }
            (value, typ, _) => Expr::new_unchecked(value, typ),
        };
        result.with_location(location)
    }
}

fn is_bool(e: &Expr) -> bool {
    e.typ().is_bool()
}

/// `!e`, with the negation pushed through `&&` and `||` and double negations removed.
fn negate(e: Expr) -> Expr {
    match e.into_parts() {
        (BoolConstant(b), ..) => Expr::bool_constant(!b),
        (UnOp { op: Not, e: inner }, ..) if is_bool(&inner) => inner,
        (BinOp { op: And, lhs, rhs }, ..) if is_bool(&lhs) && is_bool(&rhs) => {
            disjoin(negate(lhs), negate(rhs))
        }
        (BinOp { op: Or, lhs, rhs }, ..) if is_bool(&lhs) && is_bool(&rhs) => {
            conjoin(negate(lhs), negate(rhs))
        }
        (value, typ, location) => {
            let e = Expr::new_unchecked(value, typ).with_location(location);
            Expr::new_unchecked(UnOp { op: Not, e }, Type::bool())
        }
    }
}

fn conjoin(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_false() || rhs.is_true() {
        lhs
    } else if rhs.is_false() || lhs.is_true() {
        rhs
    } else {
        lhs.and(rhs)
    }
}

fn disjoin(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_true() || rhs.is_false() {
        lhs
    } else if rhs.is_true() || lhs.is_false() {
        rhs
    } else {
        lhs.or(rhs)
    }
}

fn implication(lhs: Expr, rhs: Expr) -> Expr {
    if lhs.is_false() || rhs.is_true() {
        Expr::bool_true()
    } else if lhs.is_true() {
        rhs
    } else if rhs.is_false() {
        negate(lhs)
    } else {
        lhs.implies(rhs)
    }
}

fn choose(c: Expr, t: Expr, e: Expr) -> Expr {
    if c.is_true() || t == e {
        t
    } else if c.is_false() {
        e
    } else {
        c.ternary(t, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goto_ir::goto_program::ExprValue;

    fn b(name: &str) -> Expr {
        Expr::symbol_expression(name, Type::bool())
    }

    fn simplify(e: Expr) -> Expr {
        BasicSimplifier.simplify(e)
    }

    #[test]
    fn folds_constants() {
        assert!(simplify(Expr::bool_true().not()).is_false());
        assert_eq!(simplify(b("a").and(Expr::bool_true())), b("a"));
        assert!(simplify(b("a").and(Expr::bool_false())).is_false());
        assert!(simplify(b("a").or(Expr::bool_true())).is_true());
        assert!(simplify(Expr::bool_false().implies(b("a"))).is_true());
        assert_eq!(simplify(b("c").ternary(b("a"), b("a"))), b("a"));
    }

    #[test]
    fn negated_guard_becomes_a_clause() {
        // !(g && !c) ==> !g || c
        let guard = b("g").and(b("c").not());
        assert_eq!(simplify(guard.not()), b("g").not().or(b("c")));
    }

    #[test]
    fn true_guard_negates_to_false() {
        assert!(simplify(Expr::bool_true().and(Expr::bool_true()).not()).is_false());
    }

    #[test]
    fn leaves_comparisons_alone() {
        let p = Expr::symbol_expression("p", Type::c_int().to_pointer());
        let e = p.clone().is_nonnull().not();
        assert_eq!(simplify(e.clone()), e);
        let x = Expr::symbol_expression("x", Type::c_int());
        assert_eq!(simplify(x.clone()), x);
    }

    #[test]
    fn malformed_operators_are_left_untouched() {
        let x = Expr::symbol_expression("x", Type::c_int());
        let e = Expr::new_unchecked(
            ExprValue::BinOp { op: And, lhs: x, rhs: Expr::bool_true() },
            Type::bool(),
        );
        assert_eq!(simplify(e.clone()), e);
    }
}
