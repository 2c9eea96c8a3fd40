// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The SSA equation: the linear trace produced by symbolic execution of a GOTO program.
//!
//! Every symbol in a step is an SSA-renamed identifier, e.g. `main::1::x!0@1#3`. Passes over
//! the trace never remove or reorder steps; they flip [SsaStep::ignored] and downstream
//! consumers skip ignored steps. This keeps step indices stable.

use crate::InternedString;
use crate::goto_program::{Expr, Location};
use serde::{Deserialize, Serialize};

/// One step of the SSA equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsaStep {
    pub kind: SsaStepKind,
    /// The path condition under which this step takes effect.
    pub guard: Expr,
    #[serde(default)]
    pub source: Location,
    #[serde(default)]
    pub ignored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SsaStepKind {
    /// `lhs == rhs`. `lhs` is an SSA symbol.
    Assignment { lhs: Expr, rhs: Expr },
    Assume { cond: Expr },
    Assert { cond: Expr, comment: String },
    /// A new SSA index for `lhs` whose value is not constrained by this step.
    Renumber { lhs: Expr },
    /// Values recorded for the counterexample trace.
    Output { args: Vec<Expr> },
    Skip,
}

impl SsaStep {
    pub fn new(kind: SsaStepKind, guard: Expr) -> Self {
        SsaStep { kind, guard, source: Location::none(), ignored: false }
    }

    /// An unguarded `lhs == rhs`.
    pub fn assignment(lhs: Expr, rhs: Expr) -> Self {
        assert!(lhs.is_symbol(), "SSA assignment to a non-symbol {lhs:?}");
        SsaStep::new(SsaStepKind::Assignment { lhs, rhs }, Expr::bool_true())
    }

    pub fn assume(cond: Expr) -> Self {
        SsaStep::new(SsaStepKind::Assume { cond }, Expr::bool_true())
    }

    pub fn assert<T: Into<String>>(cond: Expr, comment: T) -> Self {
        SsaStep::new(SsaStepKind::Assert { cond, comment: comment.into() }, Expr::bool_true())
    }

    pub fn renumber(lhs: Expr) -> Self {
        assert!(lhs.is_symbol(), "SSA renumbering of a non-symbol {lhs:?}");
        SsaStep::new(SsaStepKind::Renumber { lhs }, Expr::bool_true())
    }

    pub fn with_guard(mut self, guard: Expr) -> Self {
        self.guard = guard;
        self
    }

    pub fn is_assert(&self) -> bool {
        match self.kind {
            SsaStepKind::Assert { .. } => true,
            _ => false,
        }
    }

    pub fn is_assume(&self) -> bool {
        match self.kind {
            SsaStepKind::Assume { .. } => true,
            _ => false,
        }
    }

    /// The SSA identifier defined by an assignment or renumber step.
    /// `None` for other steps, and for a left-hand side that is not a symbol.
    pub fn defined_symbol(&self) -> Option<InternedString> {
        match &self.kind {
            SsaStepKind::Assignment { lhs, .. } | SsaStepKind::Renumber { lhs } => {
                lhs.symbol_identifier()
            }
            _ => None,
        }
    }
}

/// Strip the SSA renaming levels from an identifier: `main::1::x!0@1#3` becomes `main::1::x`.
///
/// Only trailing `#<n>`, `@<n>` and `!<n>` levels are removed, in that order, so names that
/// contain those characters themselves (e.g. `c:@F@main@x`) survive.
pub fn ssa_base_name(identifier: &str) -> &str {
    ['#', '@', '!'].into_iter().fold(identifier, |name, separator| strip_level(name, separator))
}

/// `name` without a trailing `<separator><digits>`, if it has one.
fn strip_level(name: &str, separator: char) -> &str {
    match name.rsplit_once(separator) {
        Some((base, level))
            if !level.is_empty() && level.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goto_program::Type;

    #[test]
    fn base_name_strips_all_levels() {
        assert_eq!(ssa_base_name("main::1::x!0@1#3"), "main::1::x");
        assert_eq!(ssa_base_name("main::1::x#2"), "main::1::x");
        assert_eq!(ssa_base_name("c::g@0#1"), "c::g");
        assert_eq!(ssa_base_name("plain"), "plain");
    }

    #[test]
    fn base_name_keeps_separators_inside_the_name() {
        assert_eq!(ssa_base_name("c:@F@main@x!0@1#2"), "c:@F@main@x");
        assert_eq!(ssa_base_name("c:@F@main@x#2"), "c:@F@main@x");
        assert_eq!(ssa_base_name("c:@F@main@x"), "c:@F@main@x");
        assert_eq!(ssa_base_name("tmp!x#3"), "tmp!x");
    }

    #[test]
    fn defined_symbol_of_assignments() {
        let x = Expr::symbol_expression("x#1", Type::c_int());
        let step = SsaStep::assignment(x.clone(), Type::c_int().one());
        assert_eq!(step.defined_symbol(), Some("x#1".into()));
        assert_eq!(SsaStep::renumber(x.clone()).defined_symbol(), Some("x#1".into()));
        assert_eq!(SsaStep::assert(x.gt(Type::c_int().zero()), "x > 0").defined_symbol(), None);
    }
}
