// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Pointer dereference removal for GOTO programs.
//!
//! Every access through a pointer (`*p`, an implicit dereference, or `p[i]`) is replaced by an
//! explicit access to the objects the pointer may point to, as reported by a [ValueSets]
//! oracle. For each access, assertions are emitted in front of the instruction that check the
//! access is safe: the pointer is not `NULL`, points into a live object, stays in bounds, and
//! so on. A possibly unsafe access is never an error; it is an assertion for the solver.
//!
//! The walk keeps track of the path condition ([Guard]) so that, in `p && *p`, the assertion for
//! `*p` only has to hold when `p` is true.
//!
//! The pass runs in one of two modes:
//! * rewriting, where expressions are replaced in place ([remove_pointers]);
//! * checks-only, where a copy of each expression is resolved and only the emitted assertions
//!   are kept ([pointer_checks]).

mod expr;
mod program;
mod target;

pub use program::{
    dereference, pointer_checks, pointer_checks_for_functions, remove_pointers,
    remove_pointers_from_functions,
};
pub use target::INVALID_OBJECT;

use crate::guard::Guard;
use crate::options::PassOptions;
use crate::simplify::{BasicSimplifier, Simplifier};
use crate::value_set::{ProgramPoint, ValueSets};
use fxhash::FxHashSet;
use goto_ir::InternedString;
use goto_ir::goto_program::{Expr, Instruction, Location, SymbolTable};
use std::collections::BTreeSet;
use tracing::debug;

/// The intended access through a pointer. It decides which safety properties are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Read,
    /// The target must not be read-only.
    Write,
    /// The target must be a live heap object, and the pointer must point to its start.
    Free,
}

/// Where the expression being resolved is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct DerefContext<'c> {
    pub point: ProgramPoint,
    /// Location of the instruction. Assertions for a dereference without its own location
    /// are reported here.
    pub location: Location,
    /// Local variables that are in scope at `point`.
    pub valid_locals: &'c BTreeSet<InternedString>,
}

/// The dereference pass over a GOTO program.
///
/// One value can process many instructions; the emitted assertions and the set used to avoid
/// duplicate assertions are reset for each instruction.
pub struct GotoProgramDereference<'a> {
    symbol_table: &'a SymbolTable,
    options: &'a PassOptions,
    value_sets: &'a dyn ValueSets,
    simplifier: &'a dyn Simplifier,
    /// Assertions emitted for the current instruction.
    new_code: Vec<Instruction>,
    /// Guards already asserted for the current instruction.
    assertions: FxHashSet<Expr>,
}

impl<'a> GotoProgramDereference<'a> {
    pub fn new(
        symbol_table: &'a SymbolTable,
        options: &'a PassOptions,
        value_sets: &'a dyn ValueSets,
    ) -> Self {
        GotoProgramDereference {
            symbol_table,
            options,
            value_sets,
            simplifier: &BasicSimplifier,
            new_code: Vec::new(),
            assertions: FxHashSet::default(),
        }
    }

    /// Use `simplifier` on emitted assertions instead of [BasicSimplifier].
    pub fn with_simplifier(mut self, simplifier: &'a dyn Simplifier) -> Self {
        self.simplifier = simplifier;
        self
    }

    /// Forget the assertions of the previous instruction.
    fn reset(&mut self) {
        self.new_code.clear();
        self.assertions.clear();
    }

    /// Take the assertions emitted since the last reset.
    pub fn take_new_code(&mut self) -> Vec<Instruction> {
        std::mem::take(&mut self.new_code)
    }

    /// Emit `assert(!guard)`, reported as a dereference failure with the given property class.
    ///
    /// At most one assertion is emitted per distinct guard and instruction. Unless disabled by
    /// `--no-simplify`, the negated guard is simplified first; if it becomes `true`, there is
    /// nothing to check.
    fn dereference_failure(&mut self, property: &str, msg: &str, guard: &Guard, site: Location) {
        let guard_expr = guard.as_expr();
        if self.assertions.contains(&guard_expr) {
            return;
        }
        self.assertions.insert(guard_expr.clone());

        let mut assertion = guard_expr.not();
        if !self.options.no_simplify {
            assertion = self.simplifier.canonicalize_type(assertion, self.symbol_table);
            assertion = self.simplifier.simplify(assertion);
        }
        if assertion.is_true() {
            return;
        }

        debug!(property, msg, site = %site.short_string(), "dereference failure");
        let location = Location::create_location_with_property(
            format!("dereference failure: {msg}"),
            property,
            site,
        );
        self.new_code.push(Instruction::assertion(assertion, location));
    }

    /// [Self::dereference_failure] under `guard && cond`. The guard is restored afterwards.
    fn failure_under(
        &mut self,
        property: &str,
        msg: &str,
        cond: Expr,
        guard: &mut Guard,
        site: Location,
    ) -> crate::Result<()> {
        let saved = guard.len();
        let result = guard.add(cond);
        if result.is_ok() {
            self.dereference_failure(property, msg, guard, site);
        }
        guard.truncate(saved);
        result
    }
}
