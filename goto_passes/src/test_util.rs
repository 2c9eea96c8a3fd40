// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Fixtures shared by the unit tests of this crate.

use crate::LOG_ENV_VAR;
use crate::value_set::{ObjectDescriptor, ProgramPoint, ValueSetEntry};
use goto_ir::MachineModel;
use goto_ir::goto_program::{Expr, Location, Symbol, SymbolTable, Type};
use tracing_subscriber::EnvFilter;

/// Route the pass logs to the test output, filtered by `GOTO_PASSES_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env(LOG_ENV_VAR))
        .with_test_writer()
        .try_init();
}

pub fn int_var(name: &str) -> Expr {
    Expr::symbol_expression(name, Type::c_int())
}

pub fn int_ptr(name: &str) -> Expr {
    Expr::symbol_expression(name, Type::c_int().to_pointer())
}

/// Symbols of a small C program:
/// * `o`, `g`: global `int`s
/// * `c`: a `const int`
/// * `arr`: a global `int[4]`
/// * `main::1::l`: a local `int l` of `main`
/// * `p`, `q`: local `int *`; `q` has a failed symbol
/// * `f`: a function `int f()`
pub fn table() -> SymbolTable {
    let mut st = SymbolTable::new(MachineModel::default());
    let loc = Location::none();
    st.insert(Symbol::static_variable("o", "o", Type::c_int(), loc));
    st.insert(Symbol::static_variable("g", "g", Type::c_int(), loc));
    st.insert(Symbol::constant("c", "c", Expr::int_constant(3, Type::c_int()), loc));
    st.insert(Symbol::static_variable("arr", "arr", Type::c_int().array_of(4), loc));
    st.insert(Symbol::variable("main::1::l", "l", Type::c_int(), loc));
    st.insert(Symbol::variable("p", "p", Type::c_int().to_pointer(), loc));
    st.insert(
        Symbol::variable("q", "q", Type::c_int().to_pointer(), loc)
            .with_failed_symbol(Some("symex::invalid_object$q")),
    );
    st.insert(Symbol::static_variable(
        "symex::invalid_object$q",
        "invalid_object$q",
        Type::c_int(),
        loc,
    ));
    let f = Type::code_with_unnamed_parameters(vec![], Type::c_int());
    st.insert(Symbol::function("f", f, "f", loc));
    st
}

/// A declared `int` object, pointed to at its start.
pub fn object(name: &str) -> ValueSetEntry {
    ValueSetEntry::Object(ObjectDescriptor::new(int_var(name)))
}

/// A heap `int`, pointed to at its start.
pub fn dynamic(name: &str, freed: bool) -> ValueSetEntry {
    ValueSetEntry::Dynamic { object: ObjectDescriptor::new(int_var(name)), freed }
}

/// An oracle that answers `entries` for every pointer.
pub fn oracle(entries: Vec<ValueSetEntry>) -> impl Fn(ProgramPoint, &Expr) -> Vec<ValueSetEntry> {
    init_tracing();
    move |_: ProgramPoint, _: &Expr| entries.clone()
}
