// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! End-to-end behavior of the dereference pass and the slicers.

use goto_ir::goto_program::{
    Expr, ExprValue, GotoProgram, Instruction, InstructionBody, Location, Symbol, SymbolTable,
    Type,
};
use goto_ir::ssa::{SsaStep, SsaStepKind};
use goto_ir::{InternedString, MachineModel};
use goto_passes::dereference::{dereference, pointer_checks, remove_pointers};
use goto_passes::slice::{SimpleSlice, SsaStepAlgorithm, SymexSlice};
use goto_passes::value_set::{ObjectDescriptor, ProgramPoint, ValueSetEntry};
use goto_passes::{LOG_ENV_VAR, MalformedIr, PassOptions};
use std::collections::{BTreeSet, HashSet};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env(LOG_ENV_VAR))
        .with_test_writer()
        .try_init();
}

fn int(name: &str) -> Expr {
    Expr::symbol_expression(name, Type::c_int())
}

fn int_ptr(name: &str) -> Expr {
    Expr::symbol_expression(name, Type::c_int().to_pointer())
}

fn zero() -> Expr {
    Expr::int_constant(0, Type::c_int())
}

fn loc(line: u64) -> Location {
    Location::new("scenario.c", Some("main"), line, None, line, None)
}

fn symbol_table() -> SymbolTable {
    let mut st = SymbolTable::new(MachineModel::default());
    st.insert(Symbol::static_variable("o", "o", Type::c_int(), Location::none()));
    st.insert(Symbol::static_variable("x", "x", Type::c_int(), Location::none()));
    st
}

/// `p` may point to `o`, to nothing, or be `NULL`; `q` points to a heap object.
fn value_sets(_: ProgramPoint, pointer: &Expr) -> Vec<ValueSetEntry> {
    let heap = ObjectDescriptor::new(int("malloc::heap"));
    match pointer.symbol_identifier() {
        Some(p) if p == "q" => vec![ValueSetEntry::Dynamic { object: heap, freed: true }],
        _ => vec![
            ValueSetEntry::Null,
            ValueSetEntry::Invalid,
            ValueSetEntry::Object(ObjectDescriptor::new(int("o"))),
        ],
    }
}

fn only_o(_: ProgramPoint, _: &Expr) -> Vec<ValueSetEntry> {
    vec![ValueSetEntry::Object(ObjectDescriptor::new(int("o")))]
}

fn sample_program() -> GotoProgram {
    let deref = int_ptr("p").dereference();
    let mut program = GotoProgram::new(vec![
        Instruction::decl(int("x"), loc(1)),
        Instruction::assign(int("x"), deref.clone(), loc(2)),
        Instruction::assign(deref.clone(), deref.clone().plus(deref.clone()), loc(3)),
        Instruction::assertion(deref.clone().gt(zero()), loc(4)),
        Instruction::free(int_ptr("q"), loc(5)),
        Instruction::ret(None, loc(6)),
    ]);
    program.compute_location_numbers(0);
    program
}

#[test]
fn checks_only_is_idempotent() {
    init_tracing();
    let st = symbol_table();
    let options = PassOptions::default();
    let program = sample_program();
    let first = pointer_checks(&program, &st, &options, &value_sets).unwrap();
    let second = pointer_checks(&program, &st, &options, &value_sets).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(program, sample_program());
}

#[test]
fn checks_only_matches_rewriting() {
    let st = symbol_table();
    let options = PassOptions::default();
    let checks = pointer_checks(&sample_program(), &st, &options, &value_sets).unwrap();
    let mut program = sample_program();
    remove_pointers(&mut program, &st, &options, &value_sets).unwrap();
    let inserted: Vec<_> = program
        .iter()
        .filter(|ins| ins.location().property_class().is_some())
        .cloned()
        .collect();
    assert_eq!(inserted, checks);
    assert!(program.iter().all(|ins| !ins.guard.has_dereference()));
}

#[test]
fn no_duplicate_assertions_per_instruction() {
    let st = symbol_table();
    let options = PassOptions::default();
    let checks = pointer_checks(&sample_program(), &st, &options, &value_sets).unwrap();
    let mut seen = HashSet::new();
    for check in &checks {
        assert!(
            seen.insert((check.location_number, check.guard.clone())),
            "duplicate assertion {check:?}"
        );
    }
}

#[test]
fn address_of_dereference_cancels() {
    let st = symbol_table();
    let options = PassOptions::default();
    for x in [int_ptr("p"), int_ptr("p").plus(Expr::int_constant(1, Type::c_int()))] {
        let mut e = x.clone().dereference().address_of();
        let point = ProgramPoint::new(None, 0);
        let checks =
            dereference(point, &BTreeSet::new(), &mut e, &st, &options, &value_sets).unwrap();
        assert_eq!(e, x);
        assert!(checks.is_empty());
    }
}

#[test]
fn dereference_under_a_condition() {
    let st = symbol_table();
    let options = PassOptions::default();
    let p = int_ptr("p");
    let mut e = p.clone().is_nonnull().ternary(p.clone().dereference(), zero());
    let checks =
        dereference(ProgramPoint::new(None, 0), &BTreeSet::new(), &mut e, &st, &options, &only_o)
            .unwrap();
    assert_eq!(e, p.clone().is_nonnull().ternary(int("o"), zero()));
    assert_eq!(checks.len(), 1);
    let size = Expr::int_constant(4, Type::size_t());
    assert_eq!(checks[0].guard, p.clone().is_nonnull().not().or(p.r_ok(size)));
}

#[test]
fn double_free() {
    let st = symbol_table();
    let options = PassOptions::default();
    let free = Instruction::free(int_ptr("q"), loc(5));
    let mut program = GotoProgram::new(vec![free.clone()]);
    remove_pointers(&mut program, &st, &options, &value_sets).unwrap();

    assert_eq!(program.len(), 2);
    let assertion = &program.instructions[0];
    assert!(assertion.is_assert());
    assert_eq!(assertion.location().property_class().unwrap(), "invalid pointer freed");
    assert!(assertion.location().comment().unwrap().map(|c| c.contains("double free")));
    assert_eq!(program.instructions[1], free);
}

#[test]
fn malformed_ir_stops_the_pass() {
    let st = symbol_table();
    let options = PassOptions::default();
    let bad_and = Expr::new_unchecked(
        ExprValue::BinOp {
            op: goto_ir::goto_program::BinaryOperator::And,
            lhs: int("x"),
            rhs: int_ptr("p").dereference().gt(zero()),
        },
        Type::bool(),
    );
    let mut program = GotoProgram::new(vec![
        Instruction::assertion(int_ptr("p").dereference().gt(zero()), loc(1)),
        Instruction::expression(bad_and, loc(2)),
    ]);
    let result = remove_pointers(&mut program, &st, &options, &value_sets);
    assert!(matches!(result, Err(MalformedIr::NonBooleanOperand { operator: "and", .. })));
}

#[test]
fn unused_assignment_is_sliced() {
    init_tracing();
    let one = Expr::int_constant(1, Type::c_int());
    let two = Expr::int_constant(2, Type::c_int());
    let mut steps = vec![
        SsaStep::assignment(int("x#1"), one),
        SsaStep::assignment(int("y#1"), two),
        SsaStep::assert(int("x#1").gt(zero()), "x > 0"),
    ];
    let mut slicer = SymexSlice::new(&PassOptions::default());
    slicer.run(&mut steps);
    let ignored: Vec<bool> = steps.iter().map(|s| s.ignored).collect();
    assert_eq!(ignored, [false, true, false]);
    assert_eq!(slicer.ignored(), 1);
}

/// Traces mixing guarded assignments, renumbering, assumptions and assertions.
fn traces() -> Vec<Vec<SsaStep>> {
    let c = |i: i64| Expr::int_constant(i, Type::c_int());
    let g = Expr::symbol_expression("g#1", Type::bool());
    vec![
        vec![
            SsaStep::assignment(int("a#1"), c(1)),
            SsaStep::assignment(int("b#1"), int("a#1").plus(c(2))),
            SsaStep::assignment(int("u#1"), int("b#1")),
            SsaStep::assert(int("b#1").gt(zero()), "b"),
            SsaStep::assignment(int("a#2"), int("u#1")),
        ],
        vec![
            SsaStep::assignment(g.clone(), int("a#1").gt(zero())),
            SsaStep::renumber(int("a#1")),
            SsaStep::assignment(int("x#1"), c(3)).with_guard(g.clone()),
            SsaStep::assume(int("x#1").lt(c(10))),
            SsaStep::assignment(int("y#1"), int("x#1")),
            SsaStep::assert(int("y#1").ge(zero()), "y").with_guard(g),
            SsaStep::renumber(int("z#1")),
        ],
        vec![SsaStep::assignment(int("a#1"), c(1)), SsaStep::assignment(int("b#1"), c(1))],
    ]
}

#[test]
fn dependency_set_only_grows_and_kept_steps_are_needed() {
    for mut steps in traces() {
        let mut slicer = SymexSlice::new(&PassOptions::default());
        for step in steps.iter_mut().rev() {
            let before = slicer.depends().clone();
            let defined: Option<InternedString> = step.defined_symbol();
            slicer.run_on_step(step);
            assert!(before.is_subset(slicer.depends()));
            if let Some(lhs) = defined
                && !step.ignored
            {
                assert!(before.contains(&lhs), "kept {step:?} defines an unneeded symbol");
            }
            if step.ignored {
                assert!(!matches!(step.kind, SsaStepKind::Assert { .. }));
            }
        }
    }
}

#[test]
fn simple_slice_bound() {
    for mut steps in traces() {
        let tail = match steps.iter().rposition(SsaStep::is_assert) {
            Some(last) => steps.len() - last - 1,
            None => 0,
        };
        let mut slicer = SimpleSlice::new();
        slicer.run(&mut steps);
        assert!(slicer.ignored() >= tail as u64);
        if tail == 0 {
            assert_eq!(slicer.ignored(), 0);
        }
        let body = &steps[..steps.len() - tail];
        assert!(body.iter().all(|s| !s.ignored));
    }
}

#[test]
fn slicing_is_stable() {
    for mut steps in traces() {
        let mut slicer = SymexSlice::new(&PassOptions::default());
        slicer.run(&mut steps);
        let once = steps.clone();
        assert!(!slicer.run(&mut steps));
        assert_eq!(steps, once);
    }
}

#[test]
fn goto_targets_survive_instrumentation() {
    let st = symbol_table();
    let options = PassOptions::default();
    let mut program = GotoProgram::new(vec![
        Instruction::goto(Expr::bool_true(), 1, loc(1)),
        Instruction::assign(int("x"), int_ptr("p").dereference(), loc(2)),
        Instruction::skip(loc(3)),
    ]);
    program.compute_location_numbers(0);
    remove_pointers(&mut program, &st, &options, &value_sets).unwrap();
    let InstructionBody::Goto { target } = program.instructions[0].body() else {
        panic!("expected the goto");
    };
    let destination = program.iter().find(|ins| ins.location_number == *target).unwrap();
    // The assertions for the instruction at the target share its number and come first.
    assert!(destination.is_assert());
}
