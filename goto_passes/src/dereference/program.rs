// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Driving the dereference pass over instructions, programs and whole function maps.

use super::{DerefContext, GotoProgramDereference, Mode};
use crate::error::{MalformedIr, Result};
use crate::guard::Guard;
use crate::options::PassOptions;
use crate::value_set::{ProgramPoint, ValueSets};
use goto_ir::InternedString;
use goto_ir::goto_program::{
    Expr, GotoFunctions, GotoProgram, Instruction, InstructionBody, OtherStatement, SymbolTable,
    Type,
};
use std::collections::BTreeSet;
use tracing::debug;

impl GotoProgramDereference<'_> {
    /// Resolve the dereferences in `expr`, accessed in `mode`. In checks-only mode a copy is
    /// resolved and `expr` is left alone.
    pub fn dereference_expr(
        &mut self,
        expr: &mut Expr,
        ctx: &DerefContext,
        checks_only: bool,
        mode: Mode,
    ) -> Result<()> {
        if !expr.has_dereference() {
            return Ok(());
        }
        let resolved = self.dereference_rec(expr.clone(), &mut Guard::new(), mode, ctx)?;
        if !checks_only {
            *expr = resolved;
        }
        Ok(())
    }

    /// Resolve every expression of `ins`. The assertions are collected in the pass and can be
    /// taken with [GotoProgramDereference::take_new_code].
    pub fn dereference_instruction(
        &mut self,
        ins: &mut Instruction,
        function: Option<InternedString>,
        checks_only: bool,
    ) -> Result<()> {
        let locals = ins.local_variables.clone();
        let ctx = DerefContext {
            point: ProgramPoint::new(function, ins.location_number),
            location: ins.location,
            valid_locals: &locals,
        };

        // For assert, assume and goto, this is the condition.
        self.dereference_expr(&mut ins.guard, &ctx, checks_only, Mode::Read)?;

        match &mut ins.body {
            InstructionBody::Assign { lhs, rhs } => {
                self.dereference_expr(lhs, &ctx, checks_only, Mode::Write)?;
                self.dereference_expr(rhs, &ctx, checks_only, Mode::Read)?;
            }
            InstructionBody::FunctionCall { lhs, function, arguments } => {
                if let Some(lhs) = lhs {
                    self.dereference_expr(lhs, &ctx, checks_only, Mode::Write)?;
                }
                if let Some(fp) = function.dereference_operand() {
                    self.check_function_pointer(fp, &ctx)?;
                }
                for argument in arguments {
                    self.dereference_expr(argument, &ctx, checks_only, Mode::Read)?;
                }
            }
            InstructionBody::Return(Some(e))
            | InstructionBody::Other(OtherStatement::Expression(e)) => {
                self.dereference_expr(e, &ctx, checks_only, Mode::Read)?;
            }
            InstructionBody::Other(OtherStatement::Printf(arguments)) => {
                for argument in arguments {
                    self.dereference_expr(argument, &ctx, checks_only, Mode::Read)?;
                }
            }
            InstructionBody::Other(OtherStatement::Free(pointer)) => {
                let freed = if pointer.has_dereference() {
                    self.dereference_rec(pointer.clone(), &mut Guard::new(), Mode::Read, &ctx)?
                } else {
                    pointer.clone()
                };
                if !checks_only {
                    *pointer = freed.clone();
                }
                let typ = freed.typ().base_type().cloned().unwrap_or_else(Type::empty);
                let site = *freed.location();
                self.dereference_pointer(freed, typ, site, &mut Guard::new(), Mode::Free, &ctx)?;
            }
            InstructionBody::Return(None)
            | InstructionBody::Other(OtherStatement::Decl(_))
            | InstructionBody::Assert
            | InstructionBody::Assume
            | InstructionBody::Goto { .. }
            | InstructionBody::Skip => {}
        }
        Ok(())
    }

    /// A call through `*fp` needs `fp` to be a valid pointer.
    fn check_function_pointer(&mut self, fp: &Expr, ctx: &DerefContext) -> Result<()> {
        if !fp.typ().is_pointer() {
            let operand = fp.clone();
            return Err(MalformedIr::NonPointerOperand { operator: "function call", operand });
        }
        let mut guard = Guard::new();
        guard.add(fp.clone().is_invalid_pointer())?;
        let site = if fp.location().is_none() { ctx.location } else { *fp.location() };
        self.dereference_failure("function pointer dereference", "invalid pointer", &guard, site);
        Ok(())
    }

    /// Process every instruction of `program`, inserting the assertions for each one right
    /// before it. The inserted assertions share the location number and the local variables
    /// of the instruction they check.
    pub fn dereference_program(
        &mut self,
        function: Option<InternedString>,
        program: &mut GotoProgram,
        checks_only: bool,
    ) -> Result<()> {
        let mut index = 0;
        let mut inserted = 0;
        while index < program.len() {
            self.reset();
            let ins = &mut program.instructions[index];
            self.dereference_instruction(ins, function, checks_only)?;
            let new_code = self.annotate(ins);
            inserted += new_code.len();
            index = program.insert_before(index, new_code) + 1;
        }
        debug!(?function, inserted, checks_only, "dereferenced program");
        Ok(())
    }

    pub fn dereference_functions(
        &mut self,
        functions: &mut GotoFunctions,
        checks_only: bool,
    ) -> Result<()> {
        for (name, function) in functions.function_map.iter_mut() {
            self.dereference_program(Some(*name), &mut function.body, checks_only)?;
        }
        Ok(())
    }

    /// The assertions `program` needs, without changing it.
    fn collect_checks(
        &mut self,
        function: Option<InternedString>,
        program: &GotoProgram,
        checks: &mut Vec<Instruction>,
    ) -> Result<()> {
        for ins in program {
            self.reset();
            let mut copy = ins.clone();
            self.dereference_instruction(&mut copy, function, true)?;
            checks.extend(self.annotate(&copy));
        }
        Ok(())
    }

    /// Resolve a standalone expression in place, read access. The assertions are taken
    /// from the pass afterwards.
    pub fn dereference_expression(&mut self, ctx: &DerefContext, expr: &mut Expr) -> Result<()> {
        self.reset();
        self.dereference_expr(expr, ctx, false, Mode::Read)
    }

    /// Take the emitted assertions, stamped with the program position of `ins`.
    fn annotate(&mut self, ins: &Instruction) -> Vec<Instruction> {
        self.take_new_code()
            .into_iter()
            .map(|assertion| {
                assertion
                    .with_local_variables(ins.local_variables.clone())
                    .with_location_number(ins.location_number)
            })
            .collect()
    }
}

/// Replace every dereference in `program` by the accessed objects, and insert the assertions
/// that check these accesses.
pub fn remove_pointers(
    program: &mut GotoProgram,
    symbol_table: &SymbolTable,
    options: &PassOptions,
    value_sets: &dyn ValueSets,
) -> Result<()> {
    GotoProgramDereference::new(symbol_table, options, value_sets)
        .dereference_program(None, program, false)
}

/// [remove_pointers] for every function.
pub fn remove_pointers_from_functions(
    functions: &mut GotoFunctions,
    symbol_table: &SymbolTable,
    options: &PassOptions,
    value_sets: &dyn ValueSets,
) -> Result<()> {
    GotoProgramDereference::new(symbol_table, options, value_sets)
        .dereference_functions(functions, false)
}

/// The assertions [remove_pointers] would insert into `program`, in program order.
/// `program` itself is not modified.
pub fn pointer_checks(
    program: &GotoProgram,
    symbol_table: &SymbolTable,
    options: &PassOptions,
    value_sets: &dyn ValueSets,
) -> Result<Vec<Instruction>> {
    let mut checks = Vec::new();
    GotoProgramDereference::new(symbol_table, options, value_sets)
        .collect_checks(None, program, &mut checks)?;
    Ok(checks)
}

/// [pointer_checks] for every function.
pub fn pointer_checks_for_functions(
    functions: &GotoFunctions,
    symbol_table: &SymbolTable,
    options: &PassOptions,
    value_sets: &dyn ValueSets,
) -> Result<Vec<Instruction>> {
    let mut pass = GotoProgramDereference::new(symbol_table, options, value_sets);
    let mut checks = Vec::new();
    for (name, function) in functions.iter() {
        pass.collect_checks(Some(*name), &function.body, &mut checks)?;
    }
    Ok(checks)
}

/// Resolve the dereferences of one expression evaluated at `point`, where `valid_locals` are
/// in scope. Returns the assertions that check the accesses.
pub fn dereference(
    point: ProgramPoint,
    valid_locals: &BTreeSet<InternedString>,
    expr: &mut Expr,
    symbol_table: &SymbolTable,
    options: &PassOptions,
    value_sets: &dyn ValueSets,
) -> Result<Vec<Instruction>> {
    let ctx = DerefContext { point, location: *expr.location(), valid_locals };
    let mut pass = GotoProgramDereference::new(symbol_table, options, value_sets);
    pass.dereference_expression(&ctx, expr)?;
    Ok(pass.take_new_code())
}
