// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use self::InstructionBody::*;
use super::{Expr, Location};
use crate::InternedString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

///////////////////////////////////////////////////////////////////////////////////////////////
/// Datatypes
///////////////////////////////////////////////////////////////////////////////////////////////

/// One instruction of a GOTO program, based off CBMC's `goto_programt::instructiont`.
///
/// `guard` is the condition under which the instruction executes. For `Assert`, `Assume` and
/// `Goto`, it is the asserted/assumed/branch condition instead, as in CBMC.
///
/// `local_variables` is the set of local variables that are declared and in scope at this
/// instruction. It is computed by the front end and shared by consecutive instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub body: InstructionBody,
    pub guard: Expr,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub location_number: usize,
    #[serde(default)]
    pub local_variables: Arc<BTreeSet<InternedString>>,
}

/// The kinds of GOTO instructions.
/// The names are chosen to map onto CBMC's `goto_program_instruction_typet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionBody {
    /// `lhs = rhs;`
    Assign { lhs: Expr, rhs: Expr },
    /// `lhs = function(arguments);`
    FunctionCall { lhs: Option<Expr>, function: Expr, arguments: Vec<Expr> },
    /// `return e;`
    Return(Option<Expr>),
    /// `assert(guard);`
    Assert,
    /// `__CPROVER_assume(guard);`
    Assume,
    /// `if (guard) goto target;`. `target` is the location number of the destination.
    Goto { target: usize },
    /// `;`
    Skip,
    /// Statements CBMC files under `OTHER`.
    Other(OtherStatement),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtherStatement {
    /// `typ x;`. The operand is the declared symbol.
    Decl(Expr),
    /// `e;`
    Expression(Expr),
    /// `printf(args...)`
    Printf(Vec<Expr>),
    /// `free(e)`
    Free(Expr),
}

///////////////////////////////////////////////////////////////////////////////////////////////
/// Implementations
///////////////////////////////////////////////////////////////////////////////////////////////

/// Getters
impl Instruction {
    pub fn body(&self) -> &InstructionBody {
        &self.body
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_assert(&self) -> bool {
        match self.body {
            Assert => true,
            _ => false,
        }
    }

    pub fn is_assume(&self) -> bool {
        match self.body {
            Assume => true,
            _ => false,
        }
    }
}

/// Constructors
impl Instruction {
    /// An unguarded instruction.
    pub fn new(body: InstructionBody, location: Location) -> Self {
        Instruction {
            body,
            guard: Expr::bool_true(),
            location,
            location_number: 0,
            local_variables: Arc::default(),
        }
    }

    /// `lhs = rhs;`
    pub fn assign(lhs: Expr, rhs: Expr, loc: Location) -> Self {
        assert_eq!(lhs.typ(), rhs.typ(), "Assignment does not typecheck {lhs:?} = {rhs:?}");
        Instruction::new(Assign { lhs, rhs }, loc)
    }

    /// `assert(cond);`
    pub fn assertion(cond: Expr, loc: Location) -> Self {
        Instruction::new(Assert, loc).with_guard(cond)
    }

    /// `__CPROVER_assume(cond);`
    pub fn assume(cond: Expr, loc: Location) -> Self {
        Instruction::new(Assume, loc).with_guard(cond)
    }

    /// `typ x;`
    pub fn decl(symbol: Expr, loc: Location) -> Self {
        assert!(symbol.is_symbol(), "Declaration of a non-symbol {symbol:?}");
        Instruction::new(Other(OtherStatement::Decl(symbol)), loc)
    }

    /// `e;`
    pub fn expression(e: Expr, loc: Location) -> Self {
        Instruction::new(Other(OtherStatement::Expression(e)), loc)
    }

    /// `free(e);`
    pub fn free(e: Expr, loc: Location) -> Self {
        assert!(e.typ().is_pointer(), "free() of a non-pointer {e:?}");
        Instruction::new(Other(OtherStatement::Free(e)), loc)
    }

    /// `lhs = function(arguments);`. `function` is either a function symbol or `*fp`.
    pub fn function_call(
        lhs: Option<Expr>,
        function: Expr,
        arguments: Vec<Expr>,
        loc: Location,
    ) -> Self {
        assert!(function.typ().is_code(), "Call of a non-function {function:?}");
        Instruction::new(FunctionCall { lhs, function, arguments }, loc)
    }

    /// `if (cond) goto target;`
    pub fn goto(cond: Expr, target: usize, loc: Location) -> Self {
        Instruction::new(Goto { target }, loc).with_guard(cond)
    }

    /// `printf(args...)`
    pub fn printf(args: Vec<Expr>, loc: Location) -> Self {
        Instruction::new(Other(OtherStatement::Printf(args)), loc)
    }

    /// `return e;`
    pub fn ret(e: Option<Expr>, loc: Location) -> Self {
        Instruction::new(Return(e), loc)
    }

    /// `;`
    pub fn skip(loc: Location) -> Self {
        Instruction::new(Skip, loc)
    }
}

/// Setters
impl Instruction {
    pub fn with_guard(mut self, guard: Expr) -> Self {
        assert!(guard.typ().is_bool(), "Instruction guard must be a boolean {guard:?}");
        self.guard = guard;
        self
    }

    pub fn with_local_variables(mut self, locals: Arc<BTreeSet<InternedString>>) -> Self {
        self.local_variables = locals;
        self
    }

    pub fn with_location_number(mut self, n: usize) -> Self {
        self.location_number = n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::super::Type;
    use super::*;

    #[test]
    fn assertions_carry_condition_in_guard() {
        let p = Expr::symbol_expression("p", Type::c_int().to_pointer());
        let ins = Instruction::assertion(p.clone().is_nonnull(), Location::none());
        assert!(ins.is_assert());
        assert_eq!(ins.guard, p.is_nonnull());
    }

    #[test]
    fn plain_instructions_are_unguarded() {
        let x = Expr::symbol_expression("x", Type::c_int());
        let ins = Instruction::assign(x, Type::c_int().zero(), Location::none());
        assert!(ins.guard.is_true());
        assert!(ins.local_variables.is_empty());
    }
}
