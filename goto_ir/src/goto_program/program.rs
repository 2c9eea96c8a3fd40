// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use super::{Instruction, Type};
use crate::InternedString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sequence of instructions, executed in order unless a `Goto` says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoProgram {
    pub instructions: Vec<Instruction>,
}

/// A function: its signature and its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoFunction {
    pub typ: Type,
    pub body: GotoProgram,
}

/// All functions of a program, keyed by their symbol name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoFunctions {
    pub function_map: BTreeMap<InternedString, GotoFunction>,
}

impl GotoProgram {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        GotoProgram { instructions }
    }

    /// Insert `new` immediately before position `index`. Returns the new index of the
    /// instruction that was at `index`.
    pub fn insert_before(&mut self, index: usize, new: Vec<Instruction>) -> usize {
        let count = new.len();
        self.instructions.splice(index..index, new);
        index + count
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number the instructions consecutively, starting at `first`. Returns the next free number.
    pub fn compute_location_numbers(&mut self, first: usize) -> usize {
        let mut next = first;
        for ins in &mut self.instructions {
            ins.location_number = next;
            next += 1;
        }
        next
    }
}

impl<'a> IntoIterator for &'a GotoProgram {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl GotoFunction {
    pub fn new(typ: Type, body: GotoProgram) -> Self {
        assert!(typ.is_code(), "Function of non-code type {typ:?}");
        GotoFunction { typ, body }
    }
}

impl GotoFunctions {
    pub fn new() -> Self {
        GotoFunctions::default()
    }

    pub fn insert<T: Into<InternedString>>(&mut self, name: T, function: GotoFunction) {
        self.function_map.insert(name.into(), function);
    }

    pub fn get<T: Into<InternedString>>(&self, name: T) -> Option<&GotoFunction> {
        self.function_map.get(&name.into())
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, InternedString, GotoFunction> {
        self.function_map.iter()
    }

    /// Number the instructions of all functions, so that every location number is unique.
    pub fn compute_location_numbers(&mut self) {
        let mut next = 0;
        for function in self.function_map.values_mut() {
            next = function.body.compute_location_numbers(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Expr, Location};
    use super::*;

    fn skip() -> Instruction {
        Instruction::skip(Location::none())
    }

    #[test]
    fn insert_before_shifts_cursor() {
        let mut prog = GotoProgram::new(vec![skip(), skip()]);
        prog.compute_location_numbers(10);
        let cond = Expr::bool_false();
        let check = Instruction::assertion(cond.clone(), Location::none());
        let next = prog.insert_before(1, vec![check]);
        assert_eq!(next, 2);
        assert_eq!(prog.len(), 3);
        assert!(prog.instructions[1].is_assert());
        assert_eq!(prog.instructions[2].location_number, 11);
    }

    #[test]
    fn location_numbers_are_unique_across_functions() {
        let mut fns = GotoFunctions::new();
        let typ = Type::code_with_unnamed_parameters(vec![], Type::empty());
        fns.insert("f", GotoFunction::new(typ.clone(), GotoProgram::new(vec![skip(), skip()])));
        fns.insert("g", GotoFunction::new(typ, GotoProgram::new(vec![skip()])));
        fns.compute_location_numbers();
        let numbers: Vec<usize> =
            fns.iter().flat_map(|(_, f)| f.body.iter().map(|i| i.location_number)).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
    }
}
