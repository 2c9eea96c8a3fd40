// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The interface to a points-to analysis.
//!
//! The dereference pass does not compute value sets itself. It asks a [ValueSets] oracle what
//! a pointer expression may point to at a given instruction.

use goto_ir::InternedString;
use goto_ir::goto_program::Expr;
use num::BigInt;

/// An instruction of a GOTO program: the function it belongs to and its location number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramPoint {
    pub function: Option<InternedString>,
    pub location_number: usize,
}

impl ProgramPoint {
    pub fn new(function: Option<InternedString>, location_number: usize) -> Self {
        ProgramPoint { function, location_number }
    }
}

/// An object a pointer may point into, together with the offset into it when that is a known
/// constant (in bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectDescriptor {
    /// An addressable expression: a symbol, a member or index of one, or a string literal.
    pub object: Expr,
    pub offset: Option<BigInt>,
}

impl ObjectDescriptor {
    pub fn new(object: Expr) -> Self {
        ObjectDescriptor { object, offset: Some(BigInt::from(0)) }
    }

    pub fn with_offset(mut self, offset: Option<BigInt>) -> Self {
        self.offset = offset;
        self
    }

    /// The offset is known to be zero.
    pub fn is_at_start(&self) -> bool {
        self.offset.as_ref().is_some_and(|o| *o == BigInt::from(0))
    }
}

/// One possible target of a pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueSetEntry {
    /// `NULL`
    Null,
    /// A pointer that was never valid, e.g. an uninitialized one or an integer cast to a pointer.
    Invalid,
    /// The analysis lost track of the target.
    Unknown,
    /// A declared object: a variable, a constant, a string literal.
    Object(ObjectDescriptor),
    /// A heap object, and whether it may already have been freed at this point.
    Dynamic { object: ObjectDescriptor, freed: bool },
}

/// A points-to oracle.
pub trait ValueSets {
    /// The possible targets of `pointer` when the instruction at `point` executes.
    /// An empty result means no valid target is known.
    fn get_values(&self, point: ProgramPoint, pointer: &Expr) -> Vec<ValueSetEntry>;
}

impl<F> ValueSets for F
where
    F: Fn(ProgramPoint, &Expr) -> Vec<ValueSetEntry>,
{
    fn get_values(&self, point: ProgramPoint, pointer: &Expr) -> Vec<ValueSetEntry> {
        self(point, pointer)
    }
}
