// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The recursive walk over an expression tree.

use super::{DerefContext, GotoProgramDereference, Mode};
use crate::error::{MalformedIr, Result};
use crate::guard::Guard;
use goto_ir::goto_program::BinaryOperator::{And, Or};
use goto_ir::goto_program::ExprValue::{
    AddressOf, BinOp, ByteExtract, Dereference, If, ImplicitDereference, Index, Member, Typecast,
};
use goto_ir::goto_program::{BinaryOperator, Expr};

impl GotoProgramDereference<'_> {
    /// Replace every dereference in `expr` by the objects it may access, emitting the
    /// assertions that make the access safe under `guard`.
    ///
    /// `guard` has the same length on return as on entry, also on error.
    pub(super) fn dereference_rec(
        &mut self,
        expr: Expr,
        guard: &mut Guard,
        mode: Mode,
        ctx: &DerefContext,
    ) -> Result<Expr> {
        if !expr.has_dereference() {
            return Ok(expr);
        }
        match expr.into_parts() {
            (BinOp { op: op @ (And | Or), lhs, rhs }, typ, location) => {
                let operator = if op == And { "and" } else { "or" };
                if !typ.is_bool() {
                    let expr = Expr::new_unchecked(BinOp { op, lhs, rhs }, typ);
                    return Err(MalformedIr::NonBooleanOperator {
                        operator,
                        expr: expr.with_location(location),
                    });
                }
                for operand in [&lhs, &rhs] {
                    if !operand.typ().is_bool() {
                        return Err(MalformedIr::NonBooleanOperand {
                            operator,
                            operand: operand.clone(),
                        });
                    }
                }
                let saved = guard.len();
                let result = self.dereference_junction(op, lhs, rhs, guard, ctx);
                guard.truncate(saved);
                let (lhs, rhs) = result?;
                Ok(Expr::new_unchecked(BinOp { op, lhs, rhs }, typ).with_location(location))
            }
            (If { c, t, e }, typ, location) => {
                if !c.typ().is_bool() {
                    return Err(MalformedIr::NonBooleanCondition(c));
                }
                let c = self.dereference_rec(c, guard, Mode::Read, ctx)?;
                let t = self.dereference_branch(t, c.clone(), guard, mode, ctx)?;
                let e = self.dereference_branch(e, c.clone().not(), guard, mode, ctx)?;
                Ok(Expr::new_unchecked(If { c, t, e }, typ).with_location(location))
            }
            (AddressOf(inner), typ, location) if inner.dereference_operand().is_some() => {
                // `&*p` is `p`, and accesses nothing.
                let (value, ..) = inner.into_parts();
                let (Dereference(pointer) | ImplicitDereference(pointer)) = value else {
                    unreachable!("checked to be a dereference above")
                };
                if !pointer.typ().is_pointer() || !typ.is_pointer() {
                    return Err(MalformedIr::NonPointerOperand {
                        operator: "address_of",
                        operand: pointer,
                    });
                }
                let pointer = if *pointer.typ() == typ {
                    pointer
                } else {
                    Expr::new_unchecked(Typecast(pointer), typ).with_location(location)
                };
                self.dereference_rec(pointer, guard, mode, ctx)
            }
            (value, typ, location) => {
                let node = Expr::new_unchecked(value, typ).with_location(location);
                let modes = operand_modes(&node, mode);
                let mut index = 0;
                let node = node.map_operands(|operand| {
                    let operand_mode = modes.get(index).copied().unwrap_or(Mode::Read);
                    index += 1;
                    self.dereference_rec(operand, guard, operand_mode, ctx)
                })?;
                self.dereference_node(node, guard, mode, ctx)
            }
        }
    }

    /// `lhs && rhs` or `lhs || rhs`: `rhs` is only evaluated when `lhs` is true (resp. false).
    fn dereference_junction(
        &mut self,
        op: BinaryOperator,
        lhs: Expr,
        rhs: Expr,
        guard: &mut Guard,
        ctx: &DerefContext,
    ) -> Result<(Expr, Expr)> {
        let lhs = self.dereference_rec(lhs, guard, Mode::Read, ctx)?;
        guard.add(if op == And { lhs.clone() } else { lhs.clone().not() })?;
        let rhs = self.dereference_rec(rhs, guard, Mode::Read, ctx)?;
        Ok((lhs, rhs))
    }

    /// A branch of `c ? t : e`, resolved under the extra condition `cond`.
    fn dereference_branch(
        &mut self,
        branch: Expr,
        cond: Expr,
        guard: &mut Guard,
        mode: Mode,
        ctx: &DerefContext,
    ) -> Result<Expr> {
        if !branch.has_dereference() {
            return Ok(branch);
        }
        let saved = guard.len();
        let result = guard.add(cond).and_then(|()| self.dereference_rec(branch, guard, mode, ctx));
        guard.truncate(saved);
        result
    }

    /// Resolve `node` itself once its operands have been resolved.
    fn dereference_node(
        &mut self,
        node: Expr,
        guard: &mut Guard,
        mode: Mode,
        ctx: &DerefContext,
    ) -> Result<Expr> {
        match node.into_parts() {
            (Dereference(pointer) | ImplicitDereference(pointer), typ, location) => {
                self.dereference_pointer(pointer, typ, location, guard, mode, ctx)
            }
            (Index { array, index }, typ, location) if array.typ().is_pointer() => {
                if !index.typ().is_integer() {
                    return Err(MalformedIr::NonIntegerIndex(index));
                }
                // `p[i]` is `*(p + i)`
                self.dereference_pointer(array.plus(index), typ, location, guard, mode, ctx)
            }
            (value, typ, location) => Ok(Expr::new_unchecked(value, typ).with_location(location)),
        }
    }
}

/// The access mode of each operand of `node`, left to right, when `node` is accessed in `mode`.
///
/// Only the operands that designate the accessed object inherit the mode: in `a[i] = 0`, the
/// array is written but the index is only read.
fn operand_modes(node: &Expr, mode: Mode) -> Vec<Mode> {
    match node.value() {
        Member { .. } | Typecast(_) | AddressOf(_) => vec![mode],
        Index { array, .. } if !array.typ().is_pointer() => vec![mode, Mode::Read],
        ByteExtract { .. } => vec![mode, Mode::Read],
        _ => Vec::new(),
    }
}
