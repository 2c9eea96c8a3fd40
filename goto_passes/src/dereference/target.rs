// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Dereferencing a single pointer through the value-set oracle.

use super::{DerefContext, GotoProgramDereference, Mode};
use crate::error::{MalformedIr, Result};
use crate::guard::Guard;
use crate::value_set::{ObjectDescriptor, ValueSetEntry};
use goto_ir::goto_program::{Expr, Location, Type};
use num::{BigInt, Zero};
use tracing::trace;

/// The object an access evaluates to when the pointer has no valid target.
/// Every such access is also covered by a failing assertion.
pub const INVALID_OBJECT: &str = "__invalid_object";

impl GotoProgramDereference<'_> {
    /// `*pointer`, accessed as a `typ` in `mode`.
    ///
    /// Returns the access expression: a case split over the valid targets of `pointer`.
    /// In [Mode::Free] nothing is accessed and `pointer` itself is returned.
    pub(super) fn dereference_pointer(
        &mut self,
        pointer: Expr,
        typ: Type,
        site: Location,
        guard: &mut Guard,
        mode: Mode,
        ctx: &DerefContext,
    ) -> Result<Expr> {
        if !pointer.typ().is_pointer() {
            let operand = pointer;
            return Err(MalformedIr::NonPointerOperand { operator: "dereference", operand });
        }
        let site = if site.is_none() { ctx.location } else { site };
        let entries = self.value_sets.get_values(ctx.point, &pointer);
        trace!(?pointer, ?mode, targets = entries.len(), "dereference");

        let mut candidates: Vec<ObjectDescriptor> = Vec::new();
        for entry in entries {
            let candidate = self.check_target(entry, &pointer, guard, mode, site, ctx)?;
            if let Some(candidate) = candidate
                && !candidates.contains(&candidate)
            {
                candidates.push(candidate);
            }
        }

        if mode == Mode::Free {
            return Ok(pointer);
        }
        let mut candidates = candidates.into_iter().rev();
        let Some(last) = candidates.next() else {
            return Ok(Expr::symbol_expression(INVALID_OBJECT, typ).with_location(site));
        };
        self.bounds_check(&pointer, &typ, guard, mode, site)?;

        let innermost = self.access(last, &pointer, &typ);
        let value = candidates.fold(innermost, |rest, candidate| {
            let same = pointer.clone().same_object(candidate.object.clone().address_of());
            same.ternary(self.access(candidate, &pointer, &typ), rest)
        });
        Ok(value.with_location(site))
    }

    /// Emit the assertions for one possible target of `pointer`, and return it if the access
    /// may go ahead.
    fn check_target(
        &mut self,
        entry: ValueSetEntry,
        pointer: &Expr,
        guard: &mut Guard,
        mode: Mode,
        site: Location,
        ctx: &DerefContext,
    ) -> Result<Option<ObjectDescriptor>> {
        match entry {
            ValueSetEntry::Null => {
                if mode != Mode::Free {
                    let cond = pointer.clone().is_null();
                    self.failure_under("pointer dereference", "NULL pointer", cond, guard, site)?;
                }
                Ok(None)
            }
            ValueSetEntry::Invalid => {
                self.invalid_pointer(pointer, guard, mode, site)?;
                Ok(None)
            }
            ValueSetEntry::Unknown => match self.failed_symbol(pointer) {
                Some(object) => Ok(Some(ObjectDescriptor::new(object).with_offset(None))),
                None => {
                    self.invalid_pointer(pointer, guard, mode, site)?;
                    Ok(None)
                }
            },
            ValueSetEntry::Object(descriptor) => {
                self.check_object(descriptor, pointer, guard, mode, site, ctx)
            }
            ValueSetEntry::Dynamic { object, freed } => {
                self.check_dynamic(object, freed, pointer, guard, mode, site)
            }
        }
    }

    fn invalid_pointer(
        &mut self,
        pointer: &Expr,
        guard: &mut Guard,
        mode: Mode,
        site: Location,
    ) -> Result<()> {
        let cond = pointer.clone().is_invalid_pointer();
        if mode == Mode::Free {
            let msg = "free of invalid pointer";
            self.failure_under("invalid pointer freed", msg, cond, guard, site)
        } else {
            self.failure_under("pointer dereference", "invalid pointer", cond, guard, site)
        }
    }

    /// The object standing for the unknown target of a pointer symbol, if it has one.
    fn failed_symbol(&self, pointer: &Expr) -> Option<Expr> {
        let symbol = self.symbol_table.lookup(pointer.symbol_identifier()?)?;
        let failed = self.symbol_table.lookup(symbol.failed_symbol?)?;
        Some(failed.to_expr())
    }

    /// `same_object(pointer, &object)`, checking that `object` can be pointed to at all.
    fn same_object(&self, pointer: &Expr, object: &Expr) -> Result<Expr> {
        if !object.can_take_address_of() {
            return Err(MalformedIr::InvalidValueSetObject {
                pointer: pointer.clone(),
                object: object.clone(),
            });
        }
        Ok(pointer.clone().same_object(object.clone().address_of()))
    }

    fn check_object(
        &mut self,
        descriptor: ObjectDescriptor,
        pointer: &Expr,
        guard: &mut Guard,
        mode: Mode,
        site: Location,
        ctx: &DerefContext,
    ) -> Result<Option<ObjectDescriptor>> {
        let same = self.same_object(pointer, &descriptor.object)?;
        if mode == Mode::Free {
            let msg = "free() of non-dynamic memory";
            self.failure_under("invalid pointer freed", msg, same, guard, site)?;
            return Ok(None);
        }
        if descriptor.object.is_string_constant() {
            if mode == Mode::Write {
                let msg = "write access to read-only object";
                self.failure_under("pointer dereference", msg, same, guard, site)?;
            }
            return Ok(Some(descriptor));
        }

        let Some(root) = descriptor.object.root_object() else {
            return Err(MalformedIr::InvalidValueSetObject {
                pointer: pointer.clone(),
                object: descriptor.object,
            });
        };
        let symbol = self.symbol_table.lookup(root).ok_or(MalformedIr::UnknownSymbol(root))?;
        let is_valid = symbol.typ.is_code()
            || symbol.is_static_lifetime
            || ctx.valid_locals.contains(&symbol.name);
        if !is_valid {
            let name = symbol.base_name.unwrap_or(symbol.name);
            let msg = format!("accessed expired variable pointer `{name}`");
            self.failure_under("pointer dereference", &msg, same, guard, site)?;
            return Ok(None);
        }
        if mode == Mode::Write && symbol.is_static_const {
            let msg = "write access to read-only object";
            self.failure_under("pointer dereference", msg, same, guard, site)?;
        }
        Ok(Some(descriptor))
    }

    fn check_dynamic(
        &mut self,
        descriptor: ObjectDescriptor,
        freed: bool,
        pointer: &Expr,
        guard: &mut Guard,
        mode: Mode,
        site: Location,
    ) -> Result<Option<ObjectDescriptor>> {
        let same = self.same_object(pointer, &descriptor.object)?;
        match (mode, freed) {
            (Mode::Free, true) => {
                let msg = "double free of dynamic object";
                self.failure_under("invalid pointer freed", msg, same, guard, site)?;
                Ok(None)
            }
            (Mode::Free, false) => {
                if !descriptor.is_at_start() {
                    let offset = pointer.clone().pointer_offset();
                    let cond = same.and(offset.neq(Expr::int_constant(0, Type::size_t())));
                    let msg = "free() of pointer with non-zero offset";
                    self.failure_under("invalid pointer freed", msg, cond, guard, site)?;
                }
                Ok(None)
            }
            (_, true) => {
                let msg = "accessed freed object";
                self.failure_under("pointer dereference", msg, same, guard, site)?;
                Ok(None)
            }
            (_, false) => Ok(Some(descriptor)),
        }
    }

    /// The access stays within the object the pointer points into.
    fn bounds_check(
        &mut self,
        pointer: &Expr,
        typ: &Type,
        guard: &mut Guard,
        mode: Mode,
        site: Location,
    ) -> Result<()> {
        let cond = match typ.sizeof_expr(self.symbol_table) {
            Some(size) if mode == Mode::Write => pointer.clone().w_ok(size).not(),
            Some(size) => pointer.clone().r_ok(size).not(),
            None => pointer.clone().is_invalid_pointer(),
        };
        let msg = "pointer outside object bounds";
        self.failure_under("pointer dereference", msg, cond, guard, site)
    }

    /// The expression that reads a `typ` from `candidate` at the offset `pointer` has into it.
    fn access(&self, candidate: ObjectDescriptor, pointer: &Expr, typ: &Type) -> Expr {
        let ObjectDescriptor { object, offset } = candidate;
        let at_start = offset.as_ref().is_none_or(BigInt::is_zero);
        if object.typ() == typ && at_start {
            return object;
        }
        if let Type::Array { typ: elem, .. } = object.typ()
            && **elem == *typ
            && let Some(elem_size) = elem.sizeof(self.symbol_table).filter(|s| *s > 0)
        {
            match &offset {
                Some(o) if (o % elem_size).is_zero() => {
                    let index = Expr::int_constant(o / elem_size, Type::size_t());
                    return object.index(index);
                }
                Some(_) => {}
                None => {
                    let elem_size = Expr::int_constant(elem_size, Type::size_t());
                    return object.index(pointer.clone().pointer_offset().div(elem_size));
                }
            }
        }
        let offset = match offset {
            Some(o) => Expr::int_constant(o, Type::size_t()),
            None => pointer.clone().pointer_offset(),
        };
        object.byte_extract(offset, typ.clone())
    }
}
