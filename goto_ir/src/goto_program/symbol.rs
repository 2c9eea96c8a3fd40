// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use super::typ::aggr_tag;
use super::{Expr, Location, Type};
use crate::{InternStringOption, InternedString};
use serde::{Deserialize, Serialize};

/// Based off the CBMC symbol implementation here:
/// <https://github.com/diffblue/cbmc/blob/develop/src/util/symbol.h>
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique identifier. Mangled name from front end `main::1::x`
    pub name: InternedString,
    pub location: Location,
    pub typ: Type,
    pub value: SymbolValues,

    /// Local name `x`
    pub base_name: Option<InternedString>,
    /// Fully qualified name `main::x`
    pub pretty_name: Option<InternedString>,
    pub is_type: bool,

    pub is_static_lifetime: bool,
    pub is_thread_local: bool,

    /// This flag marks a variable as constant (IrepId: `ID_C_constant`).
    /// Writes through a pointer to such a symbol are a dereference failure.
    pub is_static_const: bool,

    /// For pointer-typed symbols: the object that stands for whatever the pointer points to
    /// when its target is not known, e.g. `symex::invalid_object$p`.
    pub failed_symbol: Option<InternedString>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolValues {
    Expr(Expr),
    None,
}

/// Constructors
impl Symbol {
    fn new<T: Into<InternedString>, U: Into<InternedString>, V: Into<InternedString>>(
        name: T,
        location: Location,
        typ: Type,
        value: SymbolValues,
        base_name: Option<U>,
        pretty_name: Option<V>,
    ) -> Self {
        let name = name.into();
        let base_name = base_name.intern();
        let pretty_name = pretty_name.intern();
        Symbol {
            name,
            location,
            typ,
            value,
            base_name,
            pretty_name,
            is_type: false,
            is_static_lifetime: false,
            is_thread_local: false,
            is_static_const: false,
            failed_symbol: None,
        }
    }

    /// The symbol that defines the type of the struct.
    /// For a struct foo this is the symbol "tag-foo" that maps to the type struct foo.
    pub fn aggr_type<T: Into<InternedString>>(pretty_name: T, t: Type) -> Symbol {
        let pretty_name = pretty_name.into();
        let base_name = t.tag().unwrap_or(pretty_name);
        let name = aggr_tag(base_name);
        let pretty_name = Some(pretty_name);
        let symbol = Symbol::new(
            name,
            Location::none(),
            t,
            SymbolValues::None,
            Some(base_name),
            pretty_name,
        );
        Symbol { is_type: true, ..symbol }
    }

    pub fn constant(name: &str, base_name: &str, value: Expr, loc: Location) -> Symbol {
        Symbol::new(
            name,
            loc,
            value.typ().clone(),
            SymbolValues::Expr(value),
            Some(base_name),
            Some(name),
        )
        .with_is_static_lifetime(true)
        .with_is_static_const(true)
    }

    pub fn function<T: Into<InternedString>, U: Into<InternedString>>(
        name: T,
        typ: Type,
        pretty_name: U,
        loc: Location,
    ) -> Symbol {
        let name = name.into();
        let pretty_name = pretty_name.into();
        Symbol::new(name, loc, typ, SymbolValues::None, Some(name), Some(pretty_name))
    }

    /// A local variable. It is only a valid dereference target where it is in scope.
    pub fn variable<T: Into<InternedString>, U: Into<InternedString>>(
        name: T,
        base_name: U,
        t: Type,
        l: Location,
    ) -> Symbol {
        let name = name.into();
        let base_name: InternedString = base_name.into();
        Symbol::new(name, l, t, SymbolValues::None, Some(base_name), None::<InternedString>)
            .with_is_thread_local(true)
    }

    pub fn static_variable<T: Into<InternedString>, U: Into<InternedString>>(
        name: T,
        base_name: U,
        t: Type,
        l: Location,
    ) -> Symbol {
        Symbol::variable(name, base_name, t, l)
            .with_is_thread_local(false)
            .with_is_static_lifetime(true)
    }
}

/// Setters
impl Symbol {
    pub fn with_is_static_lifetime(mut self, v: bool) -> Symbol {
        self.is_static_lifetime = v;
        self
    }

    pub fn with_is_static_const(mut self, v: bool) -> Symbol {
        self.is_static_const = v;
        self
    }

    pub fn with_is_thread_local(mut self, v: bool) -> Symbol {
        self.is_thread_local = v;
        self
    }

    pub fn with_failed_symbol<T: Into<InternedString>>(mut self, failed: Option<T>) -> Symbol {
        self.failed_symbol = failed.intern();
        self
    }
}

/// Conversions
impl Symbol {
    /// Makes a symbol expression that refers to this symbol.
    pub fn to_expr(&self) -> Expr {
        Expr::symbol_expression(self.name, self.typ.clone()).with_location(self.location)
    }
}
