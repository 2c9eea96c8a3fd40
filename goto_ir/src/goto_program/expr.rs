// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// This file has a lot of function with names like "div"
#![allow(clippy::should_implement_trait)]

use self::BinaryOperator::*;
use self::ExprValue::*;
use self::UnaryOperator::*;
use super::{Location, Type};
use crate::InternedString;
use num::bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

///////////////////////////////////////////////////////////////////////////////////////////////
/// Datatypes
///////////////////////////////////////////////////////////////////////////////////////////////

/// An `Expr` represents an expression type: i.e. a computation that returns a value.
/// Every expression has a type, a value, and a location (which may be `None`).
///
/// The fields of `Expr` are kept private, and there are no getters that return mutable references.
/// The checked constructors ensure that all expressions they build are well-formed.
/// Trees built elsewhere enter through [Expr::new_unchecked] or through serde, and may violate
/// those rules: code that consumes such trees has to check what it relies on.
///
/// In general, expressions are constructed in a "chained" style:
///     ` *(&x + i);` would translate to `x.address_of().plus(i).dereference()`
/// By default, these expressions have no location: to add a location, use the `.with_location()`
/// fluent builder to add locations when desired.
///
/// Equality and hashing are structural: they compare values and types, never locations.
/// Two guards built at different source positions are therefore the same guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    value: Box<ExprValue>,
    typ: Type,
    #[serde(default)]
    location: Location,
}

/// The different kinds of values an expression can have.
/// The names are chosen to map directly onto the IrepID used by CBMC.
/// Each expression is described by reference to the corresponding C code that would generate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprValue {
    /// `&self`
    AddressOf(Expr),
    /// `typ x[] = >>> {elems0, elems1 ...} <<<`
    Array { elems: Vec<Expr> },
    /// `lhs op rhs`.  E.g. `lhs + rhs` if `op == BinaryOperator::Plus`
    BinOp { op: BinaryOperator, lhs: Expr, rhs: Expr },
    /// `(__CPROVER_bool) >>> true/false <<<`. True/False as a single bit boolean.
    BoolConstant(bool),
    /// Reinterpret the bytes of `e`, starting at byte `offset`, as type self.typ
    ByteExtract { e: Expr, offset: Expr },
    /// `*self`
    Dereference(Expr),
    /// `self` used where the front end means `*self`, e.g. a C++ reference.
    ImplicitDereference(Expr),
    /// `function(arguments)`
    FunctionCall { function: Expr, arguments: Vec<Expr> },
    /// `c ? t : e`
    If { c: Expr, t: Expr, e: Expr },
    /// `array[index]`. `array` is either array-like or a pointer.
    Index { array: Expr, index: Expr },
    /// `123`
    IntConstant(BigInt),
    /// `lhs.field`
    Member { lhs: Expr, field: InternedString },
    /// `__nondet()`
    Nondet,
    /// `NULL`
    PointerConstant(u64),
    /// A raw string constant. Note that you normally actually want a pointer to the first element.
    /// `"s"`
    StringConstant { s: InternedString },
    /// Struct initializer
    /// `struct foo the_foo = >>> {field1, field2, ... } <<<`
    Struct { values: Vec<Expr> },
    /// `self`
    Symbol { identifier: InternedString },
    /// `(typ) self`. Target type is in the outer `Expr` struct.
    Typecast(Expr),
    /// `op self` e.g. `! self` if `op == UnaryOperator::Not`
    UnOp { op: UnaryOperator, e: Expr },
}

/// Binary operators. The names are the same as in the Irep representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    And,
    Ashr,
    Bitand,
    Bitor,
    Bitxor,
    Div,
    Equal,
    Ge,
    Gt,
    Implies,
    Le,
    Lshr,
    Lt,
    Minus,
    Mod,
    Mult,
    Notequal,
    Or,
    Plus,
    /// `__CPROVER_r_ok(ptr, size)`
    ROk,
    /// `__CPROVER_same_object(ptr1, ptr2)`
    SameObject,
    Shl,
    /// `__CPROVER_w_ok(ptr, size)`
    WOk,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// `~self`
    Bitnot,
    /// `__CPROVER_DYNAMIC_OBJECT(self)`
    IsDynamicObject,
    /// `invalid-pointer(self)`: `self` does not point into any object.
    IsInvalidPointer,
    /// `!self`
    Not,
    /// `__CPROVER_OBJECT_SIZE(self)`
    ObjectSize,
    /// `__CPROVER_POINTER_OBJECT(self)`
    PointerObject,
    /// `__CPROVER_POINTER_OFFSET(self)`
    PointerOffset,
    /// `-self`
    UnaryMinus,
}

///////////////////////////////////////////////////////////////////////////////////////////////
/// Implementations
///////////////////////////////////////////////////////////////////////////////////////////////

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ && self.value == other.value
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.typ.hash(state);
    }
}

/// Getters
impl Expr {
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }

    pub fn value(&self) -> &ExprValue {
        &self.value
    }

    /// Take the expression apart. Together with [Expr::new_unchecked], this is how passes
    /// rebuild a node after rewriting its operands by value.
    pub fn into_parts(self) -> (ExprValue, Type, Location) {
        (*self.value, self.typ, self.location)
    }

    /// The identifier of a symbol expression.
    pub fn symbol_identifier(&self) -> Option<InternedString> {
        match &*self.value {
            Symbol { identifier } => Some(*identifier),
            _ => None,
        }
    }

    /// The pointer operand of `*p` or of an implicit dereference.
    pub fn dereference_operand(&self) -> Option<&Expr> {
        match &*self.value {
            Dereference(p) | ImplicitDereference(p) => Some(p),
            _ => None,
        }
    }

    /// The direct sub-expressions of this node, left to right.
    pub fn operands(&self) -> Vec<&Expr> {
        match &*self.value {
            AddressOf(e) | Dereference(e) | ImplicitDereference(e) | Typecast(e) => vec![e],
            UnOp { e, .. } | Member { lhs: e, .. } => vec![e],
            Array { elems: es } | Struct { values: es } => es.iter().collect(),
            BinOp { lhs, rhs, .. } => vec![lhs, rhs],
            ByteExtract { e, offset } => vec![e, offset],
            FunctionCall { function, arguments } => {
                std::iter::once(function).chain(arguments.iter()).collect()
            }
            If { c, t, e } => vec![c, t, e],
            Index { array, index } => vec![array, index],
            BoolConstant(_)
            | IntConstant(_)
            | Nondet
            | PointerConstant(_)
            | StringConstant { .. }
            | Symbol { .. } => vec![],
        }
    }

    /// The object an lvalue is a part of, e.g. `s` for `s.a[3]`.
    /// Returns `None` for anything that is not rooted in a symbol.
    pub fn root_object(&self) -> Option<InternedString> {
        match &*self.value {
            Symbol { identifier } => Some(*identifier),
            Member { lhs, .. } => lhs.root_object(),
            Index { array, .. } if !array.typ.is_pointer() => array.root_object(),
            ByteExtract { e, .. } | Typecast(e) => e.root_object(),
            _ => None,
        }
    }
}

/// Predicates
impl Expr {
    pub fn is_symbol(&self) -> bool {
        match *self.value {
            Symbol { .. } => true,
            _ => false,
        }
    }

    pub fn is_string_constant(&self) -> bool {
        match *self.value {
            StringConstant { .. } => true,
            _ => false,
        }
    }

    pub fn is_true(&self) -> bool {
        match *self.value {
            BoolConstant(true) => true,
            _ => false,
        }
    }

    pub fn is_false(&self) -> bool {
        match *self.value {
            BoolConstant(false) => true,
            _ => false,
        }
    }

    /// Whether evaluating this expression accesses memory through a pointer anywhere in the tree:
    /// an explicit or implicit dereference, or an index into a pointer.
    pub fn has_dereference(&self) -> bool {
        match &*self.value {
            Dereference(_) | ImplicitDereference(_) => true,
            Index { array, .. } if array.typ.is_pointer() => true,
            _ => self.operands().into_iter().any(Expr::has_dereference),
        }
    }

    /// What typecasts are legal: between scalars, and from anything to `void`.
    pub fn can_cast_from(source: &Type, target: &Type) -> bool {
        source == target || (source.is_scalar() && target.is_scalar()) || target.is_empty()
    }

    pub fn can_cast_to(&self, target: &Type) -> bool {
        Expr::can_cast_from(&self.typ, target)
    }

    pub fn can_take_address_of(&self) -> bool {
        match *self.value {
            Dereference(_)
            | ImplicitDereference(_)
            | Index { .. }
            | Member { .. }
            | StringConstant { .. }
            | Symbol { .. } => true,
            _ => false,
        }
    }
}

/// Traversals
impl Expr {
    /// Call `f` on the identifier of every symbol in the tree, in pre-order.
    pub fn for_each_symbol<F: FnMut(InternedString)>(&self, f: &mut F) {
        if let Symbol { identifier } = &*self.value {
            f(*identifier);
        }
        for op in self.operands() {
            op.for_each_symbol(f);
        }
    }

    /// The identifiers of all symbols in the tree.
    pub fn symbols(&self) -> BTreeSet<InternedString> {
        let mut result = BTreeSet::new();
        self.for_each_symbol(&mut |id| {
            result.insert(id);
        });
        result
    }

    /// Rebuild this node with every direct operand replaced by `f(operand)`, left to right.
    /// The node keeps its kind, type, and location. The first error returned by `f` stops the
    /// traversal.
    pub fn map_operands<E, F>(self, mut f: F) -> Result<Expr, E>
    where
        F: FnMut(Expr) -> Result<Expr, E>,
    {
        let Expr { value, typ, location } = self;
        let value = match *value {
            AddressOf(e) => AddressOf(f(e)?),
            Array { elems } => {
                Array { elems: elems.into_iter().map(&mut f).collect::<Result<_, E>>()? }
            }
            BinOp { op, lhs, rhs } => {
                let lhs = f(lhs)?;
                BinOp { op, lhs, rhs: f(rhs)? }
            }
            ByteExtract { e, offset } => {
                let e = f(e)?;
                ByteExtract { e, offset: f(offset)? }
            }
            Dereference(e) => Dereference(f(e)?),
            ImplicitDereference(e) => ImplicitDereference(f(e)?),
            FunctionCall { function, arguments } => {
                let function = f(function)?;
                let arguments = arguments.into_iter().map(&mut f).collect::<Result<_, E>>()?;
                FunctionCall { function, arguments }
            }
            If { c, t, e } => {
                let c = f(c)?;
                let t = f(t)?;
                If { c, t, e: f(e)? }
            }
            Index { array, index } => {
                let array = f(array)?;
                Index { array, index: f(index)? }
            }
            Member { lhs, field } => Member { lhs: f(lhs)?, field },
            Struct { values } => {
                Struct { values: values.into_iter().map(&mut f).collect::<Result<_, E>>()? }
            }
            Typecast(e) => Typecast(f(e)?),
            UnOp { op, e } => UnOp { op, e: f(e)? },
            leaf @ (BoolConstant(_)
            | IntConstant(_)
            | Nondet
            | PointerConstant(_)
            | StringConstant { .. }
            | Symbol { .. }) => leaf,
        };
        Ok(Expr { value: Box::new(value), typ, location })
    }
}

/// Setters
impl Expr {
    pub fn with_location(mut self, loc: Location) -> Self {
        self.location = loc;
        self
    }
}

/// Private constructor. Making this a macro allows multiple reference to self in the same call.
macro_rules! expr {
    ( $value:expr,  $typ:expr) => {{
        let typ = $typ;
        let value = Box::new($value);
        Expr { value, typ, location: Location::none() }
    }};
}

/// Constructors for the main types
impl Expr {
    /// Build a node without checking that it is well-typed.
    pub fn new_unchecked(value: ExprValue, typ: Type) -> Self {
        expr!(value, typ)
    }

    /// `&self`
    pub fn address_of(self) -> Self {
        assert!(self.can_take_address_of(), "Can't take address of {self:?}");
        expr!(AddressOf(self), self.typ.clone().to_pointer())
    }

    /// `(__CPROVER_bool) >>> true/false <<<`. True/False as a single bit boolean.
    pub fn bool_constant(c: bool) -> Self {
        expr!(BoolConstant(c), Type::bool())
    }

    /// `(__CPROVER_bool) false`. False as a single bit boolean.
    pub fn bool_false() -> Self {
        Expr::bool_constant(false)
    }

    /// `(__CPROVER_bool) true`. True as a single bit boolean.
    pub fn bool_true() -> Self {
        Expr::bool_constant(true)
    }

    /// Reinterpret the bytes of `self`, starting at byte `offset`, as a `typ`.
    pub fn byte_extract(self, offset: Expr, typ: Type) -> Self {
        assert!(offset.typ.is_integer(), "Byte offset must be an integer: {offset:?}");
        expr!(ByteExtract { e: self, offset }, typ)
    }

    /// `(typ) self`.
    pub fn cast_to(self, typ: Type) -> Self {
        assert!(self.can_cast_to(&typ), "Can't cast\n\n{self:?} ({:?})\n\n{typ:?}", self.typ);
        if self.typ == typ { self } else { expr!(Typecast(self), typ) }
    }

    /// *self: t
    pub fn dereference(self) -> Self {
        assert!(self.typ.is_pointer(), "Can't dereference {self:?}");
        let typ = self.typ.base_type().cloned().unwrap_or_else(Type::empty);
        expr!(Dereference(self), typ)
    }

    /// `self` used as `*self`.
    pub fn implicit_dereference(self) -> Self {
        assert!(self.typ.is_pointer(), "Can't dereference {self:?}");
        let typ = self.typ.base_type().cloned().unwrap_or_else(Type::empty);
        expr!(ImplicitDereference(self), typ)
    }

    /// `self[index]`. On a pointer, this is the C syntax for `*(self + index)`.
    pub fn index(self, index: Expr) -> Self {
        assert!(index.typ.is_integer(), "Index must be an integer: {index:?}");
        let typ = match self.typ.base_type() {
            Some(t) if self.typ.is_array_like() || self.typ.is_pointer() => t.clone(),
            _ => unreachable!("Can't index into {self:?}"),
        };
        expr!(Index { array: self, index }, typ)
    }

    /// `123`
    pub fn int_constant<T>(i: T, typ: Type) -> Self
    where
        T: Into<BigInt>,
    {
        assert!(typ.is_integer(), "Integer constant of non-integer type {typ:?}");
        let i = i.into();
        expr!(IntConstant(i), typ)
    }

    /// `__nondet_typ()`
    pub fn nondet(typ: Type) -> Self {
        expr!(Nondet, typ)
    }

    /// `e.g. NULL`
    pub fn pointer_constant(c: u64, typ: Type) -> Self {
        assert!(typ.is_pointer());
        expr!(PointerConstant(c), typ)
    }

    /// `"s"`
    pub fn raw_string_constant(s: InternedString) -> Self {
        expr!(StringConstant { s }, Type::c_char().array_of(s.len() + 1))
    }

    /// `identifier`
    pub fn symbol_expression<T: Into<InternedString>>(identifier: T, typ: Type) -> Self {
        let identifier = identifier.into();
        expr!(Symbol { identifier }, typ)
    }

    /// `self ? t : e`
    pub fn ternary(self, t: Expr, e: Expr) -> Expr {
        assert_eq!(t.typ, e.typ);
        assert!(self.typ.is_bool(), "Ternary condition must be a boolean: {self:?}");
        let typ = t.typ.clone();
        expr!(If { c: self, t, e }, typ)
    }
}

/// Constructors for Binary Operations
impl Expr {
    fn typecheck_binop_args(op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> bool {
        match op {
            // Arithmetic which can include pointers
            Minus => {
                (lhs.typ == rhs.typ && (lhs.typ.is_pointer() || lhs.typ.is_integer()))
                    || (lhs.typ.is_pointer() && rhs.typ.is_integer())
            }
            Plus => {
                (lhs.typ == rhs.typ && lhs.typ.is_integer())
                    || (lhs.typ.is_pointer() && rhs.typ.is_integer())
            }
            // Arithmetic
            Div | Mod | Mult => lhs.typ == rhs.typ && lhs.typ.is_integer(),
            // Bitshifts
            Ashr | Lshr | Shl => lhs.typ.is_integer() && rhs.typ.is_integer(),
            // Boolean ops
            And | Implies | Or | Xor => lhs.typ.is_bool() && rhs.typ.is_bool(),
            // Bitwise ops
            Bitand | Bitor | Bitxor => lhs.typ == rhs.typ && lhs.typ.is_integer(),
            // Comparisons
            Ge | Gt | Le | Lt => {
                lhs.typ == rhs.typ && (lhs.typ.is_integer() || lhs.typ.is_pointer())
            }
            // Equalities
            Equal | Notequal => lhs.typ == rhs.typ && lhs.typ.is_scalar(),
            // Pointer predicates
            ROk | WOk => lhs.typ.is_pointer() && rhs.typ.is_c_size_t(),
            SameObject => lhs.typ.is_pointer() && rhs.typ.is_pointer(),
        }
    }

    fn binop_return_type(op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> Type {
        match op {
            Minus => {
                if lhs.typ.is_pointer() && rhs.typ.is_pointer() {
                    Type::ssize_t()
                } else {
                    lhs.typ.clone()
                }
            }
            Div | Mod | Mult | Plus => lhs.typ.clone(),
            Ashr | Lshr | Shl => lhs.typ.clone(),
            Bitand | Bitor | Bitxor => lhs.typ.clone(),
            And | Implies | Or | Xor => Type::bool(),
            Ge | Gt | Le | Lt | Equal | Notequal => Type::bool(),
            ROk | WOk | SameObject => Type::bool(),
        }
    }

    /// self op right;
    pub fn binop(self, op: BinaryOperator, rhs: Expr) -> Expr {
        assert!(
            Expr::typecheck_binop_args(op, &self, &rhs),
            "BinaryOperation Expression does not typecheck {op:?} {self:?} {rhs:?}"
        );
        expr!(BinOp { op, lhs: self, rhs }, Expr::binop_return_type(op, &self, &rhs))
    }

    /// `self / e`
    pub fn div(self, e: Expr) -> Expr {
        self.binop(Div, e)
    }

    /// `self && e`
    pub fn and(self, e: Expr) -> Expr {
        self.binop(And, e)
    }

    /// `self ==> e`;
    pub fn implies(self, e: Expr) -> Expr {
        self.binop(Implies, e)
    }

    /// `self || e`
    pub fn or(self, e: Expr) -> Expr {
        self.binop(Or, e)
    }

    /// `self + e`
    pub fn plus(self, e: Expr) -> Expr {
        self.binop(Plus, e)
    }

    /// `self - e`
    pub fn sub(self, e: Expr) -> Expr {
        self.binop(Minus, e)
    }

    /// self < e
    pub fn lt(self, e: Expr) -> Expr {
        self.binop(Lt, e)
    }

    /// self >= e
    pub fn ge(self, e: Expr) -> Expr {
        self.binop(Ge, e)
    }

    /// self > e
    pub fn gt(self, e: Expr) -> Expr {
        self.binop(Gt, e)
    }

    /// self == e
    pub fn eq(self, e: Expr) -> Expr {
        self.binop(Equal, e)
    }

    /// self != e
    pub fn neq(self, e: Expr) -> Expr {
        self.binop(Notequal, e)
    }

    /// `__CPROVER_r_ok(self, e)`
    pub fn r_ok(self, e: Expr) -> Expr {
        self.binop(ROk, e)
    }

    /// `__CPROVER_w_ok(self, e)`
    pub fn w_ok(self, e: Expr) -> Expr {
        self.binop(WOk, e)
    }

    /// `__CPROVER_same_object(self, e)`
    pub fn same_object(self, e: Expr) -> Expr {
        self.binop(SameObject, e)
    }
}

/// Constructors for unary operators
impl Expr {
    fn typecheck_unop_arg(op: UnaryOperator, arg: &Expr) -> bool {
        match op {
            Bitnot | UnaryMinus => arg.typ.is_integer(),
            Not => arg.typ.is_bool(),
            IsDynamicObject | IsInvalidPointer | ObjectSize | PointerObject | PointerOffset => {
                arg.typ.is_pointer()
            }
        }
    }

    fn unop_return_type(op: UnaryOperator, arg: &Expr) -> Type {
        match op {
            Bitnot | UnaryMinus => arg.typ.clone(),
            Not | IsDynamicObject | IsInvalidPointer => Type::bool(),
            ObjectSize | PointerObject | PointerOffset => Type::size_t(),
        }
    }

    /// Private helper function to make unary operators
    fn unop(self, op: UnaryOperator) -> Expr {
        assert!(
            Expr::typecheck_unop_arg(op, &self),
            "Unary Operation Expression does not typecheck {op:?} {self:?}"
        );
        let typ = Expr::unop_return_type(op, &self);
        expr!(UnOp { op, e: self }, typ)
    }

    /// `invalid-pointer(self)`
    pub fn is_invalid_pointer(self) -> Expr {
        self.unop(IsInvalidPointer)
    }

    /// `!self`
    pub fn not(self) -> Expr {
        self.unop(Not)
    }

    /// `__CPROVER_POINTER_OFFSET(self)`
    pub fn pointer_offset(self) -> Expr {
        self.unop(PointerOffset)
    }
}

/// Compound expressions
impl Expr {
    /// `self == NULL`
    pub fn is_null(self) -> Expr {
        let null = self.typ.null();
        self.eq(null)
    }

    /// `self != NULL`
    pub fn is_nonnull(self) -> Expr {
        let null = self.typ.null();
        self.neq(null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(name: &str) -> Expr {
        Expr::symbol_expression(name, Type::c_int())
    }

    fn ptr(name: &str) -> Expr {
        Expr::symbol_expression(name, Type::c_int().to_pointer())
    }

    #[test]
    fn equality_ignores_location() {
        let loc = Location::new("a.c", Some("f"), 3, None, 3, None);
        let a = ptr("p").is_nonnull();
        let b = ptr("p").is_nonnull().with_location(loc);
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert_ne!(ptr("p").is_nonnull(), ptr("q").is_nonnull());
    }

    #[test]
    fn has_dereference_finds_nested_accesses() {
        assert!(!int("x").plus(int("y")).has_dereference());
        assert!(ptr("p").dereference().plus(int("y")).has_dereference());
        assert!(ptr("p").index(int("i")).has_dereference());
        assert!(ptr("p").implicit_dereference().has_dereference());

        let arr = Expr::symbol_expression("a", Type::c_int().array_of(4));
        assert!(!arr.index(int("i")).has_dereference());
    }

    #[test]
    fn map_operands_is_left_to_right() {
        let e = int("a").plus(int("b")).lt(int("c"));
        let mut seen = vec![];
        let out = e
            .clone()
            .map_operands(|op| {
                seen.push(op.clone());
                Ok::<_, ()>(op)
            })
            .unwrap();
        assert_eq!(out, e);
        assert_eq!(seen, vec![int("a").plus(int("b")), int("c")]);

        let err = e.map_operands(|_| Err("stop"));
        assert_eq!(err.unwrap_err(), "stop");
    }

    #[test]
    fn collects_symbols() {
        let e = ptr("p").dereference().plus(int("x")).gt(int("x"));
        let names: Vec<String> = e.symbols().into_iter().map(|s| s.to_string()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"p".to_string()));
        assert!(names.contains(&"x".to_string()));
    }

    #[test]
    fn root_object_of_lvalues() {
        let arr = Expr::symbol_expression("a", Type::c_int().array_of(4));
        assert_eq!(arr.index(int("i")).root_object(), Some("a".into()));
        assert_eq!(ptr("p").index(int("i")).root_object(), None);
        assert_eq!(Expr::raw_string_constant("s".into()).root_object(), None);
    }

    #[test]
    fn casts_are_identity_on_equal_types() {
        let p = ptr("p");
        assert_eq!(p.clone().cast_to(Type::c_int().to_pointer()), p);
        let v = p.clone().cast_to(Type::void_pointer());
        assert!(matches!(v.value(), Typecast(_)));
    }

    #[test]
    #[should_panic]
    fn and_requires_booleans() {
        int("x").and(Expr::bool_true());
    }

    #[test]
    fn deserialized_trees_skip_type_checks() {
        let json = r#"{
            "value": {"BinOp": {
                "op": "And",
                "lhs": {"value": {"Symbol": {"identifier": "x"}}, "typ": {"CInteger": "Int"}},
                "rhs": {"value": {"BoolConstant": true}, "typ": "Bool"}
            }},
            "typ": "Bool"
        }"#;
        let e: Expr = serde_json::from_str(json).unwrap();
        assert_eq!(e, Expr::new_unchecked(
            BinOp { op: And, lhs: int("x"), rhs: Expr::bool_true() },
            Type::bool()
        ));
        assert!(e.location().is_none());
    }
}
