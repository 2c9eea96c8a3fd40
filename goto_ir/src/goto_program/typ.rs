// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use self::DatatypeComponent::*;
use self::Type::*;
use super::{Expr, SymbolTable};
use crate::InternedString;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

///////////////////////////////////////////////////////////////////////////////////////////////
/// Datatypes
///////////////////////////////////////////////////////////////////////////////////////////////

/// Represents the different types that can be used in a goto-program.
/// The names are directly taken from the CBMC IrepIds.
/// In the examples below, `x` is used as a placeholder showing how a variable of that
/// type would be declared.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize, Deserialize)]
pub enum Type {
    /// `typ x[size]`. E.g. `unsigned int x[3]`
    Array { typ: Box<Type>, size: u64 },
    /// CBMC specific. `__CPROVER_bool x`. A single bit boolean
    Bool,
    /// Machine dependent integers: `bool`, `char`, `int`, `size_t`, etc.
    CInteger(CIntType),
    /// `return_type x(parameters)`
    Code { parameters: Vec<Parameter>, return_type: Box<Type> },
    /// `void`
    Empty,
    /// `typ x[]`. Has a type, but no size. Only valid as the last element of a struct.
    FlexibleArray { typ: Box<Type> },
    /// `struct x {}`
    IncompleteStruct { tag: InternedString },
    /// `typ*`
    Pointer { typ: Box<Type> },
    /// `int<width>_t`. e.g. `int32_t`
    Signedbv { width: u64 },
    /// `struct tag {component1.typ component1.name; component2.typ component2.name ... }`
    Struct { tag: InternedString, components: Vec<DatatypeComponent> },
    /// CBMC specific. A reference into the symbol table, where the tag is the name of the symbol.
    StructTag(InternedString),
    /// `uint<width>_t`. e.g. `uint32_t`
    Unsignedbv { width: u64 },
    /// `return_type x(parameters, ...)`
    VariadicCode { parameters: Vec<Parameter>, return_type: Box<Type> },
}

/// Machine dependent integers: `bool`, `char`, `int`, `size_t`, etc.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CIntType {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `int`
    Int,
    /// `size_t`
    SizeT,
    /// `ssize_t`
    SSizeT,
}

/// The fields types of a struct
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize, Deserialize)]
pub enum DatatypeComponent {
    Field { name: InternedString, typ: Type },
    Padding { name: InternedString, bits: u64 },
}

/// The formal parameters of a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    typ: Type,
    /// The unique identifier that refers to this symbol (qualified by function name, module, etc)
    identifier: Option<InternedString>,
    /// The local name the symbol has within the function
    base_name: Option<InternedString>,
}

///////////////////////////////////////////////////////////////////////////////////////////////
/// Implementations
///////////////////////////////////////////////////////////////////////////////////////////////

/// Getters
impl DatatypeComponent {
    pub fn name(&self) -> InternedString {
        match self {
            Field { name, .. } | Padding { name, .. } => *name,
        }
    }

    pub fn typ(&self) -> Type {
        match self {
            Field { typ, .. } => typ.clone(),
            Padding { bits, .. } => Type::unsigned_int(*bits),
        }
    }
}

//Constructors
impl DatatypeComponent {
    pub fn field<T: Into<InternedString>>(name: T, typ: Type) -> Self {
        let name = name.into();
        Field { name, typ }
    }

    pub fn padding<T: Into<InternedString>>(name: T, bits: u64) -> Self {
        let name = name.into();
        Padding { name, bits }
    }
}

/// Parameters are equal regardless of the names given to them, so equality and hashing only
/// look at the type.
impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.typ.hash(state);
    }
}

/// Getters
impl Parameter {
    pub fn base_name(&self) -> Option<InternedString> {
        self.base_name
    }

    pub fn identifier(&self) -> Option<InternedString> {
        self.identifier
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }
}

impl CIntType {
    pub fn sizeof_in_bits(&self, st: &SymbolTable) -> u64 {
        let mm = st.machine_model();
        match self {
            CIntType::Bool => mm.bool_width(),
            CIntType::Char => mm.char_width(),
            CIntType::Int => mm.int_width(),
            CIntType::SizeT | CIntType::SSizeT => mm.pointer_width(),
        }
    }
}

/// Given a struct tag `foo`, the name of the symbol that defines it: `tag-foo`.
pub fn aggr_tag<T: Into<InternedString>>(t: T) -> InternedString {
    let t = t.into();
    if t.starts_with("tag-") { t } else { format!("tag-{t}").into() }
}

/// Getters
impl Type {
    /// The base type of this type, if one exists.
    /// `typ*` | `typ x[width]` | `typ x[]` -> `typ`,
    pub fn base_type(&self) -> Option<&Type> {
        match self {
            Array { typ, .. } | FlexibleArray { typ } | Pointer { typ } => Some(typ),
            _ => None,
        }
    }

    pub fn components(&self) -> Option<&Vec<DatatypeComponent>> {
        match self {
            Struct { components, .. } => Some(components),
            _ => None,
        }
    }

    pub fn parameters(&self) -> Option<&Vec<Parameter>> {
        match self {
            Code { parameters, .. } | VariadicCode { parameters, .. } => Some(parameters),
            _ => None,
        }
    }

    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Code { return_type, .. } | VariadicCode { return_type, .. } => Some(return_type),
            _ => None,
        }
    }

    /// The size of the type in bytes (chars), if the type has a size.
    pub fn sizeof(&self, st: &SymbolTable) -> Option<u64> {
        let bits = self.sizeof_in_bits(st)?;
        let char_width = st.machine_model().char_width();
        if bits % char_width == 0 { Some(bits / char_width) } else { None }
    }

    /// `sizeof(self)` as a `size_t` constant, if the type has a size.
    pub fn sizeof_expr(&self, st: &SymbolTable) -> Option<Expr> {
        self.sizeof(st).map(|size| Expr::int_constant(size, Type::size_t()))
    }

    /// The size of the type in bits. Types that have no size in C (`__CPROVER_bool`, functions,
    /// incomplete structs, flexible arrays, `void`) return `None`, as do tags that are missing
    /// from the symbol table.
    pub fn sizeof_in_bits(&self, st: &SymbolTable) -> Option<u64> {
        match self {
            Array { typ, size } => typ.sizeof_in_bits(st).map(|elem| elem * size),
            Bool => None,
            CInteger(t) => Some(t.sizeof_in_bits(st)),
            Code { .. } | VariadicCode { .. } => None,
            Empty => None,
            FlexibleArray { .. } => None,
            IncompleteStruct { .. } => None,
            Pointer { .. } => Some(st.machine_model().pointer_width()),
            Signedbv { width } | Unsignedbv { width } => Some(*width),
            Struct { components, .. } => components
                .iter()
                .map(|c| match c {
                    Field { typ: FlexibleArray { .. }, .. } => Some(0),
                    _ => c.typ().sizeof_in_bits(st),
                })
                .sum(),
            StructTag(tag) => st.lookup(*tag)?.typ.sizeof_in_bits(st),
        }
    }

    /// Get the tag of a struct.
    pub fn tag(&self) -> Option<InternedString> {
        match self {
            IncompleteStruct { tag } | Struct { tag, .. } | StructTag(tag) => Some(*tag),
            _ => None,
        }
    }

    /// the width of an integer type
    pub fn width(&self) -> Option<u64> {
        match self {
            Signedbv { width } | Unsignedbv { width } => Some(*width),
            _ => None,
        }
    }
}

/// Predicates
impl Type {
    pub fn is_array_like(&self) -> bool {
        match self {
            Array { .. } | FlexibleArray { .. } => true,
            _ => false,
        }
    }

    pub fn is_bool(&self) -> bool {
        match self {
            Bool => true,
            _ => false,
        }
    }

    pub fn is_c_size_t(&self) -> bool {
        match self {
            CInteger(CIntType::SizeT) => true,
            _ => false,
        }
    }

    pub fn is_code(&self) -> bool {
        match self {
            Code { .. } | VariadicCode { .. } => true,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Empty => true,
            _ => false,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            CInteger(_) | Signedbv { .. } | Unsignedbv { .. } => true,
            _ => false,
        }
    }

    pub fn is_pointer(&self) -> bool {
        match self {
            Pointer { .. } => true,
            _ => false,
        }
    }

    /// Scalars a pointer can be cast to and from.
    pub fn is_scalar(&self) -> bool {
        self.is_integer() || self.is_pointer() || self.is_bool()
    }
}

/// Constructors
impl Type {
    /// elem_t[size]
    pub fn array_of<T>(self, size: T) -> Self
    where
        T: TryInto<u64>,
        T::Error: std::fmt::Debug,
    {
        Array { typ: Box::new(self), size: size.try_into().unwrap() }
    }

    pub fn as_parameter(
        self,
        identifier: Option<InternedString>,
        base_name: Option<InternedString>,
    ) -> Parameter {
        Parameter { identifier, base_name, typ: self }
    }

    pub fn bool() -> Self {
        Bool
    }

    pub fn c_char() -> Self {
        CInteger(CIntType::Char)
    }

    pub fn c_int() -> Self {
        CInteger(CIntType::Int)
    }

    /// A function type
    pub fn code(parameters: Vec<Parameter>, return_type: Type) -> Self {
        Code { parameters, return_type: Box::new(return_type) }
    }

    pub fn code_with_unnamed_parameters(param_types: Vec<Type>, return_type: Type) -> Self {
        let parameters = param_types.into_iter().map(|t| t.as_parameter(None, None)).collect();
        Type::code(parameters, return_type)
    }

    pub fn empty() -> Self {
        Empty
    }

    pub fn incomplete_struct<T: Into<InternedString>>(tag: T) -> Self {
        let tag = tag.into();
        IncompleteStruct { tag }
    }

    /// `size_t`. This is the type every size and offset in the IR is expressed in.
    pub fn size_t() -> Self {
        CInteger(CIntType::SizeT)
    }

    pub fn ssize_t() -> Self {
        CInteger(CIntType::SSizeT)
    }

    pub fn struct_tag<T: Into<InternedString>>(name: T) -> Self {
        StructTag(aggr_tag(name))
    }

    pub fn struct_type<T: Into<InternedString>>(
        tag: T,
        components: Vec<DatatypeComponent>,
    ) -> Self {
        let tag = tag.into();
        assert!(
            components.iter().map(|c| c.name()).collect::<std::collections::BTreeSet<_>>().len()
                == components.len(),
            "Components contain duplicates: {components:?}"
        );
        Struct { tag, components }
    }

    pub fn to_pointer(self) -> Self {
        Pointer { typ: Box::new(self) }
    }

    pub fn unsigned_int<T>(w: T) -> Self
    where
        T: TryInto<u64>,
        T::Error: std::fmt::Debug,
    {
        let width: u64 = w.try_into().unwrap();
        assert!(width > 0);
        Unsignedbv { width }
    }

    pub fn void_pointer() -> Self {
        Type::empty().to_pointer()
    }
}

/// Constants from Types, for use in Expr contexts
impl Type {
    pub fn nondet(&self) -> Expr {
        Expr::nondet(self.clone())
    }

    /// The null pointer of this pointer type.
    pub fn null(&self) -> Expr {
        assert!(self.is_pointer());
        Expr::pointer_constant(0, self.clone())
    }

    pub fn one(&self) -> Expr {
        if self.is_integer() {
            Expr::int_constant(1, self.clone())
        } else if self.is_bool() {
            Expr::bool_true()
        } else {
            unreachable!("Can't convert {self:?} to a one value")
        }
    }

    pub fn zero(&self) -> Expr {
        if self.is_integer() {
            Expr::int_constant(0, self.clone())
        } else if self.is_bool() {
            Expr::bool_false()
        } else if self.is_pointer() {
            self.null()
        } else {
            unreachable!("Can't convert {self:?} to a zero value")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_equality_ignores_names() {
        let named = Type::c_int().as_parameter(Some("f::a".into()), Some("a".into()));
        let anonymous = Type::c_int().as_parameter(None, None);
        assert_eq!(named, anonymous);
        assert_ne!(named, Type::c_char().as_parameter(None, None));
    }

    #[test]
    fn sizeof_uses_machine_model() {
        let st = SymbolTable::default();
        assert_eq!(Type::c_int().sizeof(&st), Some(4));
        assert_eq!(Type::c_int().to_pointer().sizeof(&st), Some(8));
        assert_eq!(Type::c_char().array_of(3).sizeof(&st), Some(3));
        assert_eq!(Type::unsigned_int(16).sizeof_in_bits(&st), Some(16));
    }

    #[test]
    fn sizeof_of_unsized_types_is_none() {
        let st = SymbolTable::default();
        assert_eq!(Type::bool().sizeof(&st), None);
        assert_eq!(Type::empty().sizeof(&st), None);
        assert_eq!(Type::incomplete_struct("s").sizeof(&st), None);
        assert_eq!(Type::code_with_unnamed_parameters(vec![], Type::empty()).sizeof(&st), None);
        // Not in the symbol table.
        assert_eq!(Type::struct_tag("missing").sizeof(&st), None);
    }

    #[test]
    fn struct_size_through_tag() {
        let mut st = SymbolTable::default();
        let s = Type::struct_type(
            "pair",
            vec![
                DatatypeComponent::field("a", Type::c_int()),
                DatatypeComponent::padding("$pad", 32),
                DatatypeComponent::field("b", Type::c_int().to_pointer()),
            ],
        );
        st.insert(super::super::Symbol::aggr_type("pair", s));
        assert_eq!(Type::struct_tag("pair"), Type::StructTag("tag-pair".into()));
        assert_eq!(Type::struct_tag("pair").sizeof(&st), Some(16));
    }
}
