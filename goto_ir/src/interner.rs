// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::sync::{LazyLock, Mutex};
use string_interner::StringInterner;
use string_interner::backend::StringBackend;
use string_interner::symbol::SymbolU32;

/// A handle to a string that is stored once for the lifetime of the process.
///
/// Identifiers, file names and property classes are repeated on every instruction of a GOTO
/// program and on every step of an SSA trace. Interning them makes the handle `Copy`, and makes
/// hashing or comparing two names an integer operation. The backing storage is never freed, so
/// only intern strings that end up in long-lived IR.
///
/// Note that the derived ordering is the interning order, not the lexicographic one.
///
/// To create one, either do `let i: InternedString = s.into();` or `let i = s.intern();`
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InternedString(SymbolU32);

static INTERNER: LazyLock<Mutex<StringInterner<StringBackend>>> =
    LazyLock::new(|| Mutex::new(StringInterner::default()));

impl InternedString {
    pub fn is_empty(&self) -> bool {
        self.map(|s| s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.map(|s| s.len())
    }

    /// Apply `f` to the interned text.
    /// The `&str` cannot outlive the interner lock, so it is only lent to `f`.
    /// `f` must not intern new strings.
    pub fn map<T, F: FnOnce(&str) -> T>(&self, f: F) -> T {
        let interner = INTERNER.lock().unwrap();
        f(interner.resolve(self.0).unwrap())
    }

    pub fn starts_with(&self, pattern: &str) -> bool {
        self.map(|s| s.starts_with(pattern))
    }
}

impl std::fmt::Display for InternedString {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.map(|s| fmt.write_str(s))
    }
}

/// Debug output shows the text, not the symbol index, so that logged IR stays readable.
impl std::fmt::Debug for InternedString {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.map(|s| write!(fmt, "{s:?}"))
    }
}

impl<T> From<T> for InternedString
where
    T: AsRef<str>,
{
    fn from(s: T) -> InternedString {
        InternedString(INTERNER.lock().unwrap().get_or_intern(s))
    }
}

impl<T> PartialEq<T> for InternedString
where
    T: AsRef<str>,
{
    fn eq(&self, other: &T) -> bool {
        self.map(|s| s == other.as_ref())
    }
}

impl Serialize for InternedString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.map(|s| serializer.serialize_str(s))
    }
}

impl<'de> Deserialize<'de> for InternedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.into())
    }
}

pub trait InternString {
    fn intern(self) -> InternedString;
}

impl<T> InternString for T
where
    T: Into<InternedString>,
{
    fn intern(self) -> InternedString {
        self.into()
    }
}

pub trait InternStringOption {
    fn intern(self) -> Option<InternedString>;
}

impl<T> InternStringOption for Option<T>
where
    T: Into<InternedString>,
{
    fn intern(self) -> Option<InternedString> {
        self.map(|s| s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::InternedString;
    use serde_test::{Token, assert_tokens};

    #[test]
    fn interning_is_idempotent() {
        let a: InternedString = "main::x".into();
        let b: InternedString = "main::y".into();
        let aa: InternedString = String::from("main::x").into();

        assert_eq!(a, aa);
        assert_ne!(a, b);
        assert_eq!(a, "main::x");
        assert_eq!(b.len(), 7);
        assert!(b.starts_with("main::"));
        assert_eq!(format!("{a}"), "main::x");
        assert_eq!(format!("{a:?}"), "\"main::x\"");
    }

    #[test]
    fn serializes_as_plain_string() {
        let name: InternedString = "__invalid_object".into();
        assert_tokens(&name, &[Token::Str("__invalid_object")]);
    }
}
