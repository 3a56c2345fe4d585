//! Interned symbols

use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use indexmap::IndexSet;
use parking_lot::RwLock;
use unicode_categories::UnicodeCategories;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub(crate) u32);

static SYMTAB: LazyLock<RwLock<IndexSet<Arc<str>>>> =
    LazyLock::new(|| RwLock::new(IndexSet::new()));

impl Symbol {
    pub fn intern(s: &str) -> Self {
        if let Some(id) = SYMTAB.read().get_index_of(s) {
            return Self(id as u32);
        }
        // Another writer may have interned `s` between the two locks;
        // insert_full returns the existing index in that case.
        let (id, _) = SYMTAB.write().insert_full(Arc::from(s));
        Self(id as u32)
    }

    /// The symbol for `s` if it has already been interned. Never grows the
    /// table, so it is the right call for lookups of untrusted names.
    pub fn lookup(s: &str) -> Option<Self> {
        SYMTAB.read().get_index_of(s).map(|id| Self(id as u32))
    }

    pub fn to_str(self) -> Arc<str> {
        let symtab = SYMTAB.read();
        symtab[self.0 as usize].clone()
    }

    /// Whether this symbol can name a field: a letter or `_`, followed by
    /// letters, digits and underscores.
    pub fn is_identifier(self) -> bool {
        is_identifier(&self.to_str())
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_letter() => (),
        _ => return false,
    }
    chars.all(is_identifier_continue)
}

/// Constant names start with an uppercase letter.
pub(crate) fn is_constant_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_letter_uppercase() => (),
        _ => return false,
    }
    chars.all(is_identifier_continue)
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_letter() || c.is_number_decimal_digit() || c.is_mark()
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.to_str())
    }
}

impl PartialEq<&'_ str> for Symbol {
    fn eq(&self, rhs: &&str) -> bool {
        self.to_str().as_ref() == *rhs
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, rhs: &str) -> bool {
        self.to_str().as_ref() == rhs
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::intern(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::intern(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let a = Symbol::intern("interning_is_stable");
        let b = Symbol::intern("interning_is_stable");
        assert_eq!(a, b);
        assert_eq!(a, "interning_is_stable");
        assert_ne!(a, Symbol::intern("something_else"));
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(Symbol::lookup("lookup_does_not_intern_absent"), None);
        assert_eq!(Symbol::lookup("lookup_does_not_intern_absent"), None);
        let sym = Symbol::intern("lookup_does_not_intern_present");
        assert_eq!(Symbol::lookup("lookup_does_not_intern_present"), Some(sym));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("point_2d"));
        assert!(is_identifier("größe"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2d"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier("x="));
    }

    #[test]
    fn constant_names() {
        assert!(is_constant_name("Point"));
        assert!(is_constant_name("Point3D"));
        assert!(!is_constant_name("point"));
        assert!(!is_constant_name("_Point"));
        assert!(!is_constant_name("Po int"));
    }
}
