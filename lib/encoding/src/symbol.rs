use crate::EncodedTerm;
use dashmap::DashSet;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

/// The process-wide set of interned strings.
///
/// Interned strings are never freed.
static INTERNER: LazyLock<DashSet<&'static str>> = LazyLock::new(DashSet::new);

/// A handle onto a process-wide interned string.
///
/// Two symbols are equal if and only if they were interned from equal strings. Comparing and
/// hashing a symbol only looks at the pointer of the interned string.
#[derive(Debug, Clone, Copy)]
pub struct Symbol(&'static str);

impl Symbol {
    /// Interns `value` and returns its [Symbol].
    pub fn intern(value: &str) -> Self {
        if let Some(symbol) = Self::lookup(value) {
            return symbol;
        }

        let leaked: &'static str = Box::leak(Box::<str>::from(value));
        if INTERNER.insert(leaked) {
            Self(leaked)
        } else {
            // Another thread interned the same string in the meantime. The leaked copy is lost.
            Self::lookup(value).unwrap_or(Self(leaked))
        }
    }

    /// Returns the [Symbol] of `value` if it has been interned before.
    pub fn lookup(value: &str) -> Option<Self> {
        INTERNER.get(value).map(|entry| Self(*entry.key()))
    }

    /// Returns the interned string.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0, state);
    }
}

impl EncodedTerm for Symbol {}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Symbol {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::intern(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = Symbol::intern("symbol-test-a");
        let b = Symbol::intern(&String::from("symbol-test-a"));
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
        assert_ne!(a, Symbol::intern("symbol-test-b"));
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(Symbol::lookup("symbol-test-never-interned"), None);
        let symbol = Symbol::intern("symbol-test-c");
        assert_eq!(Symbol::lookup("symbol-test-c"), Some(symbol));
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(Symbol::intern("<http://example.com/a>"), @"<http://example.com/a>");
    }
}
