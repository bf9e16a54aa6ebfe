//! Interned node identifiers
//!
//! Node ids are compared on every edge lookup and drag event, so they are
//! interned once into a process-wide table and handled as a `Copy` symbol
//! afterwards.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Stable key of a node in a topology.
///
/// # Examples
///
/// ```
/// use topograph_core::identifier::Id;
///
/// let router = Id::new("A");
/// let same = Id::new("A");
/// assert_eq!(router, same);
/// assert_eq!(router, "A");
/// assert_eq!(router.to_string(), "A");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns `true` when the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        interner().resolve(self.0).is_none_or(str::is_empty)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner.resolve(self.0).unwrap_or_default();
        write!(f, "{name}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
