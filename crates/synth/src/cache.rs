//! Ledger of type names already handled during one synthesis pass.

use indexmap::IndexMap;

/// How a type name ended up in the [`TypeCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMark {
    /// A block for the type has been (or is being) emitted.
    Compiled,
    /// Resolution failed and `scalar Name` stands in for the type.
    Placeholder,
}

/// Visited set keyed by the name of the type being resolved.
///
/// Marks are write-once: the first mark for a name wins, so a type is
/// compiled, or substituted, at most once per pass. A name is marked before
/// its own block is written, which also cuts recursion through cyclic
/// references. Dropped names are not marked; they stay open to a later
/// reference that can still define them.
#[derive(Debug, Clone, Default)]
pub struct TypeCache {
    marks: IndexMap<String, TypeMark>,
}

impl TypeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.marks.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<TypeMark> {
        self.marks.get(name).copied()
    }

    /// Records `mark` for `name`. Returns `false`, leaving the existing mark
    /// untouched, if the name was already present.
    pub fn mark(&mut self, name: &str, mark: TypeMark) -> bool {
        if self.marks.contains_key(name) {
            return false;
        }
        self.marks.insert(name.to_owned(), mark);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Marked names in the order they were first marked.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeMark)> + '_ {
        self.marks.iter().map(|(name, mark)| (name.as_str(), *mark))
    }

    /// Number of names carrying `mark`.
    #[must_use]
    pub fn count(&self, mark: TypeMark) -> usize {
        self.marks.values().filter(|m| **m == mark).count()
    }
}
