//! Type identifiers and reference paths.

use std::collections::BTreeSet;
use std::fmt;

/// Unique key of a declared type: a short name within a dotted namespace.
///
/// Identifiers order by namespace, then by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    namespace: String,
    name: String,
}

impl Identifier {
    /// Creates a new identifier.
    ///
    /// # Arguments
    /// * `namespace` - Dotted namespace, possibly empty
    /// * `name` - Short type name
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Splits a full name at its last dot.
    #[must_use]
    pub fn parse(full_name: &str) -> Self {
        match full_name.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", full_name),
        }
    }

    /// Returns the short name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dotted namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns `namespace.name`, or just the name when the namespace is empty.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns the namespace segments.
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace.split('.').filter(|s| !s.is_empty())
    }

    /// Returns the last namespace segment, or an empty string.
    #[must_use]
    pub fn last_namespace_segment(&self) -> &str {
        self.namespace
            .rsplit_once('.')
            .map_or(self.namespace.as_str(), |(_, last)| last)
    }

    /// Returns the package path: namespace segments joined by `/`.
    ///
    /// This is the unit of import grouping for generated code.
    #[must_use]
    pub fn package_path(&self) -> String {
        self.namespace_segments().collect::<Vec<_>>().join("/")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// An ordered set of identifiers.
pub type IdentifierSet = BTreeSet<Identifier>;

/// An ordered chain of identifiers, such as a reference cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Identifier>);

impl Path {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an identifier.
    pub fn push(&mut self, id: Identifier) {
        self.0.push(id);
    }

    /// Returns true if the path contains the identifier.
    #[must_use]
    pub fn contains(&self, id: &Identifier) -> bool {
        self.0.contains(id)
    }

    /// Returns the number of identifiers in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifiers in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Identifier] {
        &self.0
    }

    /// Iterates over the identifiers in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Identifier> {
        self.0.iter()
    }
}

impl From<Vec<Identifier>> for Path {
    fn from(ids: Vec<Identifier>) -> Self {
        Self(ids)
    }
}

impl FromIterator<Identifier> for Path {
    fn from_iter<I: IntoIterator<Item = Identifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Identifier;
    type IntoIter = std::slice::Iter<'a, Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}
