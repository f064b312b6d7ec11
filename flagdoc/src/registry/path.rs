//! Structural field paths.

use std::fmt;

/// Sequence of Rust field identifiers leading from the configuration root to
/// a field.
///
/// Paths identify the field a flag is bound to, both while registering flags
/// and while walking the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<&'static str>);

impl FieldPath {
    /// The configuration root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a copy of `self` extended by `segment`.
    #[must_use]
    pub fn child(&self, segment: &'static str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: &'static str) {
        self.0.push(segment);
    }

    /// Removes the last segment.
    pub fn pop(&mut self) -> Option<&'static str> {
        self.0.pop()
    }

    /// Segments from the root down.
    #[must_use]
    pub fn segments(&self) -> &[&'static str] {
        &self.0
    }

    /// Whether `self` equals `ancestor` or lies beneath it.
    #[must_use]
    pub fn starts_with(&self, ancestor: &Self) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Whether this is the configuration root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[&'static str; N]> for FieldPath {
    fn from(segments: [&'static str; N]) -> Self {
        Self(segments.to_vec())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("(root)");
        }
        f.write_str(&self.0.join("."))
    }
}
