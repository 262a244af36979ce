//! Semantic wrapper for WebJar package names.
//!
//! A package name is the first path segment below the resource prefix, for
//! example `jquery` in `META-INF/resources/webjars/jquery/jquery.js`.

use std::fmt;

/// The name of one packaged front-end library.
///
/// Construction never fails. A name that no archive exposes, or that is not a
/// single path segment, fails lookup with [`crate::ExtractionError::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the package name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the name is exactly one path segment: not empty, not
    /// `.` or `..`, and free of `/` and `\`.
    #[must_use]
    pub fn is_single_segment(&self) -> bool {
        !matches!(self.0.as_str(), "" | "." | "..") && !self.0.contains(['/', '\\'])
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
