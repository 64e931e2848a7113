//! A canonical, type-safe representation of a qualified module name.
//!
//! Namespaces serve two roles: they key the per-scope macro index (always
//! absolute there) and they are the evaluated value of a constant path in
//! macro arguments (absolute only when the source wrote a leading `::`).

use std::fmt;
use std::ops::Add;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    path: Vec<String>,
    absolute: bool,
}

impl Namespace {
    pub fn new(path: Vec<String>, absolute: bool) -> Self {
        Namespace { path, absolute }
    }

    /// The top-level namespace, `::`.
    pub fn root() -> Self {
        Namespace { path: Vec::new(), absolute: true }
    }

    /// Parses `Foo::Bar` / `::Foo::Bar` notation.
    pub fn parse(name: &str) -> Self {
        let absolute = name.starts_with("::");
        let trimmed = name.trim_start_matches("::");
        let path = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split("::").map(String::from).collect()
        };
        Namespace { path, absolute }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn segments(&self) -> &[String] {
        &self.path
    }

    /// Truncates the last segment. The root namespace is its own parent.
    pub fn parent(&self) -> Namespace {
        let mut path = self.path.clone();
        path.pop();
        Namespace { path, absolute: self.absolute }
    }

    pub fn append(&self, segment: impl Into<String>) -> Namespace {
        let mut path = self.path.clone();
        path.push(segment.into());
        Namespace { path, absolute: self.absolute }
    }

    /// Cumulative prefixes of the path, shortest first. Used when rendering
    /// nested scope headers: `::A::B` yields `::A`, then `::A::B`.
    pub fn ancestry(&self) -> impl Iterator<Item = Namespace> + '_ {
        (1..=self.path.len()).map(move |n| Namespace {
            path: self.path[..n].to_vec(),
            absolute: self.absolute,
        })
    }
}

/// Concatenation follows constant-resolution rules: an absolute right-hand
/// side discards the left-hand context entirely.
impl Add<&Namespace> for &Namespace {
    type Output = Namespace;

    fn add(self, rhs: &Namespace) -> Namespace {
        if rhs.absolute {
            return rhs.clone();
        }
        let mut path = self.path.clone();
        path.extend(rhs.path.iter().cloned());
        Namespace { path, absolute: self.absolute }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            write!(f, "::")?;
        }
        write!(f, "{}", self.path.join("::"))
    }
}
