//! Edge identity.
//!
//! An edge is identified by its tail `v`, its head `w` and, in multigraphs, an optional `name`
//! distinguishing parallel edges.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }

    /// The endpoint opposite to `u`.
    pub fn other(&self, u: &str) -> &str {
        if self.v == u { &self.w } else { &self.v }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} -> {} ({name})", self.v, self.w),
            None => write!(f, "{} -> {}", self.v, self.w),
        }
    }
}
