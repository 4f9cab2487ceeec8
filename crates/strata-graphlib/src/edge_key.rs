use std::fmt;

/// Identity of an edge: tail `v`, head `w`, and an optional name that tells parallel edges
/// apart in a multigraph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(v: impl Into<String>, w: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: None,
        }
    }

    pub fn named(v: impl Into<String>, w: impl Into<String>, name: Option<String>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }

    /// The endpoint opposite to `u`.
    pub fn other(&self, u: &str) -> &str {
        if self.v == u { &self.w } else { &self.v }
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
