//! Graph configuration options.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Allow parallel edges between the same endpoints, told apart by a name.
    pub multigraph: bool,
    /// Allow nodes to be nested under a parent node.
    pub compound: bool,
    pub directed: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            multigraph: false,
            compound: false,
            directed: true,
        }
    }
}
