/// Errors surfaced by [`crate::layout`].
///
/// Structural oddities (empty graphs, self loops, parallel edges, zero-size nodes) are laid out
/// rather than rejected, so this enum is small.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot intersect a rectangle from its own center ({x}, {y})")]
    PointAtRectCenter { x: f64, y: f64 },

    #[error("edge refers to missing node `{id}`")]
    MissingNode { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
