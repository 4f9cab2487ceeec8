use crate::graphlib::GraphError;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unknown alignment `{0}`, expected one of ul, ur, dl, dr")]
    UnknownAlign(String),

    /// Pinned layers contradict an edge: the target does not sit on a later rank than the
    /// source.
    #[error("edge {v} -> {w} does not point to a later rank")]
    InconsistentLayer { v: String, w: String },
}
