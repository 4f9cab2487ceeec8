#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("cannot set a parent in a non-compound graph")]
    NotCompound,
    #[error("setting parent `{parent}` for `{child}` would create a cycle")]
    ParentCycle { child: String, parent: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
