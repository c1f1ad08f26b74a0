use generational_arena::Index;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Inserting the value would repeat a value already present on the
    /// branch. Carries the conflicting node and its rendered value.
    #[error("Node with value '{value}' already exists in this branch")]
    DuplicateValue { node: Index, value: String },

    #[error("Node not found: {0:?}")]
    NodeNotFound(Index),

    /// Only detached nodes other than the tree root can be released.
    #[error("Node cannot be released while attached or while it is the tree root: {0:?}")]
    NotReleasable(Index),
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Errors surfaced by the command line driver.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("config error: {message}")]
    Config { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Tree(TreeError::DuplicateValue { .. }) => crate::exitcode::DATAERR,
            AppError::Tree(_) => crate::exitcode::SOFTWARE,
            AppError::Config { .. } => crate::exitcode::CONFIG,
        }
    }
}
