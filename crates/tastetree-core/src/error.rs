use thiserror::Error;

/// Validation failures at the data-model boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("attribute '{0}' is not part of the attribute universe")]
    UnknownAttribute(String),
    #[error("attribute '{0}' appears more than once in the attribute universe")]
    DuplicateAttribute(String),
    #[error("attribute names must not be blank")]
    BlankAttribute,
    #[error("item key must not be empty")]
    EmptyKey,
}

pub type Result<T> = std::result::Result<T, CoreError>;
