use tastetree_core::UserId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
    #[error("user {0} was supplied more than once")]
    DuplicateUser(UserId),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
