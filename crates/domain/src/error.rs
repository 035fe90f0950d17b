use crate::shared::entity::InvalidIDError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("unsupported recurrence kind: {0}")]
    UnsupportedKind(i64),
    #[error("unsupported warning type: {0}")]
    UnsupportedWarningType(i64),
    #[error(transparent)]
    MalformedId(#[from] InvalidIDError),
    #[error("invalid reminder: {0}")]
    InvalidReminder(&'static str),
    #[error("date computation left the supported calendar range")]
    DateOutOfRange,
}
