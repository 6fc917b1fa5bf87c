use thiserror::Error;

use crate::flows::FlowTransitionError;
use crate::i18n::Language;
use crate::storage::StoreError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
    #[error("unknown product id `{0}`")]
    UnknownProduct(String),
    #[error("no template registered for language {language:?} key `{key}`")]
    MissingTemplate { language: Language, key: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("render failure: {0}")]
    Render(String),
}

impl From<FlowTransitionError> for ApplicationError {
    fn from(err: FlowTransitionError) -> Self {
        ApplicationError::Domain(DomainError::FlowTransition(err))
    }
}
