use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("extraction rule field '{0}' must not be empty")]
    EmptyRuleField(&'static str),

    #[error("unknown task state: {0}")]
    UnknownTaskState(String),

    #[error("unknown dag state: {0}")]
    UnknownDagState(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
