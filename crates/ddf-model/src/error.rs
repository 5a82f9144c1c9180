use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("column {0:?} not found in source table")]
    MissingColumn(&'static str),
    #[error("label {0:?} normalizes to an empty identifier")]
    EmptyConceptId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
