use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LabelError {
    #[error("Label error: [{0}] is not a classification label")]
    UnknownText(String),
    #[error("Label error: [{0}] is not a classification label")]
    UnknownNumber(f64)
}
