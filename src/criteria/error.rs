use thiserror::Error;

#[derive(Error, Debug)]
pub enum CriteriaError {
    #[error("Invalid column name: {0}")]
    InvalidColumn(String),
}
