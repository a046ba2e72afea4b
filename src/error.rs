use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Server returned OCS status {status_code}: {message}")]
    Ocs { status_code: u16, message: String },
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
