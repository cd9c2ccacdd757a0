use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Settings read error: {0}")]
    ReadError(std::io::Error),

    #[error("Settings write error: {0}")]
    WriteError(std::io::Error),

    #[error("Settings serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        common::Error::PersistenceFailure(err.to_string())
    }
}
