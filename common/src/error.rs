use thiserror::Error;

/// Closed error taxonomy for the whole workspace.
///
/// Every failure surfaced to the presentation layer is one of these four
/// kinds; the payload is the human-readable detail shown to the user.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // reqwest folds JSON body decoding into its own error type;
        // split it back out so the taxonomy stays meaningful.
        if err.is_decode() {
            Error::DecodeFailure(err.to_string())
        } else {
            Error::NetworkFailure(err.to_string())
        }
    }
}
