use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed caller input. Nothing was persisted.
    #[error("{0}")]
    Validation(String),

    /// Credential or assignment mismatch. No state change.
    #[error("{0}")]
    Auth(String),

    /// Durable read/write failure on a collection file. The in-memory
    /// mutation is discarded; the caller must re-invoke the operation.
    #[error("I/O failure on collection '{collection}': {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    /// The on-disk snapshot could not be encoded or decoded.
    #[error("malformed snapshot for collection '{collection}': {source}")]
    Snapshot {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Error::Auth(message.into())
    }

    pub(crate) fn io(collection: &str, source: std::io::Error) -> Self {
        Error::Io {
            collection: collection.to_string(),
            source,
        }
    }

    pub(crate) fn snapshot(collection: &str, source: serde_json::Error) -> Self {
        Error::Snapshot {
            collection: collection.to_string(),
            source,
        }
    }
}
