//! Unified error type.

/// Boxed error produced by a serializer strategy.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by tsu-json's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding to a port, accepting a connection, or a
/// serializer strategy refusing a value it was handed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The active serializer failed. The strategy's own error is kept as-is
    /// and exposed through `source()`.
    #[error("serialize: {0}")]
    Serialize(#[source] BoxError),
}
