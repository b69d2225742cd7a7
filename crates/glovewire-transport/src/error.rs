/// Errors that can occur while handing frames to the transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying stream accepted zero bytes.
    #[error("transport closed")]
    Closed,

    /// The transport has been shut down and no longer accepts frames.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;
