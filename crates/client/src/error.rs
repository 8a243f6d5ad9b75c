/// Errors from the track HTTP client.
///
/// `Display` is the user-facing message: the server's `error` string when it
/// sent one, otherwise the transport error text.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connection, DNS, TLS, body decode).
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided `error` message, or a generic status line.
        message: String,
    },
}

impl ClientError {
    /// HTTP status for API errors, `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Network(err) => err.status().map(|s| s.as_u16()),
            ClientError::Api { status, .. } => Some(*status),
        }
    }
}
