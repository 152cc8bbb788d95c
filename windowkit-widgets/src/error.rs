/// Errors that can occur while fetching a remote resource.
///
/// The `Display` text is what widgets surface to the user as their error message.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("Failed to fetch: {0}")]
    Status(u16),

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not the JSON shape the widget expects.
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport-specific failure that has no richer representation.
    #[error("{0}")]
    Transport(String),

    /// A newer request for the same resource superseded this one.
    #[error("Request superseded")]
    Cancelled,
}

impl FetchError {
    /// Cancellations are expected during fast typing/paging and should never reach the UI.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
