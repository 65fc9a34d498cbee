use thiserror::Error;

/// Failure of a single text or image generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("provider returned no text")]
    EmptyResponse,
    #[error("theme response was not valid theme JSON: {0}")]
    MalformedTheme(#[from] serde_json::Error),
    #[error("no image data found in response")]
    MissingImage,
}

impl GenerationError {
    pub fn provider(err: &anyhow::Error) -> Self {
        Self::Provider(format!("{err:#}"))
    }
}
