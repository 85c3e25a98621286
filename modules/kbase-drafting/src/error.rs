use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for DraftingError {
    fn from(e: reqwest::Error) -> Self {
        DraftingError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for DraftingError {
    fn from(e: serde_json::Error) -> Self {
        DraftingError::Parse(e.to_string())
    }
}
