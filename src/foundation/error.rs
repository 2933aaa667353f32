pub type AdrasterResult<T> = Result<T, AdrasterError>;

#[derive(thiserror::Error, Debug)]
pub enum AdrasterError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdrasterError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
