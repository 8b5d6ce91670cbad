use thiserror::Error;

#[derive(Error, Debug)]
pub enum BachesError {
    #[error("could not reach the repair service: {0}")]
    Network(String),

    #[error("not found: {}", or_placeholder(.0, "no such resource"))]
    NotFound(String),

    #[error("rejected by the repair service: {}", or_placeholder(.0, "no details given"))]
    Validation(String),

    #[error("invalid report id '{0}': expected a positive integer")]
    InvalidReportId(String),

    #[error("repair service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse failure classes that callers branch on instead of probing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeout or connectivity problem; nothing reached the backend
    Network,
    /// No matching report or repair
    NotFound,
    /// The backend rejected the payload
    Validation,
    /// Input rejected before any request was made
    ClientInput,
    /// Anything else (unexpected status, local IO, decoding)
    Other,
}

impl BachesError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BachesError::Network(_) => FailureKind::Network,
            BachesError::NotFound(_) => FailureKind::NotFound,
            BachesError::Validation(_) => FailureKind::Validation,
            BachesError::InvalidReportId(_) => FailureKind::ClientInput,
            _ => FailureKind::Other,
        }
    }

    /// Text the backend sent along with the failure, if any.
    pub fn backend_message(&self) -> Option<&str> {
        let message = match self {
            BachesError::NotFound(m) | BachesError::Validation(m) => m.as_str(),
            BachesError::Http { body, .. } => body.as_str(),
            _ => return None,
        };
        let trimmed = message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

fn or_placeholder<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = text.trim();
    if trimmed.is_empty() { placeholder } else { trimmed }
}

pub type Result<T> = std::result::Result<T, BachesError>;
