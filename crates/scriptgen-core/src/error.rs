use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptGenError {
    #[error("username, password, and server URL must all be provided")]
    MissingCredentials,

    #[error("server handshake did not set the {0} cookie")]
    MissingXsrfToken(&'static str),

    #[error("unrepresentable mapping key in definition: {0}")]
    UnsupportedKey(String),

    #[error("unknown template '{0}': expected 'table-formatting' or 'no-parse'")]
    UnknownTemplate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScriptGenError>;
