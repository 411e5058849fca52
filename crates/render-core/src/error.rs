use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown document format '{0}'")]
    UnknownFormat(String),
    #[error("No operation registered for mandatory entity '{kind}' in format '{format}'")]
    EmptyOperationChain { format: String, kind: &'static str },
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}
