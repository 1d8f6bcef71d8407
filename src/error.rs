pub type KaleidoResult<T> = Result<T, KaleidoError>;

#[derive(thiserror::Error, Debug)]
pub enum KaleidoError {
    #[error("lookup error: {0}")]
    Lookup(String),

    #[error("context error: {0}")]
    Context(String),

    #[error("argument error: {0}")]
    Argument(String),

    #[error("setup error: {0}")]
    Setup(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KaleidoError {
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup(msg.into())
    }
}
