/// Errors raised while building a session: bad configuration or a bad level layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkyhopError {
    InvalidConfig(String),
    InvalidLayout(String),
}

impl std::fmt::Display for SkyhopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(m) => write!(f, "invalid config: {m}"),
            Self::InvalidLayout(m) => write!(f, "invalid layout: {m}"),
        }
    }
}

impl std::error::Error for SkyhopError {}
