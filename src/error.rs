use thiserror::Error;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operation was called at the wrong point in the quiz lifecycle.
    InvalidState,
    /// The caller broke a data contract (empty input, unknown key, ...).
    InvalidArgument,
    /// A fact or config document could not be parsed.
    Load,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("question picker is not ready")]
    NotReady,
    #[error("facts have already been loaded")]
    AlreadyLoaded,
    #[error("no question is currently active")]
    NoActiveQuestion,
    #[error("the current question has already been answered")]
    AlreadyAnswered,
    #[error("at least one prompt is required")]
    NoPrompts,
    #[error("unknown prompt `{0}`")]
    UnknownPrompt(String),
    #[error("`{0}` is not one of the offered responses")]
    NotOffered(String),
    #[error("prompt `{0}` appears more than once")]
    DuplicatePrompt(String),
    #[error("requested {requested} choices but only {available} distinct choices are available")]
    NotEnoughChoices { requested: usize, available: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotReady
            | Error::AlreadyLoaded
            | Error::NoActiveQuestion
            | Error::AlreadyAnswered => ErrorKind::InvalidState,
            Error::NoPrompts
            | Error::UnknownPrompt(_)
            | Error::NotOffered(_)
            | Error::DuplicatePrompt(_)
            | Error::NotEnoughChoices { .. }
            | Error::InvalidConfig(_) => ErrorKind::InvalidArgument,
            Error::Yaml(_) => ErrorKind::Load,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
