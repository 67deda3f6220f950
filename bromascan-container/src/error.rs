/// Why a binary container could not be read.
///
/// Always fatal to the run that produced it (§7): the container is loaded
/// once, before any method is fanned out to a worker.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("file too small: expected at least {expected} bytes, got {actual}")]
    TooSmall { expected: usize, actual: usize },

    #[error("missing or invalid {0} magic")]
    BadMagic(&'static str),

    #[error("declared offset escapes the buffer")]
    OutOfBounds,

    #[error("no {0} section found")]
    SectionNotFound(&'static str),

    #[error("requested CPU architecture not present in fat archive")]
    ArchNotFound,

    #[error("unsupported or unrecognized container format")]
    Unsupported,
}

impl From<scroll::Error> for ContainerError {
    fn from(_: scroll::Error) -> Self {
        ContainerError::OutOfBounds
    }
}
