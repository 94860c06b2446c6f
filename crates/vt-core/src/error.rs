use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer length does not match `width * height` (times 4 for packed RGBA bytes).
    SizeMismatch { expected: usize, actual: usize },
    UnknownResolution(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "pixel buffer holds {actual} values, expected {expected}")
            }
            Self::UnknownResolution(key) => write!(f, "unknown resolution key `{key}`"),
        }
    }
}

impl std::error::Error for Error {}
