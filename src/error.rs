use thiserror::Error;

/// Errors surfaced by the feed store and delivery pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// No feed exists under the given reference.
    #[error("feed not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("corrupt feed record: {0}")]
    Persist(#[from] serde_json::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound
        } else {
            Error::Io(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(Error::from(io), Error::NotFound));
    }

    #[test]
    fn test_other_io_errors_stay_io() {
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(Error::from(io), Error::Io(_)));
    }
}
