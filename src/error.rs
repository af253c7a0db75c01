use std::path::PathBuf;

/// Errors raised while converting a pose list into a COLMAP model.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A file could not be opened, read or written.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record in an input list is malformed.
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The orientation quaternion of a pose has zero (or overflowing) norm.
    #[error("{}:{line}: pose {name} has a degenerate orientation", .path.display())]
    DegenerateOrientation {
        path: PathBuf,
        line: usize,
        name: String,
    },

    /// No line of the shared camera file starts with a camera id.
    #[error("could not find a valid camera id in {}", .path.display())]
    MissingSharedCameraId { path: PathBuf },

    /// A pose has no entry in the name/id list.
    #[error("image {name} has no id in the name/id list")]
    MissingImageId { name: String },

    /// A COLMAP database could not be opened or queried.
    #[error("cannot read database {}: {source}", .path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to configure the thread pool. {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to serialize the report. {0}")]
    Report(#[from] serde_json::Error),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ConvertError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
