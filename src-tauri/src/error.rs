use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("invalid time format '{0}', expected HH:MM:SS.mmm")]
    InvalidTimeFormat(String),
}

#[derive(Error, Debug)]
pub enum TimerError {
    #[error("timer already running")]
    AlreadyRunning,

    #[error("timer is not running")]
    NotRunning,

    #[error("a timer session is in progress; reset it before opening another record")]
    SessionActive,

    #[error("no lecture selected")]
    MissingTarget,

    #[error("no records to save")]
    NoRecords,

    #[error("record index {index} out of range ({len} records)")]
    RecordIndex { index: usize, len: usize },

    #[error("invalid record snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("lecture name must not be empty")]
    EmptyLectureName,

    #[error("lecture name '{0}' must not contain path separators")]
    InvalidLectureName(String),

    #[error("lecture '{0}' already exists")]
    DuplicateLecture(String),

    #[error("lecture '{0}' not found")]
    UnknownLecture(String),

    #[error("snapshot file name '{0}' must be a plain .json file name")]
    InvalidFileName(String),

    #[error("invalid record snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
