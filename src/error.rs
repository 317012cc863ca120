use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// Every slot of the probe sequence was examined and none accepted the key.
    #[error("hash table is full: no free slot among {capacity} probed positions")]
    TableFull { capacity: usize },
}

/// Rejected input line in the interactive session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?} (expected insert, search, delete, show or quit)")]
    Unknown(String),
    #[error("{0} needs a key")]
    MissingKey(&'static str),
    #[error("key {key:?} is longer than {max} characters")]
    KeyTooLong { key: String, max: usize },
}
