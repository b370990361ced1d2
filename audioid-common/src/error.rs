//! Errors raised while loading configuration and song descriptions

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bootstrap config unreadable, unparseable or out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Song description file is not valid TOML for a [`crate::KnownSong`]
    #[error("Invalid song description {path}: {source}")]
    Song {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
