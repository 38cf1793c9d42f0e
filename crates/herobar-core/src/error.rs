use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Carousel needs at least one page")]
    EmptyPages,

    #[error("Page {index} is out of range (carousel has {len} pages)")]
    PageOutOfRange { index: usize, len: usize },

    #[error("Header controller is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;
