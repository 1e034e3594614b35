use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Smooth-scroll engine failed to initialize: {0}")]
    EngineInit(String),

    #[error("Scroll container not found: {0}")]
    ContainerNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
