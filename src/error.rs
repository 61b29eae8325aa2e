use crate::api::ApiError;
use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Bad command line typed by the user
    #[error("{0}")]
    Usage(String),
}
